//! Core types shared across layercheck crates
//!
//! - **Identifiers**: `VersionId` for stored drawing revisions, `RunId` for
//!   correlating the log events of one CLI invocation
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod ids;
pub mod schema;

pub use ids::{RunId, VersionId};
