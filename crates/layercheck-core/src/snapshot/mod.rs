//! Per-layer snapshots of a drawing version.
//!
//! A snapshot reduces a parsed document to the metrics the comparison engine
//! works on: entity count, polygon area, centroid, bounds and the layer's
//! display properties. Snapshots are plain values; storing them is the
//! caller's concern (see [`crate::store`]).

pub mod digest;
pub mod extract;
pub mod geometry;
pub mod model;

pub use digest::compute_snapshot_digest;
pub use extract::extract;
pub use geometry::Bounds;
pub use model::{CategoryTier, LayerCategory, LayerSnapshot};
