//! Layercheck Core - drawing layer validation and revision comparison
//!
//! This crate provides:
//! - Layer-name template compilation and rule-set parsing
//! - Color-rule resolution with entity-level fallback and sub-occupancy
//!   colors derived from base-category layers
//! - Per-layer validation verdicts plus document unit checks
//! - Per-layer snapshots and cross-version comparison with significance
//!   classification and compliance insights
//!
//! The core does no file or network I/O. Callers hand over parsed documents
//! and rule sets and receive structured reports.
//!
//! ```ignore
//! use layercheck_core::{validate, extract, compare, Document, RuleSet};
//!
//! let report = validate(&document, &rules);
//! let result = compare(&extract(&base_doc), &extract(&new_doc));
//! ```

pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;
pub mod snapshot;
pub mod store;

pub use layercheck_core_types::schema;

// Re-export commonly used types
pub use config::{ComparisonConfig, EngineConfig, ValidationConfig};
pub use diff::{compare, compare_versions, compare_with_config, ComparisonResult, Significance};
pub use errors::{ExError, ExErrorKind, LayerCheckError, Result};
pub use model::{Color, ColorRequirement, Document, Entity, EntityKind, Layer, LayerRule, RuleSet};
pub use rules::{validate, validate_with_config, ValidationReport, VerdictStatus};
pub use snapshot::{extract, LayerSnapshot};
pub use store::{ComparisonCache, InMemoryVersionStore, VersionRecord, VersionStore};
