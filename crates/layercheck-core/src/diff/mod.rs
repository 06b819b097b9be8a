//! Cross-version comparison of layer snapshots.
//!
//! ```ignore
//! use layercheck_core::diff::{compare, render_human_summary};
//!
//! let result = compare(&base_snapshots, &new_snapshots);
//! println!("{}", render_human_summary(&result));
//! ```
//!
//! Comparison is pure: identical inputs always produce identical results,
//! and comparing a snapshot set with itself yields no changes.

pub mod engine;
pub mod human_summary;
pub mod insights;
pub mod model;
pub mod significance;

pub use engine::{check_round_trip, compare, compare_versions, compare_with_config};
pub use human_summary::render_human_summary;
pub use model::{
    ComparisonResult, ComparisonSummary, Insight, LayerChange, LayerPresence, PropertyChange, Significance,
};
