//! Rule matching and layer validation

pub mod color;
pub mod derive;
pub mod engine;
pub mod fix_script;
pub mod pattern;
pub mod text;
pub mod units;
pub mod verdict;

pub use color::{resolve, ColorResolution};
pub use derive::{derive_occupancy_colors, OccupancyColors};
pub use engine::{validate, validate_with_config};
pub use fix_script::render_lisp;
pub use pattern::{compile, CompiledPattern};
pub use units::{check_units, UnitCheck};
pub use verdict::{FixAction, Finding, Severity, ValidationReport, ValidationVerdict, VerdictStatus};
