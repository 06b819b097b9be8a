use std::sync::OnceLock;

use regex::Regex;

use super::pattern::cached_regex;
use crate::model::TextFormat;

static CAPACITY: OnceLock<Option<Regex>> = OnceLock::new();
static VOLTAGE: OnceLock<Option<Regex>> = OnceLock::new();
static MEASURE: OnceLock<Option<Regex>> = OnceLock::new();

/// Check trimmed, upper-cased text content against `format`.
///
/// Returns the hint to show when the text does not fit.
pub fn check_text(format: TextFormat, text: &str) -> Result<(), &'static str> {
    let clean = text.trim().to_uppercase();
    let (cell, source, hint) = match format {
        TextFormat::Capacity => (
            &CAPACITY,
            r"^(\d+)\s*L?$",
            "Expected numeric capacity (e.g. '5000' or '5000L')",
        ),
        TextFormat::Voltage => (
            &VOLTAGE,
            r"^(\d+(\.\d+)?)\s*(KV)?$",
            "Expected numeric voltage (e.g. '11' or '11KV')",
        ),
        TextFormat::NumericMeasure => (&MEASURE, r"^(\d+(\.\d+)?)\s*[A-Z%]*$", "Expected numeric value"),
    };
    match cached_regex(cell, source) {
        Some(re) if re.is_match(&clean) => Ok(()),
        _ => Err(hint),
    }
}
