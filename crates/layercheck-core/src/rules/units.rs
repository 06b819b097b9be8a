//! Header unit checks

use serde::{Deserialize, Serialize};

use super::verdict::Severity;
use crate::config::RequiredUnits;
use crate::model::DocumentUnits;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCheck {
    /// Header variable, e.g. `$INSUNITS`
    pub variable: String,
    pub expected: i32,
    pub found: i32,
    pub passed: bool,
    pub severity: Severity,
    /// Set when the check failed
    pub detail: Option<String>,
}

fn insertion_unit_name(code: i32) -> String {
    match code {
        0 => "Unitless".to_string(),
        1 => "Inches".to_string(),
        2 => "Feet".to_string(),
        4 => "Millimeters".to_string(),
        5 => "Centimeters".to_string(),
        6 => "Meters".to_string(),
        other => format!("Custom ({})", other),
    }
}

fn expected_insertion_name(code: i32) -> String {
    if code == 6 {
        "Meter".to_string()
    } else {
        insertion_unit_name(code)
    }
}

fn linear_unit_name(code: i32) -> String {
    match code {
        1 => "Scientific".to_string(),
        2 => "Decimal".to_string(),
        3 => "Engineering".to_string(),
        4 => "Architectural".to_string(),
        5 => "Fractional".to_string(),
        other => other.to_string(),
    }
}

fn angular_unit_name(code: i32) -> String {
    match code {
        0 => "Decimal Degrees".to_string(),
        1 => "Deg/Min/Sec".to_string(),
        2 => "Gradians".to_string(),
        3 => "Radians".to_string(),
        4 => "Surveyor".to_string(),
        other => other.to_string(),
    }
}

/// Largest `$LUPREC` a drawing header can carry
pub const MAX_LINEAR_PRECISION: i32 = 8;

/// `2` -> `0.00`, clamped to [`MAX_LINEAR_PRECISION`] places
fn precision_mask(places: i32) -> String {
    match places.min(MAX_LINEAR_PRECISION) {
        p if p <= 0 => "0".to_string(),
        p => format!("0.{}", "0".repeat(p as usize)),
    }
}

fn check(variable: &str, expected: i32, found: i32, severity: Severity, detail: impl FnOnce() -> String) -> UnitCheck {
    let passed = expected == found;
    UnitCheck {
        variable: variable.to_string(),
        expected,
        found,
        passed,
        severity,
        detail: (!passed).then(detail),
    }
}

/// Four independent checks; precision is a warning, the rest are errors
pub fn check_units(units: &DocumentUnits, required: &RequiredUnits) -> Vec<UnitCheck> {
    vec![
        check(
            "$INSUNITS",
            required.insertion_units,
            units.insertion_units,
            Severity::Error,
            || {
                format!(
                    "Drawing unit must be {} ($INSUNITS={}). Found: {}",
                    expected_insertion_name(required.insertion_units),
                    required.insertion_units,
                    insertion_unit_name(units.insertion_units)
                )
            },
        ),
        check("$LUNITS", required.linear_units, units.linear_units, Severity::Error, || {
            format!(
                "Drawing unit length type must be {} ($LUNITS={}). Found: {}",
                linear_unit_name(required.linear_units),
                required.linear_units,
                linear_unit_name(units.linear_units)
            )
        }),
        check("$AUNITS", required.angular_units, units.angular_units, Severity::Error, || {
            format!(
                "Drawing unit angle type must be {} ($AUNITS={}). Found: {}",
                angular_unit_name(required.angular_units),
                required.angular_units,
                angular_unit_name(units.angular_units)
            )
        }),
        check(
            "$LUPREC",
            required.linear_precision,
            units.linear_precision,
            Severity::Warning,
            || {
                format!(
                    "Linear unit precision should be {} ($LUPREC={}). Found: {}",
                    precision_mask(required.linear_precision),
                    required.linear_precision,
                    units.linear_precision
                )
            },
        ),
    ]
}
