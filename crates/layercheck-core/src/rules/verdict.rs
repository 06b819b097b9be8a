//! Validation report types

use serde::{Deserialize, Serialize};

use super::derive::OccupancyColors;
use super::units::UnitCheck;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Valid,
    Invalid,
    Warning,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            VerdictStatus::Valid => "valid",
            VerdictStatus::Invalid => "invalid",
            VerdictStatus::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub layer_name: String,
    pub status: VerdictStatus,
    pub reasons: Vec<String>,
    /// Template of the rule that was applied
    pub matched_rule: Option<String>,
    /// Closed-polygon area on a layer that passed a polygon rule
    pub measured_area: Option<f64>,
    /// Distinct text contents, sorted
    pub text_values: Vec<String>,
}

/// Document-level error or warning not tied to one layer verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Repair step for an external fix script. Colors use the script's
/// notation: an index (`"3"`) or a true color (`"T 255,0,0"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixAction {
    CreateLayer { layer: String, color: String },
    FixColor { layer: String, color: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub unit_checks: Vec<UnitCheck>,
    pub layer_verdicts: Vec<ValidationVerdict>,
    pub findings: Vec<Finding>,
    pub fix_actions: Vec<FixAction>,
    pub occupancy_colors: OccupancyColors,
}

impl ValidationReport {
    pub fn verdict(&self, layer_name: &str) -> Option<&ValidationVerdict> {
        self.layer_verdicts.iter().find(|v| v.layer_name == layer_name)
    }

    /// Failed hard unit checks, error findings and invalid verdicts
    pub fn error_count(&self) -> usize {
        self.unit_checks
            .iter()
            .filter(|c| !c.passed && c.severity == Severity::Error)
            .count()
            + self.findings.iter().filter(|f| f.severity == Severity::Error).count()
            + self
                .layer_verdicts
                .iter()
                .filter(|v| v.status == VerdictStatus::Invalid)
                .count()
    }

    pub fn warning_count(&self) -> usize {
        self.unit_checks
            .iter()
            .filter(|c| !c.passed && c.severity == Severity::Warning)
            .count()
            + self.findings.iter().filter(|f| f.severity == Severity::Warning).count()
            + self
                .layer_verdicts
                .iter()
                .filter(|v| v.status == VerdictStatus::Warning)
                .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
