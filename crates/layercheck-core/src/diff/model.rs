//! Comparison output types.
//!
//! All types derive `Debug, Clone, Serialize, Deserialize, PartialEq`;
//! collections are sorted by layer name so serialized output is stable.

use serde::{Deserialize, Serialize};

use crate::model::{Color, Point};
use crate::snapshot::{LayerCategory, LayerSnapshot};

/// Severity bucket of a detected change, ordered `Low < Critical`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Low,
    Medium,
    High,
    Critical,
}

impl Significance {
    pub fn label(&self) -> &'static str {
        match self {
            Significance::Low => "Low",
            Significance::Medium => "Medium",
            Significance::High => "High",
            Significance::Critical => "Critical",
        }
    }
}

/// Geometric change on a layer present in both versions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerChange {
    pub layer_name: String,
    pub category: LayerCategory,
    pub base_area: f64,
    pub new_area: f64,
    pub area_delta: f64,
    /// Fraction of the base area; a ±1e6 sentinel when the base area is zero
    pub area_pct_delta: f64,
    pub area_pct_undefined: bool,
    /// (dx, dy), zero when either side has no centroid
    pub centroid_shift: Point,
    pub centroid_shift_distance: f64,
    pub entity_count_delta: i64,
    pub significance: Significance,
}

/// Layer present on only one side, with its full snapshot from that side
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerPresence {
    pub layer_name: String,
    pub category: LayerCategory,
    pub significance: Significance,
    pub snapshot: LayerSnapshot,
}

/// Display-property change on a layer present in both versions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "property", rename_all = "snake_case")]
pub enum PropertyChange {
    Color { layer_name: String, base: Color, new: Color },
    Linetype { layer_name: String, base: String, new: String },
    Visibility { layer_name: String, base: bool, new: bool },
}

impl PropertyChange {
    pub fn layer_name(&self) -> &str {
        match self {
            PropertyChange::Color { layer_name, .. }
            | PropertyChange::Linetype { layer_name, .. }
            | PropertyChange::Visibility { layer_name, .. } => layer_name,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            PropertyChange::Color { base, new, .. } => format!("Color changed from {} to {}", base, new),
            PropertyChange::Linetype { base, new, .. } => {
                format!("Line type changed from {} to {}", base, new)
            }
            PropertyChange::Visibility { new, .. } => {
                format!("Visibility changed to {}", if *new { "visible" } else { "hidden" })
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparisonSummary {
    pub total_layers_base: usize,
    pub total_layers_new: usize,
    pub added_count: usize,
    pub removed_count: usize,
    pub modified_count: usize,
    pub unchanged_count: usize,
    pub critical_changes: usize,
    pub high_changes: usize,
    pub medium_changes: usize,
    pub low_changes: usize,
}

impl ComparisonSummary {
    pub fn count(&self, significance: Significance) -> usize {
        match significance {
            Significance::Critical => self.critical_changes,
            Significance::High => self.high_changes,
            Significance::Medium => self.medium_changes,
            Significance::Low => self.low_changes,
        }
    }
}

/// Compliance observation derived from a comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    CriticalAreaIncrease { layer_name: String, pct: f64 },
    CriticalAreaDecrease { layer_name: String, pct: f64 },
    NetAreaIncrease { area: f64 },
    NetAreaDecrease { area: f64 },
    SetbacksShifted { count: usize },
    StructuresAdded { count: usize },
    CriticalChanges { count: usize },
    NoChanges,
    MinorChangesOnly,
}

impl Insight {
    pub fn message(&self) -> String {
        match self {
            Insight::CriticalAreaIncrease { layer_name, pct } => format!(
                "{} area increased by {:.1}%, beyond the tolerance band; verify against permissible limits",
                layer_name,
                pct * 100.0
            ),
            Insight::CriticalAreaDecrease { layer_name, pct } => format!(
                "{} area decreased by {:.1}%, beyond the tolerance band",
                layer_name,
                pct.abs() * 100.0
            ),
            Insight::NetAreaIncrease { area } => {
                format!("Total area increased by {:.2} sq.m; verify against permissible limits", area)
            }
            Insight::NetAreaDecrease { area } => format!("Total area decreased by {:.2} sq.m", area.abs()),
            Insight::SetbacksShifted { count } => {
                format!("{} setback(s) have shifted position; verify minimum distances", count)
            }
            Insight::StructuresAdded { count } => format!(
                "{} new structural element(s) added; check fire safety and accessibility compliance",
                count
            ),
            Insight::CriticalChanges { count } => {
                format!("{} critical change(s) detected; review before submission", count)
            }
            Insight::NoChanges => "No changes detected between versions".to_string(),
            Insight::MinorChangesOnly => "Changes are minor; likely safe for revision submission".to_string(),
        }
    }
}

/// Full comparison between two snapshot sets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonResult {
    pub base_version_id: Option<String>,
    pub new_version_id: Option<String>,
    pub added: Vec<LayerPresence>,
    pub removed: Vec<LayerPresence>,
    pub modified: Vec<LayerChange>,
    pub property_changes: Vec<PropertyChange>,
    pub summary: ComparisonSummary,
    pub insights: Vec<Insight>,
}

impl ComparisonResult {
    pub fn modified_layer(&self, name: &str) -> Option<&LayerChange> {
        self.modified.iter().find(|c| c.layer_name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty() && self.property_changes.is_empty()
    }

    /// Highest significance across added, removed and modified layers
    pub fn max_significance(&self) -> Option<Significance> {
        self.added
            .iter()
            .chain(&self.removed)
            .map(|p| p.significance)
            .chain(self.modified.iter().map(|c| c.significance))
            .max()
    }
}
