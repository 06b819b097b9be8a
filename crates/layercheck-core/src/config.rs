//! Engine configuration
//!
//! Every field has a default matching the built-in drawing standard, so an
//! empty TOML document yields [`EngineConfig::default()`]. The core never
//! reads files; callers hand over the TOML text.
//!
//! ```toml
//! [validation]
//! base_category_template = "BLK_n_FLR_n_BLT_UP_AREA"
//!
//! [validation.units]
//! insertion_units = 6
//!
//! [comparison]
//! tolerance = 0.01
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{LayerCheckError, Result};
use crate::rules::units::MAX_LINEAR_PRECISION;

/// Layers skipped entirely during validation.
pub const DEFAULT_IGNORED_LAYERS: &[&str] = &[
    "0",
    "Defpoints",
    "PLAN",
    "WALL",
    "elevation",
    "TEXT",
    "column",
    "dim",
    "HATCH",
    "IC",
    "sec-slab",
    "Chajja",
    "win",
    "BUA TOTAL",
    "FORMAT LINE",
    "SEC LINE",
    "ele-1",
    "SEC WALL",
    "SEC DIM",
    "rm text",
    "TEXT-D-W",
    "ELE-2",
    "ELE-3",
    "LANDSCAPE",
    "dw text",
    "Dim.",
    "WALL.",
    "ELE",
    "layer",
    "Layer2",
    "WINDOWS",
    "LS-Tree",
    "RM TXT",
];

pub const DEFAULT_BASE_CATEGORY_TEMPLATE: &str = "BLK_n_FLR_n_BLT_UP_AREA";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub validation: ValidationConfig,
    pub comparison: ComparisonConfig,
}

impl EngineConfig {
    /// Parse and sanity-check a TOML configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on malformed TOML, unknown value types or a
    /// negative/non-finite tolerance or threshold.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        let c = &self.comparison;
        let t = &c.thresholds;
        let named = [
            ("comparison.tolerance", c.tolerance),
            ("comparison.thresholds.high_pct", t.high_pct),
            ("comparison.thresholds.high_shift", t.high_shift),
            ("comparison.thresholds.medium_pct", t.medium_pct),
            ("comparison.thresholds.medium_shift", t.medium_shift),
            ("comparison.thresholds.critical_tier_pct", t.critical_tier_pct),
            ("comparison.thresholds.critical_tier_high_pct", t.critical_tier_high_pct),
            ("comparison.thresholds.high_tier_pct", t.high_tier_pct),
            ("comparison.thresholds.setback_shift", t.setback_shift),
            ("comparison.insights.net_area", c.insights.net_area),
            ("comparison.insights.setback_shift", c.insights.setback_shift),
            ("comparison.insights.critical_pct", c.insights.critical_pct),
        ];
        for (key, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(LayerCheckError::InvalidConfig {
                    reason: format!("{} must be a non-negative number, got {}", key, value),
                });
            }
        }
        let precision = self.validation.units.linear_precision;
        if !(0..=MAX_LINEAR_PRECISION).contains(&precision) {
            return Err(LayerCheckError::InvalidConfig {
                reason: format!(
                    "validation.units.linear_precision must be between 0 and {}, got {}",
                    MAX_LINEAR_PRECISION, precision
                ),
            });
        }
        if self.validation.max_reasons_per_check == 0 {
            return Err(LayerCheckError::InvalidConfig {
                reason: "validation.max_reasons_per_check must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Header-variable values a compliant drawing must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequiredUnits {
    /// `$INSUNITS`, 6 = meters
    pub insertion_units: i32,
    /// `$LUNITS`, 2 = decimal
    pub linear_units: i32,
    /// `$AUNITS`, 0 = decimal degrees
    pub angular_units: i32,
    /// `$LUPREC`, 2 = 0.00
    pub linear_precision: i32,
}

impl Default for RequiredUnits {
    fn default() -> Self {
        Self {
            insertion_units: 6,
            linear_units: 2,
            angular_units: 0,
            linear_precision: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub units: RequiredUnits,
    /// Exact layer names excluded from per-layer verdicts
    pub ignored_layers: Vec<String>,
    /// Template whose matching layers define the sub-occupancy allow-set
    pub base_category_template: String,
    /// Cap on repeated reasons per check on one layer
    pub max_reasons_per_check: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            units: RequiredUnits::default(),
            ignored_layers: DEFAULT_IGNORED_LAYERS.iter().map(|s| s.to_string()).collect(),
            base_category_template: DEFAULT_BASE_CATEGORY_TEMPLATE.to_string(),
            max_reasons_per_check: 3,
        }
    }
}

impl ValidationConfig {
    pub fn is_ignored(&self, layer_name: &str) -> bool {
        self.ignored_layers.iter().any(|l| l == layer_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Below this, area and centroid movement count as unchanged
    pub tolerance: f64,
    pub thresholds: SignificanceThresholds,
    pub insights: InsightThresholds,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            thresholds: SignificanceThresholds::default(),
            insights: InsightThresholds::default(),
        }
    }
}

/// Bucket boundaries for change significance. Percentages are fractions
/// (0.10 = 10%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceThresholds {
    pub high_pct: f64,
    pub high_shift: f64,
    pub medium_pct: f64,
    pub medium_shift: f64,
    pub medium_entity_delta: i64,
    pub critical_tier_pct: f64,
    pub critical_tier_high_pct: f64,
    pub high_tier_pct: f64,
    pub setback_shift: f64,
}

impl Default for SignificanceThresholds {
    fn default() -> Self {
        Self {
            high_pct: 0.10,
            high_shift: 1.0,
            medium_pct: 0.01,
            medium_shift: 0.1,
            medium_entity_delta: 10,
            critical_tier_pct: 0.05,
            critical_tier_high_pct: 0.01,
            high_tier_pct: 0.10,
            setback_shift: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    /// Net area change (drawing units squared) worth reporting
    pub net_area: f64,
    /// Setback centroid movement worth reporting
    pub setback_shift: f64,
    /// Critical-tier area change outside the tolerance band
    pub critical_pct: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            net_area: 10.0,
            setback_shift: 0.1,
            critical_pct: 0.05,
        }
    }
}
