//! Change significance classification
//!
//! Significance is the maximum of a magnitude bucket (how much changed) and
//! a category bucket (how closely the layer's category is scrutinized).

use super::model::Significance;
use crate::config::SignificanceThresholds;
use crate::snapshot::{CategoryTier, LayerCategory};

pub fn magnitude(pct: f64, shift: f64, entity_delta: i64, t: &SignificanceThresholds) -> Significance {
    if pct.abs() > t.high_pct || shift > t.high_shift {
        Significance::High
    } else if pct.abs() > t.medium_pct || shift > t.medium_shift || entity_delta.abs() > t.medium_entity_delta {
        Significance::Medium
    } else {
        Significance::Low
    }
}

pub fn category_floor(
    category: LayerCategory,
    pct: f64,
    area_delta: f64,
    shift: f64,
    t: &SignificanceThresholds,
) -> Significance {
    if category == LayerCategory::Setback && shift > t.setback_shift {
        return Significance::Critical;
    }
    match category.tier() {
        CategoryTier::Critical if pct.abs() > t.critical_tier_pct => Significance::Critical,
        CategoryTier::Critical if pct.abs() > t.critical_tier_high_pct => Significance::High,
        CategoryTier::Critical => Significance::Medium,
        CategoryTier::High if pct.abs() > t.high_tier_pct => Significance::High,
        CategoryTier::High if area_delta != 0.0 => Significance::Medium,
        _ => Significance::Low,
    }
}

/// Significance of a modification
pub fn classify_modification(
    category: LayerCategory,
    pct: f64,
    area_delta: f64,
    shift: f64,
    entity_delta: i64,
    t: &SignificanceThresholds,
) -> Significance {
    magnitude(pct, shift, entity_delta, t).max(category_floor(category, pct, area_delta, shift, t))
}

/// Significance of a layer that was added or removed
pub fn classify_presence(category: LayerCategory) -> Significance {
    match category.tier() {
        CategoryTier::Critical => Significance::Critical,
        CategoryTier::High => Significance::High,
        CategoryTier::Medium => Significance::Medium,
        CategoryTier::Other => Significance::Low,
    }
}
