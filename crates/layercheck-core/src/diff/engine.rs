//! Snapshot comparison engine.
//!
//! [`compare`] pairs layers by name, quantifies each modification, applies
//! the tolerance filter and classifies significance. Output ordering is by
//! layer name throughout, so identical inputs serialize identically.

use std::collections::{BTreeMap, BTreeSet};

use super::insights::generate_insights;
use super::model::{ComparisonResult, ComparisonSummary, LayerChange, LayerPresence, PropertyChange, Significance};
use super::significance::{classify_modification, classify_presence};
use crate::config::ComparisonConfig;
use crate::errors::{ExError, ExErrorKind};
use crate::model::Point;
use crate::snapshot::LayerSnapshot;
use crate::store::VersionRecord;
use crate::{log_op_end, log_op_start};

/// Stand-in percentage when the base area is zero
pub const UNDEFINED_PCT_SENTINEL: f64 = 1e6;

fn index_by_name<'a>(side: &str, snapshots: &'a [LayerSnapshot]) -> BTreeMap<&'a str, &'a LayerSnapshot> {
    let mut map = BTreeMap::new();
    for s in snapshots {
        if map.insert(s.name.as_str(), s).is_some() {
            tracing::warn!(side, layer_name = %s.name, "duplicate layer snapshot; last entry kept");
        }
    }
    map
}

fn presence(s: &LayerSnapshot) -> LayerPresence {
    LayerPresence {
        layer_name: s.name.clone(),
        category: s.layer_category,
        significance: classify_presence(s.layer_category),
        snapshot: s.clone(),
    }
}

/// Area delta as a fraction of the base, plus whether the base was zero
fn area_pct(base_area: f64, area_delta: f64) -> (f64, bool) {
    if base_area != 0.0 {
        (area_delta / base_area, false)
    } else if area_delta == 0.0 {
        (0.0, false)
    } else {
        (UNDEFINED_PCT_SENTINEL.copysign(area_delta), true)
    }
}

/// Measure the change on a layer present on both sides; `None` when every
/// difference is within tolerance.
fn measure(base: &LayerSnapshot, new: &LayerSnapshot, config: &ComparisonConfig) -> Option<LayerChange> {
    let area_delta = new.area - base.area;
    let (area_pct_delta, area_pct_undefined) = area_pct(base.area, area_delta);
    let centroid_shift = match (base.centroid, new.centroid) {
        (Some(b), Some(n)) => Point::new(n.x - b.x, n.y - b.y),
        _ => Point::default(),
    };
    let shift = centroid_shift.x.hypot(centroid_shift.y);
    let entity_delta = new.entity_count as i64 - base.entity_count as i64;

    let tol = config.tolerance;
    if area_delta.abs() < tol && shift < tol && entity_delta == 0 {
        return None;
    }

    Some(LayerChange {
        layer_name: new.name.clone(),
        category: new.layer_category,
        base_area: base.area,
        new_area: new.area,
        area_delta,
        area_pct_delta,
        area_pct_undefined,
        centroid_shift,
        centroid_shift_distance: shift,
        entity_count_delta: entity_delta,
        significance: classify_modification(
            new.layer_category,
            area_pct_delta,
            area_delta,
            shift,
            entity_delta,
            &config.thresholds,
        ),
    })
}

fn property_changes(base: &LayerSnapshot, new: &LayerSnapshot) -> Vec<PropertyChange> {
    let mut changes = Vec::new();
    if base.assigned_color != new.assigned_color {
        changes.push(PropertyChange::Color {
            layer_name: new.name.clone(),
            base: base.assigned_color,
            new: new.assigned_color,
        });
    }
    if base.linetype != new.linetype {
        changes.push(PropertyChange::Linetype {
            layer_name: new.name.clone(),
            base: base.linetype.clone(),
            new: new.linetype.clone(),
        });
    }
    if base.visible != new.visible {
        changes.push(PropertyChange::Visibility {
            layer_name: new.name.clone(),
            base: base.visible,
            new: new.visible,
        });
    }
    changes
}

/// Compare with the default configuration
pub fn compare(base: &[LayerSnapshot], new: &[LayerSnapshot]) -> ComparisonResult {
    compare_with_config(base, new, &ComparisonConfig::default())
}

pub fn compare_with_config(base: &[LayerSnapshot], new: &[LayerSnapshot], config: &ComparisonConfig) -> ComparisonResult {
    log_op_start!("compare", base_layers = base.len(), new_layers = new.len());
    let start = std::time::Instant::now();

    let base_idx = index_by_name("base", base);
    let new_idx = index_by_name("new", new);
    let base_names: BTreeSet<&str> = base_idx.keys().copied().collect();
    let new_names: BTreeSet<&str> = new_idx.keys().copied().collect();

    let added: Vec<LayerPresence> = new_names.difference(&base_names).map(|n| presence(new_idx[n])).collect();
    let removed: Vec<LayerPresence> = base_names.difference(&new_names).map(|n| presence(base_idx[n])).collect();

    let mut modified = Vec::new();
    let mut props = Vec::new();
    let common: Vec<&str> = base_names.intersection(&new_names).copied().collect();
    for name in &common {
        let (b, n) = (base_idx[name], new_idx[name]);
        if let Some(change) = measure(b, n, config) {
            modified.push(change);
        }
        props.extend(property_changes(b, n));
    }

    let mut summary = ComparisonSummary {
        total_layers_base: base_names.len(),
        total_layers_new: new_names.len(),
        added_count: added.len(),
        removed_count: removed.len(),
        modified_count: modified.len(),
        unchanged_count: common.len() - modified.len(),
        ..ComparisonSummary::default()
    };
    let significances = added
        .iter()
        .chain(&removed)
        .map(|p| p.significance)
        .chain(modified.iter().map(|c| c.significance));
    for sig in significances {
        match sig {
            Significance::Critical => summary.critical_changes += 1,
            Significance::High => summary.high_changes += 1,
            Significance::Medium => summary.medium_changes += 1,
            Significance::Low => summary.low_changes += 1,
        }
    }

    let insights = generate_insights(&added, &removed, &modified, &props, &summary, &config.insights);

    let result = ComparisonResult {
        base_version_id: None,
        new_version_id: None,
        added,
        removed,
        modified,
        property_changes: props,
        summary,
        insights,
    };

    log_op_end!(
        "compare",
        duration_ms = start.elapsed().as_millis() as u64,
        modified_count = result.summary.modified_count,
        critical_count = result.summary.critical_changes
    );
    result
}

/// Compare two stored versions; the result carries their ids.
pub fn compare_versions(base: &VersionRecord, new: &VersionRecord, config: &ComparisonConfig) -> ComparisonResult {
    let mut result = compare_with_config(&base.snapshots, &new.snapshots, config);
    result.base_version_id = Some(base.version_id.to_string());
    result.new_version_id = Some(new.version_id.to_string());
    result
}

/// Check that a result survives a JSON round trip unchanged.
///
/// # Errors
///
/// `ERR_DETERMINISM_VIOLATION` if the decoded value differs,
/// `ERR_SERIALIZATION` if encoding or decoding fails.
pub fn check_round_trip(result: &ComparisonResult) -> Result<(), ExError> {
    let json = serde_json::to_string(result)
        .map_err(|e| ExError::new(ExErrorKind::Serialization).with_op("compare").with_message(e.to_string()))?;
    let decoded: ComparisonResult = serde_json::from_str(&json)
        .map_err(|e| ExError::new(ExErrorKind::Serialization).with_op("compare").with_message(e.to_string()))?;
    if &decoded != result {
        return Err(ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compare")
            .with_message("comparison result changed across a JSON round trip"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_pct_sentinel() {
        assert_eq!(area_pct(0.0, 5.0), (1e6, true));
        assert_eq!(area_pct(0.0, -5.0), (-1e6, true));
        assert_eq!(area_pct(0.0, 0.0), (0.0, false));
        assert_eq!(area_pct(200.0, 20.0), (0.1, false));
    }
}
