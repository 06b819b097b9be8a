use super::model::{ComparisonSummary, Insight, LayerChange, LayerPresence, PropertyChange};
use crate::config::InsightThresholds;
use crate::snapshot::{CategoryTier, LayerCategory};

const STRUCTURE_KEYWORDS: &[&str] = &["STAIR", "LIFT", "ROOM"];

/// Derive compliance insights in a fixed order: per-layer critical-tier
/// area changes (by layer name), net area, setbacks, new structures,
/// critical count, then the overall verdict.
pub fn generate_insights(
    added: &[LayerPresence],
    removed: &[LayerPresence],
    modified: &[LayerChange],
    property_changes: &[PropertyChange],
    summary: &ComparisonSummary,
    t: &InsightThresholds,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    for change in modified.iter().filter(|c| c.category.tier() == CategoryTier::Critical) {
        if change.area_pct_delta > t.critical_pct {
            insights.push(Insight::CriticalAreaIncrease {
                layer_name: change.layer_name.clone(),
                pct: change.area_pct_delta,
            });
        } else if change.area_pct_delta < -t.critical_pct {
            insights.push(Insight::CriticalAreaDecrease {
                layer_name: change.layer_name.clone(),
                pct: change.area_pct_delta,
            });
        }
    }

    let net_area = modified.iter().map(|c| c.area_delta).sum::<f64>() + added.iter().map(|p| p.snapshot.area).sum::<f64>()
        - removed.iter().map(|p| p.snapshot.area).sum::<f64>();
    if net_area > t.net_area {
        insights.push(Insight::NetAreaIncrease { area: net_area });
    } else if net_area < -t.net_area {
        insights.push(Insight::NetAreaDecrease { area: net_area });
    }

    let shifted = modified
        .iter()
        .filter(|c| c.category == LayerCategory::Setback && c.centroid_shift_distance > t.setback_shift)
        .count();
    if shifted > 0 {
        insights.push(Insight::SetbacksShifted { count: shifted });
    }

    let structures = added
        .iter()
        .filter(|p| {
            let upper = p.layer_name.to_uppercase();
            STRUCTURE_KEYWORDS.iter().any(|k| upper.contains(k))
        })
        .count();
    if structures > 0 {
        insights.push(Insight::StructuresAdded { count: structures });
    }

    if summary.critical_changes > 0 {
        insights.push(Insight::CriticalChanges {
            count: summary.critical_changes,
        });
    }

    if added.is_empty() && removed.is_empty() && modified.is_empty() && property_changes.is_empty() {
        insights.push(Insight::NoChanges);
    } else if summary.critical_changes == 0 && summary.high_changes == 0 {
        insights.push(Insight::MinorChangesOnly);
    }

    insights
}
