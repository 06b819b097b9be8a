//! Markdown summary of a comparison.

use super::model::{ComparisonResult, Significance};

/// Render a Markdown summary of a [`ComparisonResult`] for review.
///
/// Informational only; the structured result is authoritative.
pub fn render_human_summary(result: &ComparisonResult) -> String {
    let mut out = String::new();
    let s = &result.summary;

    out.push_str("## Drawing Comparison\n\n");
    out.push_str(&format!(
        "**Base**: {}  \n**New**: {}\n\n",
        result.base_version_id.as_deref().unwrap_or("-"),
        result.new_version_id.as_deref().unwrap_or("-")
    ));

    out.push_str("### Summary\n\n");
    out.push_str(&format!(
        "| Layers (base) | Layers (new) | Added | Removed | Modified | Unchanged |\n\
         |---|---|---|---|---|---|\n\
         | {} | {} | {} | {} | {} | {} |\n\n",
        s.total_layers_base, s.total_layers_new, s.added_count, s.removed_count, s.modified_count, s.unchanged_count
    ));
    let by_sig: Vec<String> = [
        Significance::Critical,
        Significance::High,
        Significance::Medium,
        Significance::Low,
    ]
    .iter()
    .map(|sig| format!("{}: {}", sig.label(), s.count(*sig)))
    .collect();
    out.push_str(&format!("**Significance**: {}\n\n", by_sig.join(", ")));

    if !result.insights.is_empty() {
        out.push_str("### Insights\n\n");
        for insight in &result.insights {
            out.push_str(&format!("- {}\n", insight.message()));
        }
        out.push('\n');
    }

    if result.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    if !result.added.is_empty() {
        out.push_str("### Added Layers\n\n");
        for p in &result.added {
            out.push_str(&format!(
                "- `{}` [{}]: {} entities, area {:.2}\n",
                p.layer_name,
                p.significance.label(),
                p.snapshot.entity_count,
                p.snapshot.area
            ));
        }
        out.push('\n');
    }

    if !result.removed.is_empty() {
        out.push_str("### Removed Layers\n\n");
        for p in &result.removed {
            out.push_str(&format!(
                "- `{}` [{}]: had {} entities, area {:.2}\n",
                p.layer_name,
                p.significance.label(),
                p.snapshot.entity_count,
                p.snapshot.area
            ));
        }
        out.push('\n');
    }

    if !result.modified.is_empty() {
        out.push_str("### Modified Layers\n\n");
        out.push_str("| Layer | Significance | Area Δ | Area % | Shift | Entities Δ |\n|---|---|---|---|---|---|\n");
        for c in &result.modified {
            let pct = if c.area_pct_undefined {
                "n/a".to_string()
            } else {
                format!("{:+.1}%", c.area_pct_delta * 100.0)
            };
            out.push_str(&format!(
                "| `{}` | {} | {:+.2} | {} | {:.2} | {:+} |\n",
                c.layer_name,
                c.significance.label(),
                c.area_delta,
                pct,
                c.centroid_shift_distance,
                c.entity_count_delta
            ));
        }
        out.push('\n');
    }

    if !result.property_changes.is_empty() {
        out.push_str("### Property Changes\n\n");
        for p in &result.property_changes {
            out.push_str(&format!("- `{}`: {}\n", p.layer_name(), p.describe()));
        }
        out.push('\n');
    }

    out
}
