//! Color requirement resolution with entity-level fallback

use serde::{Deserialize, Serialize};

use super::derive::OccupancyColors;
use crate::model::{Color, ColorRequirement};

/// Outcome of checking one layer's color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorResolution {
    pub valid: bool,
    /// Failure message, or a note when the entity fallback rescued the layer
    pub reason: Option<String>,
    pub via_entity_fallback: bool,
}

/// Whether a single color satisfies the requirement
pub fn satisfies(requirement: &ColorRequirement, color: &Color, occupancy: &OccupancyColors) -> bool {
    match requirement {
        ColorRequirement::Any => true,
        ColorRequirement::FixedIndex(n) => color.index == *n,
        ColorRequirement::OneOfIndex(list) => list.contains(&color.index),
        ColorRequirement::Rgb { .. } => color.true_color.is_some() && color.true_color == requirement.rgb_value(),
        ColorRequirement::DerivedFromSubOccupancy => occupancy.contains(color),
    }
}

fn expected_text(requirement: &ColorRequirement, occupancy: &OccupancyColors) -> String {
    match requirement {
        ColorRequirement::DerivedFromSubOccupancy if occupancy.is_empty() => {
            "As per Sub-Occupancy (No valid BLT_UP_AREA layers found to define colors)".to_string()
        }
        ColorRequirement::DerivedFromSubOccupancy => {
            format!("As per Sub-Occupancy ({})", occupancy.describe())
        }
        other => other.to_string(),
    }
}

/// Failure message for a layer color that did not satisfy `requirement`
pub fn mismatch_message(requirement: &ColorRequirement, layer_color: &Color, occupancy: &OccupancyColors) -> String {
    let mut msg = format!(
        "Incorrect color. Expected one of: {}, Found: {}",
        expected_text(requirement, occupancy),
        layer_color.index
    );
    if let Some(tc) = layer_color.true_color {
        msg.push_str(&format!(" (True Color {})", tc));
    }
    msg
}

/// Check a layer color against `requirement`.
///
/// When the layer color fails, the layer is still accepted if it has at
/// least one entity and every entity carries an explicit color (neither
/// ByLayer nor ByBlock) that satisfies the requirement.
pub fn resolve(
    requirement: &ColorRequirement,
    layer_color: &Color,
    entity_colors: &[Color],
    occupancy: &OccupancyColors,
) -> ColorResolution {
    if satisfies(requirement, layer_color, occupancy) {
        return ColorResolution {
            valid: true,
            reason: None,
            via_entity_fallback: false,
        };
    }

    let rescued = !entity_colors.is_empty()
        && entity_colors
            .iter()
            .all(|c| c.is_explicit() && satisfies(requirement, c, occupancy));

    if rescued {
        ColorResolution {
            valid: true,
            reason: Some(format!(
                "Layer color {} does not match {}; accepted because all {} entities carry valid explicit colors",
                layer_color,
                expected_text(requirement, occupancy),
                entity_colors.len()
            )),
            via_entity_fallback: true,
        }
    } else {
        ColorResolution {
            valid: false,
            reason: Some(mismatch_message(requirement, layer_color, occupancy)),
            via_entity_fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_index() {
        let occ = OccupancyColors::default();
        let req = ColorRequirement::FixedIndex(2);
        assert!(resolve(&req, &Color::indexed(2), &[], &occ).valid);
        let res = resolve(&req, &Color::indexed(3), &[], &occ);
        assert!(!res.valid);
        assert_eq!(
            res.reason.as_deref(),
            Some("Incorrect color. Expected one of: 2, Found: 3")
        );
    }

    #[test]
    fn test_rgb_requires_true_color() {
        let occ = OccupancyColors::default();
        let req = ColorRequirement::Rgb { r: 255, g: 0, b: 0 };
        assert!(!resolve(&req, &Color::indexed(1), &[], &occ).valid);
        assert!(resolve(&req, &Color::with_true_color(1, 0xFF0000), &[], &occ).valid);
        let res = resolve(&req, &Color::with_true_color(1, 0xFF0001), &[], &occ);
        assert!(res.reason.unwrap_or_default().ends_with("(True Color 16711681)"));
    }

    #[test]
    fn test_fallback_rejects_inherited_colors() {
        let occ = OccupancyColors::default();
        let req = ColorRequirement::FixedIndex(4);
        let entities = [Color::indexed(4), Color::by_layer()];
        assert!(!resolve(&req, &Color::indexed(1), &entities, &occ).valid);
        let entities = [Color::indexed(4), Color::indexed(0)];
        assert!(!resolve(&req, &Color::indexed(1), &entities, &occ).valid);
    }

    #[test]
    fn test_empty_occupancy_message() {
        let occ = OccupancyColors::default();
        let res = resolve(&ColorRequirement::DerivedFromSubOccupancy, &Color::indexed(3), &[], &occ);
        assert!(!res.valid);
        assert!(res
            .reason
            .unwrap_or_default()
            .contains("No valid BLT_UP_AREA layers found to define colors"));
    }
}
