use serde::{Deserialize, Serialize};

use super::geometry::Bounds;
use crate::model::{Color, Point};

/// Scrutiny tier of a layer category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTier {
    Other,
    Medium,
    High,
    Critical,
}

/// Regulatory category inferred from keywords in the layer name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerCategory {
    BuiltUpArea,
    CoveredArea,
    PlotBoundary,
    Setback,
    FloorArea,
    Stair,
    Lift,
    BuildingHeight,
    PlinthHeight,
    ParapetHeight,
    BuildingFootprint,
    UnitFloorArea,
    Room,
    Parking,
    Dwelling,
    Other,
}

const KEYWORDS: &[(&str, LayerCategory)] = &[
    ("BLT_UP_AREA", LayerCategory::BuiltUpArea),
    ("COVERED_AREA", LayerCategory::CoveredArea),
    ("PLOT_BOUNDARY", LayerCategory::PlotBoundary),
    ("SETBACK", LayerCategory::Setback),
    ("FLOOR_AREA", LayerCategory::FloorArea),
    ("STAIR", LayerCategory::Stair),
    ("LIFT", LayerCategory::Lift),
    ("HT_OF_BLDG", LayerCategory::BuildingHeight),
    ("PLINTH_HEIGHT", LayerCategory::PlinthHeight),
    ("PARAPET_HT", LayerCategory::ParapetHeight),
    ("BLDG_FOOT_PRINT", LayerCategory::BuildingFootprint),
    ("UNITFA", LayerCategory::UnitFloorArea),
    ("ROOM", LayerCategory::Room),
    ("PARKING", LayerCategory::Parking),
    ("DWELLING", LayerCategory::Dwelling),
];

impl LayerCategory {
    /// First keyword found in the upper-cased name, in tier order
    pub fn classify(layer_name: &str) -> Self {
        let upper = layer_name.to_uppercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| upper.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or(LayerCategory::Other)
    }

    pub fn tier(&self) -> CategoryTier {
        use LayerCategory::*;
        match self {
            BuiltUpArea | CoveredArea | PlotBoundary | Setback | FloorArea => CategoryTier::Critical,
            Stair | Lift | BuildingHeight | PlinthHeight | ParapetHeight | BuildingFootprint => {
                CategoryTier::High
            }
            UnitFloorArea | Room | Parking | Dwelling => CategoryTier::Medium,
            Other => CategoryTier::Other,
        }
    }
}

/// Per-layer metrics of one drawing version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub name: String,
    pub entity_count: usize,
    pub area: f64,
    pub centroid: Option<Point>,
    pub bounds: Option<Bounds>,
    pub assigned_color: Color,
    pub layer_category: LayerCategory,
    pub linetype: String,
    pub visible: bool,
}

impl LayerSnapshot {
    /// Empty snapshot for `name` with category inferred from the name
    pub fn new(name: impl Into<String>, assigned_color: Color) -> Self {
        let name = name.into();
        Self {
            layer_category: LayerCategory::classify(&name),
            name,
            entity_count: 0,
            area: 0.0,
            centroid: None,
            bounds: None,
            assigned_color,
            linetype: "Continuous".to_string(),
            visible: true,
        }
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    pub fn with_centroid(mut self, centroid: Point) -> Self {
        self.centroid = Some(centroid);
        self
    }

    pub fn with_entity_count(mut self, entity_count: usize) -> Self {
        self.entity_count = entity_count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_keyword() {
        assert_eq!(LayerCategory::classify("BLK_1_FLR_0_BLT_UP_AREA"), LayerCategory::BuiltUpArea);
        assert_eq!(LayerCategory::classify("front_setback"), LayerCategory::Setback);
        assert_eq!(LayerCategory::classify("BLK_1_STAIR_2"), LayerCategory::Stair);
        assert_eq!(LayerCategory::classify("GREENERY"), LayerCategory::Other);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(LayerCategory::Setback.tier(), CategoryTier::Critical);
        assert_eq!(LayerCategory::ParapetHeight.tier(), CategoryTier::High);
        assert_eq!(LayerCategory::Parking.tier(), CategoryTier::Medium);
        assert!(CategoryTier::Critical > CategoryTier::High);
    }
}
