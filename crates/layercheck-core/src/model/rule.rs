//! Rule-set model and the persisted rule-file format
//!
//! A rule file is a JSON array of objects:
//!
//! ```json
//! [
//!   {"Layer Name": "BLK_n_FLR_n_BLT_UP_AREA", "Color Code": "1, 2", "Type": "Polygon",
//!    "Requirement": "Mandatory", "Feature": "Built-up area"}
//! ]
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::{rgb_to_int, EntityKind};
use crate::errors::{LayerCheckError, Result};
use crate::rules::pattern::cached_regex;

/// How a layer's color is judged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRequirement {
    Any,
    FixedIndex(i32),
    OneOfIndex(Vec<i32>),
    Rgb { r: u8, g: u8, b: u8 },
    /// Valid colors are those used by the document's base-category layers
    DerivedFromSubOccupancy,
}

fn first_integer(part: &str) -> Option<i64> {
    static DIGITS: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&DIGITS, r"\d+")
        .and_then(|re| re.find(part))
        .and_then(|m| m.as_str().parse().ok())
}

impl ColorRequirement {
    /// Interpret a rule file's `"Color Code"` value.
    ///
    /// # Errors
    ///
    /// `InvalidColorCode` for a malformed `RGB` triple, an index outside
    /// `i32`, or a JSON value that is neither string, integer nor null.
    pub fn parse_code(template: &str, code: &Value) -> Result<Self> {
        let invalid = || LayerCheckError::InvalidColorCode {
            template: template.to_string(),
            code: code.to_string(),
        };

        match code {
            Value::Null => Ok(ColorRequirement::Any),
            Value::Number(n) => n
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(ColorRequirement::FixedIndex)
                .ok_or_else(invalid),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() || ["any", "na", "n/a"].iter().any(|k| s.eq_ignore_ascii_case(k)) {
                    return Ok(ColorRequirement::Any);
                }
                if s.to_ascii_lowercase().starts_with("as per sub-occupancy") {
                    return Ok(ColorRequirement::DerivedFromSubOccupancy);
                }
                if let Some(rest) = s
                    .get(..3)
                    .filter(|p| p.eq_ignore_ascii_case("rgb"))
                    .and_then(|_| s.get(3..))
                {
                    let parts: Vec<u8> = rest
                        .split(',')
                        .map(|p| p.trim().parse::<u8>())
                        .collect::<std::result::Result<_, _>>()
                        .map_err(|_| invalid())?;
                    return match parts.as_slice() {
                        [r, g, b] => Ok(ColorRequirement::Rgb {
                            r: *r,
                            g: *g,
                            b: *b,
                        }),
                        _ => Err(invalid()),
                    };
                }

                let mut indices = Vec::new();
                for part in s.split(',') {
                    if let Some(n) = first_integer(part) {
                        indices.push(i32::try_from(n).map_err(|_| invalid())?);
                    }
                }
                Ok(match indices.len() {
                    0 => ColorRequirement::Any,
                    1 => ColorRequirement::FixedIndex(indices[0]),
                    _ => ColorRequirement::OneOfIndex(indices),
                })
            }
            _ => Err(invalid()),
        }
    }

    /// Packed true color for the RGB kind
    pub fn rgb_value(&self) -> Option<u32> {
        match self {
            ColorRequirement::Rgb { r, g, b } => Some(rgb_to_int(*r, *g, *b)),
            _ => None,
        }
    }

    /// Color a repair script should assign, if one can be chosen without
    /// looking at the document.
    pub fn fix_color(&self) -> Option<String> {
        match self {
            ColorRequirement::Any => Some("7".to_string()),
            ColorRequirement::FixedIndex(n) => Some(n.to_string()),
            ColorRequirement::OneOfIndex(list) => list.first().map(|n| n.to_string()),
            ColorRequirement::Rgb { r, g, b } => Some(format!("T {},{},{}", r, g, b)),
            ColorRequirement::DerivedFromSubOccupancy => None,
        }
    }
}

impl std::fmt::Display for ColorRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorRequirement::Any => f.write_str("Any"),
            ColorRequirement::FixedIndex(n) => write!(f, "{}", n),
            ColorRequirement::OneOfIndex(list) => {
                let parts: Vec<String> = list.iter().map(|n| n.to_string()).collect();
                f.write_str(&parts.join(", "))
            }
            ColorRequirement::Rgb { r, g, b } => write!(f, "RGB {},{},{}", r, g, b),
            ColorRequirement::DerivedFromSubOccupancy => f.write_str("As per Sub-Occupancy"),
        }
    }
}

/// Entity type a layer is meant to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleEntityType {
    Polygon,
    Line,
    Text,
    Dimension,
}

impl RuleEntityType {
    /// Unknown or absent type names impose no entity requirement
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        [
            RuleEntityType::Polygon,
            RuleEntityType::Line,
            RuleEntityType::Text,
            RuleEntityType::Dimension,
        ]
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleEntityType::Polygon => "Polygon",
            RuleEntityType::Line => "Line",
            RuleEntityType::Text => "Text",
            RuleEntityType::Dimension => "Dimension",
        }
    }

    pub fn allowed_kinds(&self) -> &'static [EntityKind] {
        match self {
            RuleEntityType::Polygon => &[
                EntityKind::Lwpolyline,
                EntityKind::Polyline,
                EntityKind::Hatch,
                EntityKind::Mpolygon,
            ],
            RuleEntityType::Line => &[EntityKind::Line, EntityKind::Lwpolyline, EntityKind::Polyline],
            RuleEntityType::Text => &[EntityKind::Text, EntityKind::Mtext],
            RuleEntityType::Dimension => &[
                EntityKind::Dimension,
                EntityKind::ArcDimension,
                EntityKind::Leader,
                EntityKind::Mleader,
            ],
        }
    }

    pub fn allows(&self, kind: EntityKind) -> bool {
        self.allowed_kinds().contains(&kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryRequirement {
    pub must_be_closed: bool,
}

/// Expected shape of text content, chosen by layer-name suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextFormat {
    /// `CAPACITY_L`: integer, optional `L`
    Capacity,
    /// `VOLTAGE_KV`: number, optional `KV`
    Voltage,
    /// `_HEIGHT`, `_WIDTH`, `_SLOPE`: number, optional unit letters or `%`
    NumericMeasure,
}

impl TextFormat {
    pub fn for_name(name: &str) -> Option<Self> {
        if name.contains("CAPACITY_L") {
            Some(TextFormat::Capacity)
        } else if name.contains("VOLTAGE_KV") {
            Some(TextFormat::Voltage)
        } else if ["_HEIGHT", "_WIDTH", "_SLOPE"].iter().any(|s| name.contains(s)) {
            Some(TextFormat::NumericMeasure)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequirement {
    pub format: Option<TextFormat>,
    /// All text on the layer must carry one distinct value
    pub single_value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRule {
    pub name_template: String,
    pub feature: Option<String>,
    pub color: ColorRequirement,
    pub entity_type: Option<RuleEntityType>,
    pub geometry: Option<GeometryRequirement>,
    pub text: Option<TextRequirement>,
    pub mandatory: bool,
}

impl LayerRule {
    pub fn new(name_template: impl Into<String>, color: ColorRequirement) -> Self {
        Self {
            name_template: name_template.into(),
            feature: None,
            color,
            entity_type: None,
            geometry: None,
            text: None,
            mandatory: false,
        }
    }

    /// Set the entity type along with the geometry and text requirements
    /// that follow from it.
    pub fn with_entity_type(mut self, entity_type: RuleEntityType) -> Self {
        self.entity_type = Some(entity_type);
        self.geometry = (entity_type == RuleEntityType::Polygon)
            .then_some(GeometryRequirement { must_be_closed: true });
        self.text = if entity_type == RuleEntityType::Text {
            let format = TextFormat::for_name(&self.name_template);
            let single_value = self.name_template.contains("VOLTAGE");
            (format.is_some() || single_value).then_some(TextRequirement { format, single_value })
        } else {
            None
        };
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }
}

#[derive(Debug, Deserialize)]
struct RawRule {
    #[serde(rename = "Layer Name")]
    layer_name: String,
    #[serde(rename = "Color Code", default)]
    color_code: Value,
    #[serde(rename = "Type", default)]
    entity_type: Option<String>,
    #[serde(rename = "Requirement", default)]
    requirement: Option<String>,
    #[serde(rename = "Feature", default)]
    feature: Option<String>,
}

impl RawRule {
    fn into_rule(self, position: usize) -> Result<LayerRule> {
        let template = self.layer_name.trim().to_string();
        if template.is_empty() {
            return Err(LayerCheckError::InvalidRuleSet {
                reason: format!("rule at index {} has an empty layer name", position),
            });
        }

        let color = ColorRequirement::parse_code(&template, &self.color_code)?;
        let mut rule = LayerRule::new(template, color);
        if let Some(t) = self.entity_type.as_deref().and_then(RuleEntityType::parse) {
            rule = rule.with_entity_type(t);
        }
        rule.feature = self.feature.filter(|f| !f.trim().is_empty());
        rule.mandatory = self
            .requirement
            .map(|r| r.trim().to_ascii_lowercase().starts_with("mandatory"))
            .unwrap_or(false);
        Ok(rule)
    }
}

/// Ordered rule collection; earlier rules win on overlapping templates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<LayerRule>,
}

impl RuleSet {
    /// # Errors
    ///
    /// `InvalidRuleSet` if any rule has an empty name template.
    pub fn new(rules: Vec<LayerRule>) -> Result<Self> {
        if let Some(pos) = rules.iter().position(|r| r.name_template.trim().is_empty()) {
            return Err(LayerCheckError::InvalidRuleSet {
                reason: format!("rule at index {} has an empty layer name", pos),
            });
        }
        Ok(Self { rules })
    }

    /// Parse the JSON rule-file format.
    ///
    /// # Errors
    ///
    /// `InvalidRuleSet` when the text is not an array of rule objects or a
    /// rule has no layer name; `InvalidColorCode` for unusable color codes.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Vec<RawRule> = serde_json::from_str(text).map_err(|e| LayerCheckError::InvalidRuleSet {
            reason: e.to_string(),
        })?;
        let rules = raw
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_rule(i))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(rule_count = rules.len(), "rule set parsed");
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[LayerRule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayerRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Templates that appear on more than one rule, in first-seen order
    pub fn duplicate_templates(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for rule in &self.rules {
            *counts.entry(rule.name_template.as_str()).or_default() += 1;
        }
        let mut seen = Vec::new();
        for rule in &self.rules {
            let t = rule.name_template.as_str();
            if counts.get(t).copied().unwrap_or(0) > 1 && !seen.iter().any(|s: &String| s == t) {
                seen.push(t.to_string());
            }
        }
        seen
    }

    pub fn has_derived_color_rules(&self) -> bool {
        self.rules
            .iter()
            .any(|r| r.color == ColorRequirement::DerivedFromSubOccupancy)
    }

    pub fn has_template(&self, template: &str) -> bool {
        self.rules.iter().any(|r| r.name_template == template)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a LayerRule;
    type IntoIter = std::slice::Iter<'a, LayerRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(code: Value) -> ColorRequirement {
        ColorRequirement::parse_code("T", &code).unwrap()
    }

    #[test]
    fn test_color_code_mapping() {
        assert_eq!(parse(json!(null)), ColorRequirement::Any);
        assert_eq!(parse(json!("N/A")), ColorRequirement::Any);
        assert_eq!(parse(json!("")), ColorRequirement::Any);
        assert_eq!(parse(json!(5)), ColorRequirement::FixedIndex(5));
        assert_eq!(parse(json!("5")), ColorRequirement::FixedIndex(5));
        assert_eq!(parse(json!("1 (M)")), ColorRequirement::FixedIndex(1));
        assert_eq!(parse(json!("1, 2, 3")), ColorRequirement::OneOfIndex(vec![1, 2, 3]));
        assert_eq!(parse(json!("RGB 255, 0, 0")), ColorRequirement::Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(
            parse(json!("As per sub-occupancy type")),
            ColorRequirement::DerivedFromSubOccupancy
        );
        assert_eq!(parse(json!("White")), ColorRequirement::Any);
    }

    #[test]
    fn test_malformed_rgb_is_error() {
        let err = ColorRequirement::parse_code("L", &json!("RGB 300,0,0")).unwrap_err();
        assert!(matches!(err, LayerCheckError::InvalidColorCode { .. }));
        let err = ColorRequirement::parse_code("L", &json!("RGB 1,2")).unwrap_err();
        assert!(matches!(err, LayerCheckError::InvalidColorCode { .. }));
    }

    #[test]
    fn test_fix_colors() {
        assert_eq!(ColorRequirement::Any.fix_color().as_deref(), Some("7"));
        assert_eq!(ColorRequirement::OneOfIndex(vec![4, 5]).fix_color().as_deref(), Some("4"));
        assert_eq!(
            ColorRequirement::Rgb { r: 1, g: 2, b: 3 }.fix_color().as_deref(),
            Some("T 1,2,3")
        );
        assert_eq!(ColorRequirement::DerivedFromSubOccupancy.fix_color(), None);
    }

    #[test]
    fn test_rule_file_parsing() {
        let rules = RuleSet::from_json(
            r#"[
                {"Layer Name": "BLK_n_FLR_n_BLT_UP_AREA", "Color Code": "1, 2", "Type": "Polygon",
                 "Requirement": "Mandatory", "Feature": "Built-up"},
                {"Layer Name": "BLK_n_WATER_TANK_CAPACITY_L=n", "Color Code": 3, "Type": "Text"},
                {"Layer Name": "ELECTRIC_VOLTAGE", "Color Code": null, "Type": "Text"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 3);

        let first = &rules.rules()[0];
        assert!(first.mandatory);
        assert_eq!(first.geometry, Some(GeometryRequirement { must_be_closed: true }));
        assert_eq!(first.feature.as_deref(), Some("Built-up"));

        let tank = &rules.rules()[1];
        assert_eq!(tank.text.map(|t| t.format), Some(Some(TextFormat::Capacity)));

        let voltage = &rules.rules()[2];
        assert_eq!(
            voltage.text,
            Some(TextRequirement {
                format: None,
                single_value: true
            })
        );
    }

    #[test]
    fn test_empty_layer_name_is_invalid_rule_set() {
        let err = RuleSet::from_json(r#"[{"Layer Name": "  ", "Color Code": 1}]"#).unwrap_err();
        assert!(matches!(err, LayerCheckError::InvalidRuleSet { .. }));
    }

    #[test]
    fn test_duplicate_templates() {
        let rules = RuleSet::new(vec![
            LayerRule::new("A", ColorRequirement::Any),
            LayerRule::new("B", ColorRequirement::Any),
            LayerRule::new("A", ColorRequirement::FixedIndex(1)),
        ])
        .unwrap();
        assert_eq!(rules.duplicate_templates(), vec!["A".to_string()]);
    }
}
