pub mod document;
pub mod rule;

pub use document::{
    rgb_to_int, Color, Document, DocumentUnits, Entity, EntityKind, Layer, Point, BY_BLOCK, BY_LAYER,
};
pub use rule::{
    ColorRequirement, GeometryRequirement, LayerRule, RuleEntityType, RuleSet, TextFormat,
    TextRequirement,
};
