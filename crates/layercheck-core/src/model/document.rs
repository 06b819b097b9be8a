use serde::{Deserialize, Serialize};

use crate::errors::{LayerCheckError, Result};

/// Color index meaning "inherit from layer"
pub const BY_LAYER: i32 = 256;
/// Color index meaning "inherit from enclosing block"
pub const BY_BLOCK: i32 = 0;

/// A parsed drawing, as handed over by an external parser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub units: DocumentUnits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dxf_version: Option<String>,
}

impl Document {
    /// Parse a document from its JSON interchange form.
    ///
    /// # Errors
    ///
    /// `Serialization` when the JSON does not fit the document model,
    /// `InvalidDocument` when a layer has an empty name.
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(text)?;
        if let Some(pos) = doc.layers.iter().position(|l| l.name.is_empty()) {
            return Err(LayerCheckError::InvalidDocument {
                reason: format!("layer at index {} has an empty name", pos),
            });
        }
        Ok(doc)
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn entities_on<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.layer == layer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub color: Color,
    #[serde(default = "default_linetype")]
    pub linetype: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_linetype() -> String {
    "Continuous".to_string()
}

fn default_visible() -> bool {
    true
}

impl Layer {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            linetype: default_linetype(),
            visible: true,
        }
    }
}

/// Indexed color plus optional 24-bit true color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_color: Option<u32>,
}

impl Color {
    pub fn indexed(index: i32) -> Self {
        Self {
            index,
            true_color: None,
        }
    }

    pub fn with_true_color(index: i32, true_color: u32) -> Self {
        Self {
            index,
            true_color: Some(true_color),
        }
    }

    pub fn by_layer() -> Self {
        Self::indexed(BY_LAYER)
    }

    pub fn is_by_layer(&self) -> bool {
        self.index == BY_LAYER
    }

    pub fn is_by_block(&self) -> bool {
        self.index == BY_BLOCK
    }

    /// An entity color that does not inherit from its layer or block
    pub fn is_explicit(&self) -> bool {
        !self.is_by_layer() && !self.is_by_block()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::by_layer()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index)?;
        if let Some(tc) = self.true_color {
            write!(f, " (True Color {})", tc)?;
        }
        Ok(())
    }
}

/// Pack an RGB triple the way drawing files store true colors
pub fn rgb_to_int(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Lwpolyline,
    Polyline,
    Hatch,
    Mpolygon,
    Line,
    Text,
    Mtext,
    Dimension,
    ArcDimension,
    Leader,
    Mleader,
    Circle,
    Arc,
    Insert,
    Point,
    #[serde(other)]
    Other,
}

impl EntityKind {
    /// Drawing-file type name
    pub fn dxf_name(&self) -> &'static str {
        match self {
            EntityKind::Lwpolyline => "LWPOLYLINE",
            EntityKind::Polyline => "POLYLINE",
            EntityKind::Hatch => "HATCH",
            EntityKind::Mpolygon => "MPOLYGON",
            EntityKind::Line => "LINE",
            EntityKind::Text => "TEXT",
            EntityKind::Mtext => "MTEXT",
            EntityKind::Dimension => "DIMENSION",
            EntityKind::ArcDimension => "ARC_DIMENSION",
            EntityKind::Leader => "LEADER",
            EntityKind::Mleader => "MLEADER",
            EntityKind::Circle => "CIRCLE",
            EntityKind::Arc => "ARC",
            EntityKind::Insert => "INSERT",
            EntityKind::Point => "POINT",
            EntityKind::Other => "OTHER",
        }
    }

    pub fn is_polyline(&self) -> bool {
        matches!(self, EntityKind::Lwpolyline | EntityKind::Polyline)
    }

    /// Region-like entities whose area is stored or derived from a boundary
    pub fn is_region(&self) -> bool {
        matches!(self, EntityKind::Hatch | EntityKind::Mpolygon)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, EntityKind::Text | EntityKind::Mtext)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dxf_name())
    }
}

/// A drawing entity reduced to what validation and snapshots need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub layer: String,
    #[serde(default)]
    pub color: Color,
    /// Vertices, boundary points or endpoints
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub closed: bool,
    /// Area reported by the parser (hatches, multi-polygons)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Entity {
    pub fn new(kind: EntityKind, layer: impl Into<String>) -> Self {
        Self {
            kind,
            layer: layer.into(),
            color: Color::by_layer(),
            points: Vec::new(),
            closed: false,
            area: None,
            insert: None,
            text: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = points;
        self
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_insert(mut self, insert: Point) -> Self {
        self.insert = Some(insert);
        self
    }

    /// Closed flag set, a region kind, or more than two points with first == last
    pub fn is_closed_shape(&self) -> bool {
        if self.closed || self.kind.is_region() {
            return true;
        }
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 2 && first == last,
            _ => false,
        }
    }
}

/// Document header unit variables. Missing values read as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentUnits {
    pub insertion_units: i32,
    pub linear_units: i32,
    pub angular_units: i32,
    pub linear_precision: i32,
}

impl DocumentUnits {
    pub fn new(insertion_units: i32, linear_units: i32, angular_units: i32, linear_precision: i32) -> Self {
        Self {
            insertion_units,
            linear_units,
            angular_units,
            linear_precision,
        }
    }
}
