use layercheck_core::model::{Color, Document, DocumentUnits, Entity, EntityKind, Layer, Point};

/// Header units that pass every unit check under the default config
#[allow(dead_code)]
pub fn compliant_units() -> DocumentUnits {
    DocumentUnits::new(6, 2, 0, 2)
}

/// Document with compliant units and the given layers and entities
#[allow(dead_code)]
pub fn doc(layers: Vec<Layer>, entities: Vec<Entity>) -> Document {
    Document {
        layers,
        entities,
        units: compliant_units(),
        dxf_version: Some("AC1032".to_string()),
    }
}

#[allow(dead_code)]
pub fn layer(name: &str, index: i32) -> Layer {
    Layer::new(name, Color::indexed(index))
}

/// Closed axis-aligned rectangle on `layer`
#[allow(dead_code)]
pub fn rect(layer: &str, x0: f64, y0: f64, w: f64, h: f64) -> Entity {
    Entity::new(EntityKind::Lwpolyline, layer)
        .with_points(vec![
            Point::new(x0, y0),
            Point::new(x0 + w, y0),
            Point::new(x0 + w, y0 + h),
            Point::new(x0, y0 + h),
        ])
        .closed()
}

/// Three-vertex polyline that does not close
#[allow(dead_code)]
pub fn open_polyline(layer: &str) -> Entity {
    Entity::new(EntityKind::Lwpolyline, layer).with_points(vec![
        Point::new(0.0, 0.0),
        Point::new(5.0, 0.0),
        Point::new(5.0, 5.0),
    ])
}

#[allow(dead_code)]
pub fn text(layer: &str, content: &str) -> Entity {
    Entity::new(EntityKind::Text, layer)
        .with_text(content)
        .with_insert(Point::new(1.0, 1.0))
}
