//! Document to per-layer snapshot reduction

use std::collections::BTreeMap;

use super::geometry::{entity_area, entity_points, polygon_centroid, Bounds};
use super::model::LayerSnapshot;
use crate::model::{Document, Entity, Point};
use crate::{log_op_end, log_op_start};

/// One polygon's area and (when non-degenerate) centroid
struct Contribution {
    area: f64,
    centroid: Option<Point>,
}

fn contribution(entity: &Entity) -> Option<Contribution> {
    let area = entity_area(entity)?;
    let centroid = if entity.points.len() >= 3 {
        polygon_centroid(&entity.points)
    } else {
        None
    };
    Some(Contribution { area, centroid })
}

/// Sum areas and weight centroids in a fixed order so entity order cannot
/// change floating-point results.
fn summarize(mut parts: Vec<Contribution>) -> (f64, Option<Point>) {
    parts.sort_by(|a, b| {
        let key = |c: &Contribution| c.centroid.map(|p| (p.x, p.y)).unwrap_or((f64::NAN, f64::NAN));
        let (ax, ay) = key(a);
        let (bx, by) = key(b);
        a.area
            .total_cmp(&b.area)
            .then(ax.total_cmp(&bx))
            .then(ay.total_cmp(&by))
    });

    let area = parts.iter().fold(0.0, |acc, c| acc + c.area);

    let weighted: Vec<(f64, Point)> = parts
        .iter()
        .filter_map(|c| c.centroid.map(|p| (c.area, p)))
        .filter(|(a, _)| *a > 0.0)
        .collect();
    let weight: f64 = weighted.iter().map(|(a, _)| a).sum();
    let centroid = (weight > 0.0).then(|| {
        let x: f64 = weighted.iter().map(|(a, p)| a * p.x).sum();
        let y: f64 = weighted.iter().map(|(a, p)| a * p.y).sum();
        Point::new(x / weight, y / weight)
    });

    (area, centroid)
}

fn sorted_points(entities: &[&Entity]) -> Vec<Point> {
    let mut points: Vec<Point> = entities.iter().flat_map(|e| entity_points(*e)).collect();
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points
}

/// Reduce a document to one snapshot per layer, sorted by layer name.
///
/// Entities referencing a layer that the document does not declare are
/// ignored.
pub fn extract(document: &Document) -> Vec<LayerSnapshot> {
    log_op_start!("extract", layer_count = document.layers.len());
    let start = std::time::Instant::now();

    let mut by_layer: BTreeMap<&str, Vec<&Entity>> = BTreeMap::new();
    for entity in &document.entities {
        by_layer.entry(entity.layer.as_str()).or_default().push(entity);
    }

    let mut snapshots: Vec<LayerSnapshot> = document
        .layers
        .iter()
        .map(|layer| {
            let entities = by_layer.get(layer.name.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            let (area, polygon_centroid) = summarize(entities.iter().filter_map(|e| contribution(e)).collect());
            let bounds = Bounds::of(sorted_points(entities));

            let mut snapshot = LayerSnapshot::new(layer.name.clone(), layer.color);
            snapshot.entity_count = entities.len();
            snapshot.area = area;
            snapshot.centroid = polygon_centroid.or_else(|| bounds.map(|b| b.center()));
            snapshot.bounds = bounds;
            snapshot.linetype = layer.linetype.clone();
            snapshot.visible = layer.visible;
            snapshot
        })
        .collect();
    snapshots.sort_by(|a, b| a.name.cmp(&b.name));

    let undeclared = by_layer
        .keys()
        .filter(|name| document.layer(name).is_none())
        .count();
    if undeclared > 0 {
        tracing::warn!(undeclared_layers = undeclared, "entities reference undeclared layers");
    }

    log_op_end!(
        "extract",
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot_count = snapshots.len()
    );
    snapshots
}
