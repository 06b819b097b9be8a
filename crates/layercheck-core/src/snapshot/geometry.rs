//! Planar geometry helpers for area, centroid and bounds

use serde::{Deserialize, Serialize};

use crate::model::{Entity, Point};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_point(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    pub fn extend(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Bounds over `points`, `None` when empty
    pub fn of<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Bounds::from_point(iter.next()?);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }
}

/// Signed shoelace area; counter-clockwise rings are positive
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

/// Centroid of a simple polygon, `None` for degenerate rings
pub fn polygon_centroid(points: &[Point]) -> Option<Point> {
    let a = signed_area(points);
    if a.abs() < f64::EPSILON {
        return None;
    }
    let n = points.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    Some(Point::new(cx / (6.0 * a), cy / (6.0 * a)))
}

/// Area contributed by one entity.
///
/// Closed polylines with at least three points use the shoelace formula;
/// hatches and multi-polygons use their stored area, else their boundary.
pub fn entity_area(entity: &Entity) -> Option<f64> {
    if entity.kind.is_polyline() {
        if entity.is_closed_shape() && entity.points.len() >= 3 {
            return Some(signed_area(&entity.points).abs());
        }
        return None;
    }
    if entity.kind.is_region() {
        return match entity.area {
            Some(a) => Some(a.abs()),
            None if entity.points.len() >= 3 => Some(signed_area(&entity.points).abs()),
            None => None,
        };
    }
    None
}

/// Every coordinate an entity occupies
pub fn entity_points(entity: &Entity) -> impl Iterator<Item = Point> + '_ {
    entity.points.iter().copied().chain(entity.insert)
}
