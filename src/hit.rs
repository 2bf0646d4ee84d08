#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{HANDLE_HIT_SLOP, POLYGON_EDGE_EPSILON};
use crate::doc::{HandleKind, Shape, ShapeStore};

/// A resize handle under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    /// Index of the owning shape in the store.
    pub shape_index: usize,
    /// Which control point of that shape.
    pub kind: HandleKind,
}

/// Index of the topmost shape whose body contains `pt`.
///
/// Polylines have no body and are never returned.
#[must_use]
pub fn shape_at(store: &ShapeStore, pt: Point) -> Option<usize> {
    store
        .shapes()
        .iter()
        .rposition(|shape| shape_contains(shape, pt))
}

/// The topmost resize handle within [`HANDLE_HIT_SLOP`] of `pt` on both axes.
///
/// Rectangles offer their four corners, circles their radius handle, and
/// polygons every vertex. Polylines offer none.
#[must_use]
pub fn resize_handle_at(store: &ShapeStore, pt: Point) -> Option<Handle> {
    store.shapes().iter().enumerate().rev().find_map(|(shape_index, shape)| {
        if matches!(shape, Shape::Polyline(_)) {
            return None;
        }
        shape
            .handles()
            .into_iter()
            .find(|(_, at)| near(*at, pt))
            .map(|(kind, _)| Handle { shape_index, kind })
    })
}

/// Whether the body of `shape` contains `pt`.
#[must_use]
pub fn shape_contains(shape: &Shape, pt: Point) -> bool {
    match shape {
        Shape::Rectangle(r) => pt.x >= r.x && pt.x <= r.x + r.width && pt.y >= r.y && pt.y <= r.y + r.height,
        Shape::Circle(c) => Point::new(c.x, c.y).distance(pt) <= c.radius,
        Shape::Polygon(p) => point_in_polygon(pt, &p.points),
        Shape::Polyline(_) => false,
    }
}

/// Ray-casting parity test.
///
/// An edge counts as a crossing when `pt.y` lies on exactly one side of it
/// (strictly above one endpoint, at-or-below the other) and `pt.x` is left of
/// the edge at that height.
#[must_use]
pub fn point_in_polygon(pt: Point, vertices: &[Point]) -> bool {
    let mut inside = false;
    let Some(mut prev) = vertices.last().copied() else {
        return false;
    };
    for &cur in vertices {
        let straddles = (cur.y > pt.y) != (prev.y > pt.y);
        if straddles {
            let x_at_y = (prev.x - cur.x) * (pt.y - cur.y) / (prev.y - cur.y + POLYGON_EDGE_EPSILON) + cur.x;
            if pt.x < x_at_y {
                inside = !inside;
            }
        }
        prev = cur;
    }
    inside
}

fn near(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= HANDLE_HIT_SLOP && (a.y - b.y).abs() <= HANDLE_HIT_SLOP
}
