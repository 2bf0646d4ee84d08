//! Document model: shape records, their geometry rules, and the in-memory store.
//!
//! `Shape` is the persisted union of the four drawable kinds. Each variant
//! wraps a plain struct so geometry helpers can be written per kind, and the
//! serde representation (`{"type": "rectangle", "x": ..., "strokeColor": ...}`)
//! matches blobs written by earlier versions of the tool.
//!
//! Geometry lives here rather than in `hit` because the renderer, the
//! hit-tester, and the interaction engine all need the same control points:
//! `Shape::handles` is the single source for where a handle sits.
//!
//! `ShapeStore` owns committed shapes in insertion order, which doubles as
//! z-order (first = bottom).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::MIN_POLYGON_VERTICES;

/// Discriminant of a [`Shape`], used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Polygon,
    Polyline,
}

/// Corner of a rectangle, used as a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Which control point of a shape a handle represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// One of the four rectangle corners.
    Corner(Corner),
    /// The single circle handle at `(x + radius, y)`.
    Radius,
    /// A polygon or polyline vertex, by position in the point list.
    Vertex(usize),
}

/// Axis-aligned rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

/// Circle. `x`/`y` is the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

/// Closed polygon through `points` in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

/// Open two-point segment. Stroked only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polyline {
    pub points: [Point; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
}

/// A drawable shape as stored and persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rect),
    Circle(Circle),
    Polygon(Polygon),
    Polyline(Polyline),
}

impl Rect {
    /// Flip negative extents into a positive top-left form. Zero-area or
    /// non-finite rectangles yield `None`.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let finite = [self.x, self.y, self.width, self.height].iter().all(|v| v.is_finite());
        if !finite || self.width == 0.0 || self.height == 0.0 {
            return None;
        }
        Some(Self {
            x: self.x.min(self.x + self.width),
            y: self.y.min(self.y + self.height),
            width: self.width.abs(),
            height: self.height.abs(),
            ..self
        })
    }

    /// Drag `corner` to `pointer`, keeping the opposite corner fixed.
    ///
    /// Rejected (returns `false`, geometry untouched) when the result would
    /// have non-positive width or height.
    pub fn resize(&mut self, corner: Corner, pointer: Point) -> bool {
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        let (x, y, width, height) = match corner {
            Corner::TopLeft => (pointer.x, pointer.y, right - pointer.x, bottom - pointer.y),
            Corner::TopRight => (self.x, pointer.y, pointer.x - self.x, bottom - pointer.y),
            Corner::BottomLeft => (pointer.x, self.y, right - pointer.x, pointer.y - self.y),
            Corner::BottomRight => (self.x, self.y, pointer.x - self.x, pointer.y - self.y),
        };
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        true
    }
}

impl Circle {
    /// Set the radius to the distance from the center to `pointer`.
    ///
    /// Rejected when that distance is not positive.
    pub fn resize(&mut self, pointer: Point) -> bool {
        let radius = Point::new(self.x, self.y).distance(pointer);
        if radius <= 0.0 {
            return false;
        }
        self.radius = radius;
        true
    }
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Polygon(_) => ShapeKind::Polygon,
            Self::Polyline(_) => ShapeKind::Polyline,
        }
    }

    /// Stroke color, if the record carries one.
    #[must_use]
    pub fn stroke_color(&self) -> Option<&str> {
        match self {
            Self::Rectangle(r) => r.stroke_color.as_deref(),
            Self::Circle(c) => c.stroke_color.as_deref(),
            Self::Polygon(p) => p.stroke_color.as_deref(),
            Self::Polyline(l) => l.stroke_color.as_deref(),
        }
    }

    /// Fill color, if the record carries one. Polylines are never filled.
    #[must_use]
    pub fn fill_color(&self) -> Option<&str> {
        match self {
            Self::Rectangle(r) => r.fill_color.as_deref(),
            Self::Circle(c) => c.fill_color.as_deref(),
            Self::Polygon(p) => p.fill_color.as_deref(),
            Self::Polyline(_) => None,
        }
    }

    /// The point a drag keeps under the cursor: rectangle top-left, circle
    /// center, first vertex otherwise.
    #[must_use]
    pub fn anchor(&self) -> Point {
        match self {
            Self::Rectangle(r) => Point::new(r.x, r.y),
            Self::Circle(c) => Point::new(c.x, c.y),
            Self::Polygon(p) => p.points.first().copied().unwrap_or_default(),
            Self::Polyline(l) => l.points[0],
        }
    }

    /// Translate the whole shape so its anchor lands on `target`.
    pub fn move_anchor_to(&mut self, target: Point) {
        let delta = target - self.anchor();
        match self {
            Self::Rectangle(r) => {
                r.x += delta.x;
                r.y += delta.y;
            }
            Self::Circle(c) => {
                c.x += delta.x;
                c.y += delta.y;
            }
            Self::Polygon(p) => {
                for pt in &mut p.points {
                    *pt = *pt + delta;
                }
            }
            Self::Polyline(l) => {
                for pt in &mut l.points {
                    *pt = *pt + delta;
                }
            }
        }
    }

    /// Control points in their fixed order.
    ///
    /// Rectangles: top-left, top-right, bottom-left, bottom-right. Circles:
    /// the radius handle at `(x + radius, y)`. Polygons and polylines: every
    /// vertex.
    #[must_use]
    pub fn handles(&self) -> Vec<(HandleKind, Point)> {
        match self {
            Self::Rectangle(r) => vec![
                (HandleKind::Corner(Corner::TopLeft), Point::new(r.x, r.y)),
                (HandleKind::Corner(Corner::TopRight), Point::new(r.x + r.width, r.y)),
                (HandleKind::Corner(Corner::BottomLeft), Point::new(r.x, r.y + r.height)),
                (HandleKind::Corner(Corner::BottomRight), Point::new(r.x + r.width, r.y + r.height)),
            ],
            Self::Circle(c) => vec![(HandleKind::Radius, Point::new(c.x + c.radius, c.y))],
            Self::Polygon(p) => vertex_handles(&p.points),
            Self::Polyline(l) => vertex_handles(&l.points),
        }
    }

    /// Apply the resize rule for `handle` with the pointer at `pointer`.
    ///
    /// Returns `true` when the geometry changed. Vertex handles are not
    /// resizable and always return `false`, as does a handle that does not
    /// belong to this kind of shape.
    pub fn resize(&mut self, handle: HandleKind, pointer: Point) -> bool {
        match (self, handle) {
            (Self::Rectangle(r), HandleKind::Corner(corner)) => r.resize(corner, pointer),
            (Self::Circle(c), HandleKind::Radius) => c.resize(pointer),
            _ => false,
        }
    }

    /// Gate applied at commit and restore time.
    ///
    /// Rejects zero-area rectangles, circles without a finite non-negative
    /// radius, and polygons with fewer than three vertices. Negative
    /// rectangle extents are flipped.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        match self {
            Self::Rectangle(r) => r.normalized().map(Self::Rectangle),
            Self::Circle(c) => {
                let valid = c.x.is_finite() && c.y.is_finite() && c.radius.is_finite() && c.radius >= 0.0;
                if valid { Some(Self::Circle(c)) } else { None }
            }
            Self::Polygon(p) => {
                if p.points.len() >= MIN_POLYGON_VERTICES { Some(Self::Polygon(p)) } else { None }
            }
            Self::Polyline(l) => Some(Self::Polyline(l)),
        }
    }
}

fn vertex_handles(points: &[Point]) -> Vec<(HandleKind, Point)> {
    points
        .iter()
        .enumerate()
        .map(|(i, pt)| (HandleKind::Vertex(i), *pt))
        .collect()
}

/// Ordered store of committed shapes.
///
/// Append-only apart from a full clear. Index order is z-order: hit-testing
/// walks it backwards, rendering forwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Append a committed shape on top of the stack.
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Replace all shapes with a restored snapshot.
    pub fn load_snapshot(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    /// All shapes, bottom first.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl From<Vec<Shape>> for ShapeStore {
    fn from(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }
}
