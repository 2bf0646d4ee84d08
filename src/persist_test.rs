#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::camera::Point;
use crate::doc::{Circle, Polygon, Polyline, Rect, ShapeKind};

const KEY: &str = "ShapesData";

fn rect(x: f64, y: f64, width: f64, height: f64) -> Shape {
    Shape::Rectangle(Rect {
        x,
        y,
        width,
        height,
        stroke_color: Some("#000000".into()),
        fill_color: Some("#FF0000".into()),
    })
}

fn persistence_with(raw: &str) -> Persistence {
    Persistence::new(KEY, Box::new(MemoryStore::new().with_item(KEY, raw)))
}

/// Backend whose every call fails.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, CanvasError> {
        Err(CanvasError::Storage("denied".into()))
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), CanvasError> {
        Err(CanvasError::Storage("quota exceeded".into()))
    }
}

// =============================================================
// MemoryStore
// =============================================================

#[test]
fn memory_store_get_missing_is_none() {
    assert_eq!(MemoryStore::new().get_item("nope").unwrap(), None);
}

#[test]
fn memory_store_set_overwrites() {
    let mut store = MemoryStore::new();
    store.set_item("k", "one").unwrap();
    store.set_item("k", "two").unwrap();
    assert_eq!(store.get_item("k").unwrap().as_deref(), Some("two"));
}

// =============================================================
// save / restore
// =============================================================

#[test]
fn restore_without_slot_is_empty() {
    let persistence = Persistence::new(KEY, Box::new(MemoryStore::new()));
    assert!(persistence.restore().is_empty());
}

#[test]
fn save_then_restore_reproduces_shapes() {
    let shapes = vec![
        rect(10.0, 10.0, 50.0, 30.0),
        Shape::Circle(Circle { x: 100.0, y: 100.0, radius: 30.0, stroke_color: None, fill_color: None }),
        Shape::Polygon(Polygon {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            stroke_color: Some("#111".into()),
            fill_color: Some("#222".into()),
        }),
        Shape::Polyline(Polyline { points: [Point::new(0.0, 0.0), Point::new(50.0, 50.0)], stroke_color: None }),
    ];
    let mut persistence = Persistence::new(KEY, Box::new(MemoryStore::new()));
    persistence.save(&ShapeStore::from(shapes.clone())).unwrap();
    assert_eq!(persistence.restore(), shapes);
}

#[test]
fn save_empty_store_writes_empty_array() {
    let mut persistence = persistence_with(r#"[{"type":"circle","x":0,"y":0,"radius":1}]"#);
    persistence.save(&ShapeStore::new()).unwrap();
    assert_eq!(persistence.raw().unwrap().as_deref(), Some("[]"));
}

#[test]
fn save_uses_configured_key() {
    let mut persistence = Persistence::new("floorplan", Box::new(MemoryStore::new()));
    persistence.save(&ShapeStore::from(vec![rect(0.0, 0.0, 1.0, 1.0)])).unwrap();
    assert_eq!(persistence.key(), "floorplan");
    assert!(persistence.raw().unwrap().is_some());
}

#[test]
fn save_propagates_backend_failure() {
    let mut persistence = Persistence::new(KEY, Box::new(BrokenStore));
    let err = persistence.save(&ShapeStore::new()).unwrap_err();
    assert!(matches!(err, CanvasError::Storage(_)));
}

#[test]
fn restore_with_unreadable_backend_is_empty() {
    let persistence = Persistence::new(KEY, Box::new(BrokenStore));
    assert!(persistence.restore().is_empty());
}

// =============================================================
// Tolerant decoding
// =============================================================

#[test]
fn malformed_json_restores_empty() {
    assert!(persistence_with("{oops").restore().is_empty());
    assert!(persistence_with(r#"{"type":"circle"}"#).restore().is_empty());
}

#[test]
fn bad_records_are_skipped_and_good_ones_kept() {
    let raw = json!([
        { "type": "rectangle", "x": 0, "y": 0, "width": 10, "height": 10 },
        { "type": "triangle", "x": 0, "y": 0 },
        { "type": "circle", "x": 5 },
        "not an object",
        { "type": "circle", "x": 1, "y": 2, "radius": 3 },
    ])
    .to_string();
    let kinds: Vec<ShapeKind> = decode_shapes(&raw).iter().map(Shape::kind).collect();
    assert_eq!(kinds, vec![ShapeKind::Rectangle, ShapeKind::Circle]);
}

#[test]
fn degenerate_records_are_dropped() {
    let raw = json!([
        { "type": "rectangle", "x": 0, "y": 0, "width": 0, "height": 10 },
        { "type": "polygon", "points": [{ "x": 0, "y": 0 }, { "x": 1, "y": 1 }] },
        { "type": "circle", "x": 0, "y": 0, "radius": -1 },
    ])
    .to_string();
    assert!(decode_shapes(&raw).is_empty());
}

#[test]
fn legacy_negative_rectangles_are_normalized() {
    let raw = json!([{ "type": "rectangle", "x": 60, "y": 40, "width": -50, "height": -30 }]).to_string();
    let shapes = decode_shapes(&raw);
    let [Shape::Rectangle(r)] = shapes.as_slice() else {
        panic!("expected one rectangle, got {shapes:?}");
    };
    assert_eq!((r.x, r.y, r.width, r.height), (10.0, 10.0, 50.0, 30.0));
}

#[test]
fn missing_optional_colors_restore() {
    let raw = json!([{ "type": "polygon", "points": [{ "x": 0, "y": 0 }, { "x": 4, "y": 0 }, { "x": 4, "y": 4 }] }]).to_string();
    let shapes = decode_shapes(&raw);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].stroke_color(), None);
}
