use super::*;
use crate::doc::HandleKind;

// =============================================================
// Tool
// =============================================================

#[test]
fn default_tool_is_rectangle() {
    assert_eq!(Tool::default(), Tool::Rectangle);
}

#[test]
fn only_polygon_and_polyline_accumulate() {
    assert!(!Tool::Rectangle.accumulates());
    assert!(!Tool::Circle.accumulates());
    assert!(Tool::Polygon.accumulates());
    assert!(Tool::Polyline.accumulates());
}

#[test]
fn tool_parses_toolbar_names() {
    for tool in [Tool::Rectangle, Tool::Circle, Tool::Polygon, Tool::Polyline] {
        assert_eq!(tool.name().parse::<Tool>().unwrap(), tool);
    }
}

#[test]
fn tool_parse_is_case_insensitive() {
    assert_eq!(" Polygon ".parse::<Tool>().unwrap(), Tool::Polygon);
    assert_eq!("RECT".parse::<Tool>().unwrap(), Tool::Rectangle);
}

#[test]
fn tool_parse_rejects_unknown_names() {
    let err = "lasso".parse::<Tool>().unwrap_err();
    assert!(matches!(err, CanvasError::UnknownTool(ref name) if name == "lasso"));
}

// =============================================================
// Cursor
// =============================================================

#[test]
fn cursor_css_values() {
    assert_eq!(Cursor::Crosshair.css(), "crosshair");
    assert_eq!(Cursor::Move.css(), "move");
    assert_eq!(Cursor::Resize.css(), "nwse-resize");
}

#[test]
fn default_cursor_is_crosshair() {
    assert_eq!(Cursor::default(), Cursor::Crosshair);
}

// =============================================================
// UiState
// =============================================================

#[test]
fn ui_state_defaults() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Rectangle);
    assert_eq!(ui.stroke_color, "#000000");
    assert_eq!(ui.fill_color, "#FF0000");
    assert_eq!(ui.cursor, Cursor::Crosshair);
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    let state = InputState::default();
    assert!(state.is_idle());
    assert!(state.accumulated_points().is_empty());
}

#[test]
fn accumulating_starts_empty() {
    let state = InputState::accumulating(Tool::Polygon);
    assert_eq!(state, InputState::Accumulating { tool: Tool::Polygon, points: Vec::new() });
    assert!(!state.is_idle());
}

#[test]
fn accumulated_points_reports_collected_vertices() {
    let state = InputState::Accumulating {
        tool: Tool::Polygon,
        points: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
    };
    assert_eq!(state.accumulated_points(), &[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
}

#[test]
fn non_accumulating_states_report_no_points() {
    let states = [
        InputState::Drawing { tool: Tool::Circle, anchor: Point::new(0.0, 0.0) },
        InputState::Dragging { index: 0, offset: Point::new(1.0, 1.0), changed: false },
        InputState::Resizing { handle: Handle { shape_index: 0, kind: HandleKind::Radius }, changed: false },
    ];
    for state in states {
        assert!(state.accumulated_points().is_empty(), "{state:?}");
    }
}
