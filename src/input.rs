//! Input model: drawing tools, cursor affordances, and the interaction state machine.
//!
//! `Tool` captures what a pointer-down on empty canvas will start. `UiState`
//! carries the host-selected tool and colors. `InputState` is the single
//! active interaction; each variant holds exactly the context that
//! interaction needs, so contradictory combinations (dragging while
//! resizing, drawing while accumulating) cannot be represented.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::str::FromStr;

use crate::camera::Point;
use crate::consts::{DEFAULT_FILL, DEFAULT_STROKE};
use crate::error::CanvasError;
use crate::hit::Handle;

/// Which drawing tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Drag out a rectangle from one corner (default).
    #[default]
    Rectangle,
    /// Drag out a circle from its center.
    Circle,
    /// Click vertices, double-click to close.
    Polygon,
    /// Click two endpoints.
    Polyline,
}

impl Tool {
    /// Whether this tool collects clicked points instead of dragging.
    #[must_use]
    pub fn accumulates(self) -> bool {
        matches!(self, Self::Polygon | Self::Polyline)
    }

    /// Lowercase name used by the host toolbar.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Polygon => "polygon",
            Self::Polyline => "polyline",
        }
    }
}

impl FromStr for Tool {
    type Err = CanvasError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Ok(Self::Rectangle),
            "circle" => Ok(Self::Circle),
            "polygon" => Ok(Self::Polygon),
            "polyline" | "line" => Ok(Self::Polyline),
            _ => Err(CanvasError::UnknownTool(raw.to_string())),
        }
    }
}

/// Pointer affordance shown over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Empty canvas.
    #[default]
    Crosshair,
    /// Over a shape body.
    Move,
    /// Over a resize handle.
    Resize,
}

impl Cursor {
    /// CSS `cursor` property value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Crosshair => "crosshair",
            Self::Move => "move",
            Self::Resize => "nwse-resize",
        }
    }
}

/// Host-selected settings visible to the engine and renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Tool used for the next shape.
    pub tool: Tool,
    /// Stroke color stamped on new shapes.
    pub stroke_color: String,
    /// Fill color stamped on new shapes.
    pub fill_color: String,
    /// Affordance last reported to the host.
    pub cursor: Cursor,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            stroke_color: DEFAULT_STROKE.to_string(),
            fill_color: DEFAULT_FILL.to_string(),
            cursor: Cursor::default(),
        }
    }
}

/// The active interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Dragging out a new rectangle or circle from `anchor`.
    Drawing {
        /// Tool that was active at pointer-down.
        tool: Tool,
        /// Shape-space position of the pointer-down.
        anchor: Point,
    },
    /// Moving a stored shape.
    Dragging {
        /// Store index of the shape being moved.
        index: usize,
        /// Pointer minus the shape's anchor at pointer-down.
        offset: Point,
        /// Whether any move has landed yet.
        changed: bool,
    },
    /// Dragging one handle of a stored shape.
    Resizing {
        /// The grabbed handle, including its shape index.
        handle: Handle,
        /// Whether any resize step has been accepted yet.
        changed: bool,
    },
    /// Collecting clicked vertices for a polygon or polyline.
    Accumulating {
        /// `Tool::Polygon` or `Tool::Polyline`.
        tool: Tool,
        /// Points clicked so far, in order.
        points: Vec<Point>,
    },
}

impl InputState {
    /// Fresh accumulation for `tool`.
    #[must_use]
    pub fn accumulating(tool: Tool) -> Self {
        Self::Accumulating { tool, points: Vec::new() }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Points collected so far, empty outside accumulation.
    #[must_use]
    pub fn accumulated_points(&self) -> &[Point] {
        match self {
            Self::Accumulating { points, .. } => points,
            _ => &[],
        }
    }
}
