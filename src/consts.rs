//! Shared numeric and style constants for the drawing surface.

// ── Handles ─────────────────────────────────────────────────────

/// Edge length of a square control-point handle, in shape units.
pub const HANDLE_SIZE: f64 = 8.0;

/// Per-axis distance from a control point that still counts as a handle hit.
pub const HANDLE_HIT_SLOP: f64 = HANDLE_SIZE / 2.0;

/// Fill used for every drawn handle.
pub const HANDLE_FILL: &str = "rgba(0, 0, 255, 0.5)";

// ── Geometry ────────────────────────────────────────────────────

/// Added to the ray-casting denominator so horizontal edges never divide by zero.
pub const POLYGON_EDGE_EPSILON: f64 = 0.000_01;

/// Fewest vertices a committed polygon may have.
pub const MIN_POLYGON_VERTICES: usize = 3;

// ── Zoom ────────────────────────────────────────────────────────

/// Multiplicative step applied by one zoom-in (and divided out by one zoom-out).
pub const DEFAULT_ZOOM_STEP: f64 = 1.05;

// ── Colors ──────────────────────────────────────────────────────

/// Stroke used when a stored shape carries no stroke color.
pub const FALLBACK_STROKE: &str = "#000000";

/// Fill used when a stored shape carries no fill color.
pub const FALLBACK_FILL: &str = "#FFFFFF";

/// Stroke color assigned to newly drawn shapes until the host picks another.
pub const DEFAULT_STROKE: &str = "#000000";

/// Fill color assigned to newly drawn shapes until the host picks another.
pub const DEFAULT_FILL: &str = "#FF0000";

// ── Persistence ─────────────────────────────────────────────────

/// Key-value slot holding the serialized shape array.
pub const DEFAULT_STORAGE_KEY: &str = "ShapesData";

/// Background image drawn beneath every shape.
pub const DEFAULT_BACKGROUND_URL: &str = "assets/room.svg";
