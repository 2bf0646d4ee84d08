use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::{Camera, Point};
use crate::config::CanvasConfig;
use crate::consts::{DEFAULT_STORAGE_KEY, DEFAULT_ZOOM_STEP, MIN_POLYGON_VERTICES};
use crate::doc::{Circle, Polygon, Polyline, Rect, Shape, ShapeStore};
use crate::error::CanvasError;
use crate::hit;
use crate::input::{Cursor, InputState, Tool, UiState};
use crate::persist::{KeyValueStore, LocalStorage, MemoryStore, Persistence};
use crate::render::{self, Scene};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The pointer affordance changed.
    SetCursor(Cursor),
    /// Visible state changed; redraw.
    RenderNeeded,
    /// A shape was appended to the store and persisted.
    ShapeCommitted(Shape),
    /// The store was emptied and persisted.
    Cleared,
}

/// Engine state and logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without a browser.
pub struct EngineCore {
    pub store: ShapeStore,
    pub preview: Option<Shape>,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub persistence: Persistence,
    zoom_step: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            store: ShapeStore::new(),
            preview: None,
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            persistence: Persistence::new(DEFAULT_STORAGE_KEY, Box::new(MemoryStore::new())),
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a core from `config`, persisting through `backend`, and restore
    /// whatever the backend already holds.
    #[must_use]
    pub fn with_config(config: &CanvasConfig, backend: Box<dyn KeyValueStore>) -> Self {
        let mut core = Self {
            persistence: Persistence::new(config.storage_key.clone(), backend),
            zoom_step: config.zoom_step,
            ..Self::default()
        };
        core.ui.stroke_color.clone_from(&config.stroke_color);
        core.ui.fill_color.clone_from(&config.fill_color);
        core.restore();
        core
    }

    // --- Data inputs ---

    /// Replace the store with the persisted snapshot.
    pub fn restore(&mut self) {
        let shapes = self.persistence.restore();
        log::info!("restored {} shapes from {}", shapes.len(), self.persistence.key());
        self.store.load_snapshot(shapes);
    }

    // --- Tool / style ---

    /// Switch the drawing tool, dropping any in-progress accumulation.
    ///
    /// Polygon and polyline immediately start a fresh accumulation.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        let was_accumulating = matches!(self.input, InputState::Accumulating { .. });
        if tool.accumulates() {
            self.input = InputState::accumulating(tool);
        } else if was_accumulating {
            self.input = InputState::Idle;
        }
        if was_accumulating && self.preview.take().is_some() {
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    /// Stroke color for shapes drawn from now on.
    pub fn set_stroke_color(&mut self, color: &str) {
        color.clone_into(&mut self.ui.stroke_color);
    }

    /// Fill color for shapes drawn from now on.
    pub fn set_fill_color(&mut self, color: &str) {
        color.clone_into(&mut self.ui.fill_color);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point) -> Vec<Action> {
        let pt = self.camera.screen_to_world(screen_pt);

        if let InputState::Accumulating { tool, points } = &mut self.input {
            points.push(pt);
            if *tool == Tool::Polyline && points.len() == 2 {
                let segment = [points[0], points[1]];
                points.clear();
                self.preview = None;
                let shape = Shape::Polyline(Polyline { points: segment, stroke_color: Some(self.ui.stroke_color.clone()) });
                return self.commit(shape);
            }
            return vec![Action::RenderNeeded];
        }

        if let Some(handle) = hit::resize_handle_at(&self.store, pt) {
            self.input = InputState::Resizing { handle, changed: false };
            return Vec::new();
        }

        if let Some(index) = hit::shape_at(&self.store, pt) {
            if let Some(shape) = self.store.get(index) {
                self.input = InputState::Dragging { index, offset: pt - shape.anchor(), changed: false };
                return Vec::new();
            }
        }

        self.input = InputState::Drawing { tool: self.ui.tool, anchor: pt };
        self.preview = None;
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let pt = self.camera.screen_to_world(screen_pt);
        let mut actions = self.update_cursor(pt);

        match &mut self.input {
            InputState::Idle => {}
            InputState::Resizing { handle, changed } => {
                if let Some(shape) = self.store.get_mut(handle.shape_index) {
                    *changed |= shape.resize(handle.kind, pt);
                }
                actions.push(Action::RenderNeeded);
            }
            InputState::Dragging { index, offset, changed } => {
                if let Some(shape) = self.store.get_mut(*index) {
                    shape.move_anchor_to(pt - *offset);
                    *changed = true;
                }
                actions.push(Action::RenderNeeded);
            }
            InputState::Drawing { tool, anchor } => {
                self.preview = drag_preview(*tool, *anchor, pt, &self.ui);
                if self.preview.is_some() {
                    actions.push(Action::RenderNeeded);
                }
            }
            InputState::Accumulating { tool, points } => {
                if !points.is_empty() {
                    self.preview = accumulation_preview(*tool, points, pt, &self.ui);
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Resizing { changed, .. } | InputState::Dragging { changed, .. } => {
                if changed {
                    self.flush();
                }
                Vec::new()
            }
            InputState::Drawing { .. } => match self.preview.take().and_then(Shape::normalized) {
                Some(shape) => self.commit(shape),
                None => vec![Action::RenderNeeded],
            },
            accumulating @ InputState::Accumulating { .. } => {
                self.input = accumulating;
                Vec::new()
            }
        }
    }

    /// Finish a polygon (three or more points) or polyline (exactly two).
    ///
    /// The double-click position is appended unless it repeats the last
    /// point, and consecutive duplicates collapse, since the two clicks of a
    /// double-click already landed as pointer-downs.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let pt = self.camera.screen_to_world(screen_pt);
        let InputState::Accumulating { tool, points } = &mut self.input else {
            return Vec::new();
        };
        if points.last() != Some(&pt) {
            points.push(pt);
        }
        points.dedup();

        let shape = match (*tool, points.as_slice()) {
            (Tool::Polygon, pts) if pts.len() >= MIN_POLYGON_VERTICES => Shape::Polygon(Polygon {
                points: pts.to_vec(),
                stroke_color: Some(self.ui.stroke_color.clone()),
                fill_color: Some(self.ui.fill_color.clone()),
            }),
            (Tool::Polyline, &[a, b]) => {
                Shape::Polyline(Polyline { points: [a, b], stroke_color: Some(self.ui.stroke_color.clone()) })
            }
            _ => return Vec::new(),
        };

        self.input = InputState::Idle;
        self.preview = None;
        self.commit(shape)
    }

    /// Remove every shape and any work in progress.
    pub fn clear(&mut self) -> Vec<Action> {
        self.store.clear();
        self.preview = None;
        self.input = InputState::Idle;
        self.flush();
        vec![Action::Cleared, Action::RenderNeeded]
    }

    // --- Zoom ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.camera.zoom_in(self.zoom_step);
        vec![Action::RenderNeeded]
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.camera.zoom_out(self.zoom_step);
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    /// Committed shapes, bottom first.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    /// The in-progress shape, if any.
    #[must_use]
    pub fn preview(&self) -> Option<&Shape> {
        self.preview.as_ref()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// The affordance last reported to the host.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.ui.cursor
    }

    // --- Internals ---

    fn update_cursor(&mut self, pt: Point) -> Vec<Action> {
        let cursor = if hit::resize_handle_at(&self.store, pt).is_some() {
            Cursor::Resize
        } else if hit::shape_at(&self.store, pt).is_some() {
            Cursor::Move
        } else {
            Cursor::Crosshair
        };
        if cursor == self.ui.cursor {
            return Vec::new();
        }
        self.ui.cursor = cursor;
        vec![Action::SetCursor(cursor)]
    }

    fn commit(&mut self, shape: Shape) -> Vec<Action> {
        log::debug!("committing {:?}", shape.kind());
        self.store.push(shape.clone());
        self.flush();
        vec![Action::ShapeCommitted(shape), Action::RenderNeeded]
    }

    fn flush(&mut self) {
        if let Err(err) = self.persistence.save(&self.store) {
            log::warn!("failed to persist shapes: {err}");
        }
    }
}

/// Preview for a rectangle or circle dragged from `anchor` to `pt`.
fn drag_preview(tool: Tool, anchor: Point, pt: Point, ui: &UiState) -> Option<Shape> {
    let stroke_color = Some(ui.stroke_color.clone());
    let fill_color = Some(ui.fill_color.clone());
    match tool {
        Tool::Rectangle => Some(Shape::Rectangle(Rect {
            x: anchor.x,
            y: anchor.y,
            width: pt.x - anchor.x,
            height: pt.y - anchor.y,
            stroke_color,
            fill_color,
        })),
        Tool::Circle => Some(Shape::Circle(Circle {
            x: anchor.x,
            y: anchor.y,
            radius: anchor.distance(pt),
            stroke_color,
            fill_color,
        })),
        Tool::Polygon | Tool::Polyline => None,
    }
}

/// Preview for the accumulated points plus the pointer.
fn accumulation_preview(tool: Tool, points: &[Point], pt: Point, ui: &UiState) -> Option<Shape> {
    match tool {
        Tool::Polygon => {
            let mut pts = points.to_vec();
            pts.push(pt);
            Some(Shape::Polygon(Polygon {
                points: pts,
                stroke_color: Some(ui.stroke_color.clone()),
                fill_color: Some(ui.fill_color.clone()),
            }))
        }
        Tool::Polyline => points.first().map(|&first| {
            Shape::Polyline(Polyline { points: [first, pt], stroke_color: Some(ui.stroke_color.clone()) })
        }),
        Tool::Rectangle | Tool::Circle => None,
    }
}

/// Background image and where it is fetched from.
struct Background {
    image: HtmlImageElement,
    url: String,
}

impl Background {
    /// Whether the image has decoded and can be drawn.
    fn ready(&self) -> bool {
        self.image.complete() && self.image.natural_width() > 0
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background: Option<Background>,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to `canvas`, restoring shapes from local storage.
    ///
    /// Falls back to in-memory storage when local storage is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ContextUnavailable`] if the canvas has no 2D
    /// context, or [`CanvasError::Render`] if the background image element
    /// cannot be created.
    pub fn new(canvas: HtmlCanvasElement, config: &CanvasConfig) -> Result<Self, CanvasError> {
        let ctx = match canvas.get_context("2d") {
            Ok(Some(obj)) => obj
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| CanvasError::ContextUnavailable)?,
            Ok(None) => return Err(CanvasError::ContextUnavailable),
            Err(err) => return Err(CanvasError::render(&err)),
        };

        let backend: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(err) => {
                log::warn!("{err}; shapes will not survive a reload");
                Box::new(MemoryStore::new())
            }
        };

        let background = match &config.background_url {
            Some(url) => Some(Background {
                image: HtmlImageElement::new().map_err(|e| CanvasError::render(&e))?,
                url: url.clone(),
            }),
            None => None,
        };

        Ok(Self { canvas, ctx, background, core: EngineCore::with_config(config, backend) })
    }

    // --- Background ---

    /// The background image element, for wiring its load callback.
    #[must_use]
    pub fn background_image(&self) -> Option<&HtmlImageElement> {
        self.background.as_ref().map(|bg| &bg.image)
    }

    /// Start fetching the background. Completion is reported through
    /// [`Engine::background_loaded`].
    pub fn load_background(&self) {
        if let Some(bg) = &self.background {
            log::debug!("loading background {}", bg.url);
            bg.image.set_src(&bg.url);
        }
    }

    /// Redraw once the background has arrived.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if the redraw fails.
    pub fn background_loaded(&self) -> Result<(), CanvasError> {
        log::debug!("background ready");
        self.render()
    }

    // --- Delegated inputs ---

    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if a resulting redraw fails.
    pub fn set_tool(&mut self, tool: Tool) -> Result<(), CanvasError> {
        let actions = self.core.set_tool(tool);
        self.dispatch(actions)
    }

    pub fn set_stroke_color(&mut self, color: &str) {
        self.core.set_stroke_color(color);
    }

    pub fn set_fill_color(&mut self, color: &str) {
        self.core.set_fill_color(color);
    }

    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if a resulting redraw fails.
    pub fn on_pointer_down(&mut self, screen_pt: Point) -> Result<(), CanvasError> {
        let actions = self.core.on_pointer_down(screen_pt);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if a resulting redraw fails.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Result<(), CanvasError> {
        let actions = self.core.on_pointer_move(screen_pt);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if a resulting redraw fails.
    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Result<(), CanvasError> {
        let actions = self.core.on_pointer_up(screen_pt);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if a resulting redraw fails.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Result<(), CanvasError> {
        let actions = self.core.on_double_click(screen_pt);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if the redraw fails.
    pub fn clear(&mut self) -> Result<(), CanvasError> {
        let actions = self.core.clear();
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if the redraw fails.
    pub fn zoom_in(&mut self) -> Result<(), CanvasError> {
        let actions = self.core.zoom_in();
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if the redraw fails.
    pub fn zoom_out(&mut self) -> Result<(), CanvasError> {
        let actions = self.core.zoom_out();
        self.dispatch(actions)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), CanvasError> {
        let background = self.background.as_ref().filter(|bg| bg.ready()).map(|bg| &bg.image);
        let scene = Scene {
            shapes: &self.core.store,
            preview: self.core.preview(),
            background,
            zoom: self.core.camera.zoom,
            width: f64::from(self.canvas.width()),
            height: f64::from(self.canvas.height()),
        };
        render::draw(&self.ctx, &scene).map_err(|e| CanvasError::render(&e))
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.core.shapes()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    fn dispatch(&self, actions: Vec<Action>) -> Result<(), CanvasError> {
        let mut render_needed = false;
        for action in actions {
            match action {
                Action::SetCursor(cursor) => self.apply_cursor(cursor),
                Action::RenderNeeded => render_needed = true,
                Action::ShapeCommitted(shape) => log::debug!("committed {:?}", shape.kind()),
                Action::Cleared => log::debug!("cleared drawing"),
            }
        }
        if render_needed { self.render() } else { Ok(()) }
    }

    fn apply_cursor(&self, cursor: Cursor) {
        if let Err(err) = self.canvas.style().set_property("cursor", cursor.css()) {
            log::debug!("could not set cursor: {err:?}");
        }
    }
}
