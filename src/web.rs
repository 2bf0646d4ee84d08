//! JavaScript entry point.
//!
//! The host page constructs one [`SketchCanvas`] per `<canvas>` element and
//! forwards toolbar actions and pointer events to it. Coordinates are CSS
//! pixels relative to the canvas' top-left corner.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::camera::Point;
use crate::config::CanvasConfig;
use crate::engine::Engine;
use crate::error::CanvasError;
use crate::input::Tool;

/// A drawing surface bound to one canvas element.
#[wasm_bindgen]
pub struct SketchCanvas {
    engine: Rc<RefCell<Engine>>,
}

#[wasm_bindgen]
impl SketchCanvas {
    /// Bind to `canvas`, restore saved shapes, start loading the background,
    /// and draw once.
    ///
    /// `config_json` is an optional JSON object; see `CanvasConfig`.
    ///
    /// # Errors
    ///
    /// Rejects invalid configuration or a canvas without a 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<SketchCanvas, JsValue> {
        console_error_panic_hook::set_once();
        let config = match config_json.as_deref() {
            Some(raw) => CanvasConfig::from_json(raw)?,
            None => CanvasConfig::default(),
        };
        init_logging(&config)?;

        let engine = Rc::new(RefCell::new(Engine::new(canvas, &config)?));
        watch_background(&engine);
        {
            let engine = engine.borrow();
            engine.load_background();
            engine.render()?;
        }
        log::info!("canvas ready with {} shapes", engine.borrow().shapes().len());
        Ok(Self { engine })
    }

    /// Select the drawing tool by name: `rectangle`, `circle`, `polygon`, or
    /// `polyline`.
    ///
    /// # Errors
    ///
    /// Rejects unknown tool names.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, name: &str) -> Result<(), JsValue> {
        let tool: Tool = name.parse()?;
        self.with_engine(|engine| engine.set_tool(tool))
    }

    /// # Errors
    ///
    /// Fails only when called re-entrantly.
    #[wasm_bindgen(js_name = setStrokeColor)]
    pub fn set_stroke_color(&self, color: &str) -> Result<(), JsValue> {
        self.with_engine(|engine| {
            engine.set_stroke_color(color);
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Fails only when called re-entrantly.
    #[wasm_bindgen(js_name = setFillColor)]
    pub fn set_fill_color(&self, color: &str) -> Result<(), JsValue> {
        self.with_engine(|engine| {
            engine.set_fill_color(color);
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Returns the render failure, if the resulting redraw failed.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.on_pointer_down(Point::new(x, y)))
    }

    /// # Errors
    ///
    /// Returns the render failure, if the resulting redraw failed.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.on_pointer_move(Point::new(x, y)))
    }

    /// # Errors
    ///
    /// Returns the render failure, if the resulting redraw failed.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.on_pointer_up(Point::new(x, y)))
    }

    /// # Errors
    ///
    /// Returns the render failure, if the resulting redraw failed.
    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.on_double_click(Point::new(x, y)))
    }

    /// Delete every shape.
    ///
    /// # Errors
    ///
    /// Returns the render failure, if the redraw failed.
    pub fn clear(&self) -> Result<(), JsValue> {
        self.with_engine(Engine::clear)
    }

    /// # Errors
    ///
    /// Returns the render failure, if the redraw failed.
    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) -> Result<(), JsValue> {
        self.with_engine(Engine::zoom_in)
    }

    /// # Errors
    ///
    /// Returns the render failure, if the redraw failed.
    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) -> Result<(), JsValue> {
        self.with_engine(Engine::zoom_out)
    }

    /// Current zoom factor.
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.engine.try_borrow().map_or(1.0, |engine| engine.camera().zoom)
    }

    /// The stored shapes as the same JSON array that is persisted.
    ///
    /// # Errors
    ///
    /// Fails when the engine is busy or serialization fails.
    #[wasm_bindgen(js_name = shapesJson)]
    pub fn shapes_json(&self) -> Result<String, JsValue> {
        let engine = self.engine.try_borrow().map_err(|_| CanvasError::Busy)?;
        serde_json::to_string(engine.shapes()).map_err(|e| CanvasError::from(e).into())
    }
}

impl SketchCanvas {
    fn with_engine(&self, f: impl FnOnce(&mut Engine) -> Result<(), CanvasError>) -> Result<(), JsValue> {
        let mut engine = self.engine.try_borrow_mut().map_err(|_| CanvasError::Busy)?;
        f(&mut engine)?;
        Ok(())
    }
}

fn init_logging(config: &CanvasConfig) -> Result<(), CanvasError> {
    let Some(level) = config.level_filter()?.to_level() else {
        return Ok(());
    };
    if let Err(err) = console_log::init_with_level(level) {
        // A second canvas on the same page finds the logger already installed.
        log::debug!("console logger not installed: {err}");
    }
    Ok(())
}

/// Redraw once the background image finishes loading.
fn watch_background(engine: &Rc<RefCell<Engine>>) {
    let weak: Weak<RefCell<Engine>> = Rc::downgrade(engine);
    let onload = Closure::<dyn FnMut()>::new(move || {
        let Some(engine) = weak.upgrade() else {
            return;
        };
        let Ok(engine) = engine.try_borrow() else {
            log::debug!("background loaded while engine busy; drawing on next event");
            return;
        };
        if let Err(err) = engine.background_loaded() {
            log::warn!("background redraw failed: {err}");
        }
    });
    if let Some(image) = engine.borrow().background_image() {
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        // The image element holds the callback for the page's lifetime.
        onload.forget();
    }
}
