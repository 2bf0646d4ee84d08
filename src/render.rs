//! Rendering: draws the background, every stored shape, and the preview.
//!
//! Drawing goes through the [`Surface`] trait, which names exactly the 2D
//! capabilities the renderer relies on. The browser implementation wraps
//! [`web_sys::CanvasRenderingContext2d`]; tests substitute a recorder.
//!
//! The renderer reads state and never mutates it. Each [`draw`] is a full
//! redraw: the transform is reset to identity, the whole surface cleared,
//! the zoom scale applied, then layers are painted bottom to top.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::camera::Point;
use crate::consts::{FALLBACK_FILL, FALLBACK_STROKE, HANDLE_FILL, HANDLE_SIZE};
use crate::doc::{Circle, Polygon, Polyline, Rect, Shape, ShapeStore};

/// The 2D drawing capabilities the renderer needs from its host.
pub trait Surface {
    /// Background image handle.
    type Image;
    /// Failure reported by fallible calls.
    type Error;

    /// Replace the current transform with a uniform scale.
    ///
    /// # Errors
    ///
    /// Returns the surface error if the transform is rejected.
    fn set_scale(&self, scale: f64) -> Result<(), Self::Error>;
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn set_fill_style(&self, color: &str);
    fn set_stroke_style(&self, color: &str);
    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&self);
    /// # Errors
    ///
    /// Returns the surface error for an invalid radius.
    fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), Self::Error>;
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    fn close_path(&self);
    fn fill(&self);
    fn stroke(&self);
    /// Draw `image` with its top-left corner at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns the surface error if the image is not drawable.
    fn draw_image(&self, image: &Self::Image, x: f64, y: f64) -> Result<(), Self::Error>;
}

impl Surface for CanvasRenderingContext2d {
    type Image = HtmlImageElement;
    type Error = JsValue;

    fn set_scale(&self, scale: f64) -> Result<(), JsValue> {
        self.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)
    }

    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::clear_rect(self, x, y, width, height);
    }

    fn set_fill_style(&self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_stroke_style(&self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
    }

    fn stroke_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::stroke_rect(self, x, y, width, height);
    }

    fn begin_path(&self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::arc(self, x, y, radius, start, end)
    }

    fn move_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn close_path(&self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn fill(&self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn draw_image(&self, image: &HtmlImageElement, x: f64, y: f64) -> Result<(), JsValue> {
        self.draw_image_with_html_image_element(image, x, y)
    }
}

/// Everything one redraw reads.
pub struct Scene<'a, I> {
    /// Committed shapes, bottom first.
    pub shapes: &'a ShapeStore,
    /// In-progress shape drawn above everything else.
    pub preview: Option<&'a Shape>,
    /// Background image, once it has finished loading.
    pub background: Option<&'a I>,
    /// Uniform scale factor.
    pub zoom: f64,
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels.
    pub height: f64,
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns `Err` if any fallible surface call fails.
pub fn draw<S: Surface>(surface: &S, scene: &Scene<'_, S::Image>) -> Result<(), S::Error> {
    // Layer 0: identity clear, then zoom.
    surface.set_scale(1.0)?;
    surface.clear_rect(0.0, 0.0, scene.width, scene.height);
    surface.set_scale(scene.zoom)?;

    // Layer 1: background.
    if let Some(image) = scene.background {
        surface.draw_image(image, 0.0, 0.0)?;
    }

    // Layer 2: stored shapes in z-order.
    for shape in scene.shapes.iter() {
        draw_shape(surface, shape)?;
    }

    // Layer 3: preview.
    if let Some(preview) = scene.preview {
        draw_shape(surface, preview)?;
    }

    Ok(())
}

/// Draw one shape followed by its handles.
///
/// # Errors
///
/// Returns `Err` if a fallible surface call fails.
pub fn draw_shape<S: Surface>(surface: &S, shape: &Shape) -> Result<(), S::Error> {
    surface.begin_path();
    surface.set_fill_style(shape.fill_color().unwrap_or(FALLBACK_FILL));
    surface.set_stroke_style(shape.stroke_color().unwrap_or(FALLBACK_STROKE));

    let drawn = match shape {
        Shape::Rectangle(r) => {
            draw_rect(surface, r);
            true
        }
        Shape::Circle(c) => draw_circle(surface, c)?,
        Shape::Polygon(p) => draw_polygon(surface, p),
        Shape::Polyline(l) => {
            draw_polyline(surface, l);
            true
        }
    };

    if !drawn {
        log::debug!("skipped degenerate {:?}", shape.kind());
        return Ok(());
    }

    for (_, at) in shape.handles() {
        draw_handle(surface, at);
    }
    Ok(())
}

fn draw_rect<S: Surface>(surface: &S, r: &Rect) {
    surface.fill_rect(r.x, r.y, r.width, r.height);
    surface.stroke_rect(r.x, r.y, r.width, r.height);
}

fn draw_circle<S: Surface>(surface: &S, c: &Circle) -> Result<bool, S::Error> {
    if c.radius < 0.0 || !c.radius.is_finite() {
        return Ok(false);
    }
    surface.arc(c.x, c.y, c.radius, 0.0, 2.0 * PI)?;
    surface.fill();
    surface.stroke();
    Ok(true)
}

fn draw_polygon<S: Surface>(surface: &S, p: &Polygon) -> bool {
    let Some((first, rest)) = p.points.split_first() else {
        return false;
    };
    surface.move_to(first.x, first.y);
    for pt in rest {
        surface.line_to(pt.x, pt.y);
    }
    surface.close_path();
    surface.fill();
    surface.stroke();
    true
}

fn draw_polyline<S: Surface>(surface: &S, l: &Polyline) {
    let [a, b] = l.points;
    surface.move_to(a.x, a.y);
    surface.line_to(b.x, b.y);
    surface.stroke();
}

fn draw_handle<S: Surface>(surface: &S, at: Point) {
    surface.set_fill_style(HANDLE_FILL);
    surface.fill_rect(at.x - HANDLE_SIZE / 2.0, at.y - HANDLE_SIZE / 2.0, HANDLE_SIZE, HANDLE_SIZE);
}
