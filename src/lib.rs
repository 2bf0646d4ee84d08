//! Vector drawing surface for the browser.
//!
//! This crate is compiled to WebAssembly and drives a single `<canvas>`
//! element: users drag out rectangles and circles, click out polygons and
//! two-point polylines, move and resize what they have drawn, and zoom the
//! view. Every committed change is written to `localStorage` so the drawing
//! survives a reload. The host page only forwards toolbar choices and
//! pointer events to [`web::SketchCanvas`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Browser [`engine::Engine`] and the testable [`engine::EngineCore`] |
//! | [`doc`] | Shape types, geometry rules, and the ordered shape store |
//! | [`camera`] | Points, uniform zoom, and screen-to-shape conversion |
//! | [`input`] | Tools, cursors, and the interaction state machine |
//! | [`hit`] | Hit-testing shape bodies and resize handles |
//! | [`render`] | Full-frame redraw over a 2D surface |
//! | [`persist`] | Key-value storage and tolerant restore |
//! | [`config`] | Host-supplied configuration |
//! | [`error`] | Error type shared across modules |
//! | [`web`] | `wasm-bindgen` exports |
//! | [`consts`] | Handle size, zoom step, default colors, storage key |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod persist;
pub mod render;
pub mod web;
