//! Error type shared by configuration, persistence, and the browser engine.

use wasm_bindgen::JsValue;

/// Error returned by fallible canvas operations.
///
/// Pointer handlers never surface these; they log and carry on. Only setup
/// (config, context lookup) and explicit host calls propagate them.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The shape store could not be encoded as JSON.
    #[error("failed to serialize shapes: {0}")]
    Serialize(#[from] serde_json::Error),
    /// No key-value storage is reachable from this environment.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// A read or write against the key-value storage failed.
    #[error("storage access failed: {0}")]
    Storage(String),
    /// The canvas element did not hand out a 2D rendering context.
    #[error("2d rendering context unavailable")]
    ContextUnavailable,
    /// A drawing call on the render target failed.
    #[error("render failed: {0}")]
    Render(String),
    /// The host-supplied configuration is invalid.
    #[error("invalid config: {0}")]
    Config(String),
    /// The host named a drawing tool that does not exist.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// The engine is already handling another event.
    #[error("engine busy")]
    Busy,
}

impl CanvasError {
    /// Wrap a JavaScript exception as a storage failure.
    #[must_use]
    pub fn storage(err: &JsValue) -> Self {
        Self::Storage(format!("{err:?}"))
    }

    /// Wrap a JavaScript exception as a render failure.
    #[must_use]
    pub fn render(err: &JsValue) -> Self {
        Self::Render(format!("{err:?}"))
    }
}

impl From<CanvasError> for JsValue {
    fn from(err: CanvasError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
