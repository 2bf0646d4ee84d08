//! Drawing-surface configuration supplied by the host page as JSON.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use log::LevelFilter;
use serde::Deserialize;

use crate::consts::{DEFAULT_BACKGROUND_URL, DEFAULT_FILL, DEFAULT_STORAGE_KEY, DEFAULT_STROKE, DEFAULT_ZOOM_STEP};
use crate::error::CanvasError;

/// Typed configuration for one drawing surface.
///
/// Every field is optional in the JSON form:
/// - `storage_key`: key-value slot for the shape array, default `"ShapesData"`
/// - `background_url`: image drawn under the shapes, default `"assets/room.svg"`; `null` disables it
/// - `stroke_color` / `fill_color`: initial colors for new shapes
/// - `zoom_step`: multiplicative zoom factor per step, default `1.05`, must exceed 1
/// - `log_level`: `off`, `error`, `warn`, `info` (default), `debug`, or `trace`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub storage_key: String,
    pub background_url: Option<String>,
    pub stroke_color: String,
    pub fill_color: String,
    pub zoom_step: f64,
    pub log_level: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            background_url: Some(DEFAULT_BACKGROUND_URL.to_string()),
            stroke_color: DEFAULT_STROKE.to_string(),
            fill_color: DEFAULT_FILL.to_string(),
            zoom_step: DEFAULT_ZOOM_STEP,
            log_level: "info".to_string(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] when the JSON is malformed or a value
    /// fails validation.
    pub fn from_json(raw: &str) -> Result<Self, CanvasError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| CanvasError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.storage_key.trim().is_empty() {
            return Err(CanvasError::Config("storage_key must not be empty".into()));
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(CanvasError::Config(format!("zoom_step must be finite and > 1, got {}", self.zoom_step)));
        }
        self.level_filter()?;
        Ok(())
    }

    /// The configured log level.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] for an unrecognized level name.
    pub fn level_filter(&self) -> Result<LevelFilter, CanvasError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| CanvasError::Config(format!("unknown log_level: {}", self.log_level)))
    }
}
