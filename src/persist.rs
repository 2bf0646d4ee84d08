//! Persistence bridge: the shape store as one JSON string in a key-value slot.
//!
//! The store is written whole after every committed mutation and read once
//! at startup. Restore is deliberately forgiving: a missing slot, unreadable
//! storage, or malformed JSON all yield an empty store, and individual
//! records that fail to decode or validate are dropped while the rest load.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashMap;

use crate::doc::{Shape, ShapeStore};
use crate::error::CanvasError;

/// A string-to-string storage slot such as browser `localStorage`.
pub trait KeyValueStore {
    /// Read the value under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Storage`] when the backend refuses the read.
    fn get_item(&self, key: &str) -> Result<Option<String>, CanvasError>;

    /// Overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Storage`] when the backend refuses the write
    /// (quota exceeded, storage disabled).
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CanvasError>;
}

/// In-process storage, used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `key` with `value`.
    #[must_use]
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CanvasError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CanvasError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::StorageUnavailable`] outside a browser window or
    /// when storage access is blocked.
    pub fn open() -> Result<Self, CanvasError> {
        let window = web_sys::window().ok_or_else(|| CanvasError::StorageUnavailable("no window".into()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(CanvasError::StorageUnavailable("localStorage missing".into())),
            Err(err) => Err(CanvasError::StorageUnavailable(format!("{err:?}"))),
        }
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CanvasError> {
        self.storage.get_item(key).map_err(|e| CanvasError::storage(&e))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CanvasError> {
        self.storage.set_item(key, value).map_err(|e| CanvasError::storage(&e))
    }
}

/// The store's link to its key-value slot.
pub struct Persistence {
    key: String,
    backend: Box<dyn KeyValueStore>,
}

impl Persistence {
    #[must_use]
    pub fn new(key: impl Into<String>, backend: Box<dyn KeyValueStore>) -> Self {
        Self { key: key.into(), backend }
    }

    /// Slot name the store is written under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize every shape and overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Serialize`] or [`CanvasError::Storage`].
    pub fn save(&mut self, store: &ShapeStore) -> Result<(), CanvasError> {
        let raw = serde_json::to_string(store.shapes())?;
        self.backend.set_item(&self.key, &raw)?;
        log::debug!("persisted {} shapes under {}", store.len(), self.key);
        Ok(())
    }

    /// The raw slot contents, as last written.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Storage`] when the backend refuses the read.
    pub fn raw(&self) -> Result<Option<String>, CanvasError> {
        self.backend.get_item(&self.key)
    }

    /// Load shapes from the slot. Never fails; see the module docs.
    #[must_use]
    pub fn restore(&self) -> Vec<Shape> {
        match self.raw() {
            Ok(Some(raw)) => decode_shapes(&raw),
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("could not read {}: {err}; starting empty", self.key);
                Vec::new()
            }
        }
    }
}

/// Decode a persisted array, keeping every record that decodes and validates.
#[must_use]
pub fn decode_shapes(raw: &str) -> Vec<Shape> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(err) => {
            log::warn!("stored shapes are malformed ({err}); starting empty");
            return Vec::new();
        }
    };

    let total = records.len();
    let shapes: Vec<Shape> = records
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| match serde_json::from_value::<Shape>(record) {
            Ok(shape) => {
                let kind = shape.kind();
                let normalized = shape.normalized();
                if normalized.is_none() {
                    log::warn!("dropping degenerate {kind:?} at index {i}");
                }
                normalized
            }
            Err(err) => {
                log::warn!("dropping unreadable shape at index {i}: {err}");
                None
            }
        })
        .collect();

    if shapes.len() != total {
        log::info!("restored {} of {total} stored shapes", shapes.len());
    }
    shapes
}
