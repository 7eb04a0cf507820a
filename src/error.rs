//! Structured error types for panegrid.
//!
//! Only construction-time misuse and out-of-range axis access raise errors.
//! Everything else (clipped selections, operations on disposed objects) is a
//! documented no-op.

/// All errors that can occur while building or querying a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Axis access outside `[0, len)`.
    #[error("index {index} out of range for axis of length {len}")]
    Range { index: u32, len: u32 },

    /// Programmer error: invalid configuration or an accessor used on the
    /// wrong kind of axis.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration JSON could not be decoded.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for host-facing string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
