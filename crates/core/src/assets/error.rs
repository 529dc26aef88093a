//! Asset store error types.

use thiserror::Error;

use crate::deferred::LoadError;

/// Asset store errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// No object under the key.
    #[error("asset not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Key is empty, absolute, or escapes the store root.
    #[error("invalid asset key: {0}")]
    InvalidKey(String),

    /// Storage provider configuration error.
    #[error("asset store configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("asset store operation failed: {0}")]
    Operation(String),
}

impl AssetError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for AssetError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<AssetError> for LoadError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::NotFound { key } => Self::NotFound { key },
            other => Self::Source(other.to_string()),
        }
    }
}
