//! Deferred content error types.

use thiserror::Error;

/// Why a content unit could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The source has nothing under this key.
    #[error("content not found: {key}")]
    NotFound {
        /// Key that was requested.
        key: String,
    },

    /// The underlying fetch failed.
    #[error("content source failed: {0}")]
    Source(String),

    /// The configured load timeout elapsed first.
    #[error("content load timed out after {after_ms} ms")]
    TimedOut {
        /// Elapsed limit in milliseconds.
        after_ms: u64,
    },

    /// The loader panicked; the panic was contained.
    #[error("content loader panicked: {0}")]
    Panicked(String),
}

impl LoadError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a source error.
    #[must_use]
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Stable code for API payloads.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Source(_) => "SOURCE_ERROR",
            Self::TimedOut { .. } => "TIMED_OUT",
            Self::Panicked(_) => "PANICKED",
        }
    }
}
