//! Account metric source errors.

use std::path::PathBuf;

use thiserror::Error;

/// Account metric source errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Seed file could not be read.
    #[error("failed to read metrics seed {path}: {message}")]
    SeedRead {
        /// Seed file path.
        path: PathBuf,
        /// Underlying I/O error.
        message: String,
    },

    /// Seed data is not a JSON array of account metrics.
    #[error("malformed metrics data: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for MetricsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
