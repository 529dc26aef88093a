//! Content loader that fetches one bundle from the asset store.

use std::sync::Arc;

use async_trait::async_trait;

use super::store::{AssetStore, ContentUnit};
use crate::deferred::{ContentLoader, LoadError};

/// Loads the bundle stored under `key`.
#[derive(Clone)]
pub struct StoredContentLoader {
    store: Arc<AssetStore>,
    key: String,
}

impl StoredContentLoader {
    /// Loader for `key` in `store`.
    #[must_use]
    pub fn new(store: Arc<AssetStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key this loader reads.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl ContentLoader for StoredContentLoader {
    type Output = ContentUnit;

    async fn load(&self) -> Result<ContentUnit, LoadError> {
        Ok(self.store.read(&self.key).await?)
    }
}
