//! Asset store implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{ErrorKind, Operator, services};
use tracing::debug;
use vantage_shared::config::AssetProvider;

use super::error::AssetError;

/// A loaded widget bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    /// Storage key the bundle was read from.
    pub name: String,
    /// MIME type derived from the key extension.
    pub content_type: String,
    /// Raw bundle bytes.
    pub body: Bytes,
}

impl ContentUnit {
    /// Size of the body in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Body as UTF-8 text, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Read access to widget bundles.
pub struct AssetStore {
    operator: Operator,
    provider: &'static str,
}

impl AssetStore {
    /// Create a store from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_provider(provider: &AssetProvider) -> Result<Self, AssetError> {
        let operator = Self::create_operator(provider)?;
        Ok(Self {
            operator,
            provider: provider.name(),
        })
    }

    /// Empty in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the memory backend cannot be initialized.
    pub fn memory() -> Result<Self, AssetError> {
        Self::from_provider(&AssetProvider::Memory)
    }

    fn create_operator(provider: &AssetProvider) -> Result<Operator, AssetError> {
        let operator = match provider {
            AssetProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                Operator::new(builder)
                    .map_err(|e| AssetError::configuration(e.to_string()))?
                    .finish()
            }
            AssetProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);
                Operator::new(builder)
                    .map_err(|e| AssetError::configuration(e.to_string()))?
                    .finish()
            }
            AssetProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| AssetError::configuration("invalid path"))?,
                );
                Operator::new(builder)
                    .map_err(|e| AssetError::configuration(e.to_string()))?
                    .finish()
            }
            AssetProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| AssetError::configuration(e.to_string()))?
                .finish(),
        };
        Ok(operator)
    }

    /// Read a bundle.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing key, `InvalidKey` for a malformed
    /// one, and `Operation` for backend failures.
    pub async fn read(&self, key: &str) -> Result<ContentUnit, AssetError> {
        validate_key(key)?;
        debug!(provider = self.provider, key, "reading asset");

        let body = self
            .operator
            .read(key)
            .await
            .map_err(|e| map_missing(e, key))?
            .to_bytes();

        Ok(ContentUnit {
            name: key.to_string(),
            content_type: content_type_for(key).to_string(),
            body,
        })
    }

    /// Store a bundle under `key`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is malformed or the write fails.
    pub async fn write(&self, key: &str, body: impl Into<Bytes>) -> Result<(), AssetError> {
        validate_key(key)?;
        let body: Bytes = body.into();
        self.operator.write(key, body).await?;
        Ok(())
    }

    /// Check if a bundle exists.
    pub async fn exists(&self, key: &str) -> bool {
        if validate_key(key).is_err() {
            return false;
        }
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                debug!(provider = self.provider, key, error = %e, "asset stat failed");
                false
            }
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.provider
    }
}

fn map_missing(err: opendal::Error, key: &str) -> AssetError {
    if err.kind() == ErrorKind::NotFound {
        AssetError::not_found(key)
    } else {
        AssetError::from(err)
    }
}

/// Keys are relative, non-empty, and never step outside the store root.
fn validate_key(key: &str) -> Result<(), AssetError> {
    let escapes = key.split('/').any(|segment| segment == "..");
    if key.is_empty() || key.starts_with('/') || key.ends_with('/') || escapes {
        return Err(AssetError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn content_type_for(key: &str) -> &'static str {
    let extension = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "gltf" => "model/gltf+json",
        "glb" => "model/gltf-binary",
        "svg" => "image/svg+xml",
        "html" => "text/html",
        "wasm" => "application/wasm",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}
