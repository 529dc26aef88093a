//! Application configuration management.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Where widget bundles live and which widgets exist.
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Deferred loader presentation and limits.
    #[serde(default)]
    pub loader: LoaderConfig,
    /// Account metrics source.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Object storage backend holding widget bundles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// Process memory, empty at startup.
    Memory,
}

impl AssetProvider {
    /// Short provider name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

impl Default for AssetProvider {
    fn default() -> Self {
        Self::LocalFs {
            root: PathBuf::from("./assets"),
        }
    }
}

/// Asset configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetsConfig {
    /// Storage backend.
    #[serde(default)]
    pub provider: AssetProvider,
    /// Widget name to storage key.
    #[serde(default)]
    pub widgets: HashMap<String, String>,
}

/// Deferred loader configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    /// Status text shown next to the spinner while loading.
    #[serde(default = "default_placeholder_text")]
    pub placeholder_text: String,
    /// Text shown when a widget cannot be loaded.
    #[serde(default = "default_failure_text")]
    pub failure_text: String,
    /// Give up on a load after this many seconds. Unset waits forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            placeholder_text: default_placeholder_text(),
            failure_text: default_failure_text(),
            timeout_secs: None,
        }
    }
}

fn default_placeholder_text() -> String {
    "Loading...".to_string()
}

fn default_failure_text() -> String {
    "This widget could not be loaded.".to_string()
}

/// Account metrics configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// JSON file with an array of account metrics to serve.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("VANTAGE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
