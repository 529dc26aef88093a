//! Account metric sources.

use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use super::error::MetricsError;
use super::types::AccountMetric;

/// Supplies account metric snapshots to the dashboard.
#[async_trait]
pub trait AccountMetricSource: Send + Sync {
    /// All known snapshots, in source order.
    async fn list(&self) -> Result<Vec<AccountMetric>, MetricsError>;

    /// Most recent snapshot for one account.
    async fn latest(&self, account_number: &str) -> Result<Option<AccountMetric>, MetricsError>;
}

/// Fixed set of snapshots held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetricSource {
    metrics: Vec<AccountMetric>,
}

impl InMemoryMetricSource {
    /// Source serving `metrics`.
    #[must_use]
    pub const fn new(metrics: Vec<AccountMetric>) -> Self {
        Self { metrics }
    }

    /// Source seeded from a JSON array on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array
    /// of account metrics.
    pub async fn from_json_file(path: &Path) -> Result<Self, MetricsError> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| MetricsError::SeedRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let metrics: Vec<AccountMetric> = serde_json::from_slice(&raw)?;
        info!(path = %path.display(), count = metrics.len(), "loaded account metrics seed");
        Ok(Self::new(metrics))
    }

    /// Number of snapshots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns true if no snapshots are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[async_trait]
impl AccountMetricSource for InMemoryMetricSource {
    async fn list(&self) -> Result<Vec<AccountMetric>, MetricsError> {
        Ok(self.metrics.clone())
    }

    async fn latest(&self, account_number: &str) -> Result<Option<AccountMetric>, MetricsError> {
        Ok(self
            .metrics
            .iter()
            .filter(|m| m.account_number == account_number)
            .max_by(|a, b| snapshot_order(a, b))
            .cloned())
    }
}

/// Chronological when both timestamps are RFC 3339, raw string order otherwise.
fn snapshot_order(a: &AccountMetric, b: &AccountMetric) -> Ordering {
    match (a.created_at_parsed(), b.created_at_parsed()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        _ => a.created_at.cmp(&b.created_at),
    }
}
