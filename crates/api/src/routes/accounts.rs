//! Account metric routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use tracing::debug;
use vantage_core::account::AccountMetric;
use vantage_shared::AppError;

use crate::{AppState, error::ApiError};

/// Creates the account metric routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/metrics", get(list_metrics))
        .route("/accounts/{account_number}/metrics", get(latest_metric))
}

/// Response for listing metrics.
#[derive(Debug, Serialize)]
pub struct MetricsListResponse {
    /// Snapshots in source order.
    pub metrics: Vec<AccountMetric>,
    /// Number of snapshots.
    pub count: usize,
}

async fn list_metrics(
    State(state): State<AppState>,
) -> Result<Json<MetricsListResponse>, ApiError> {
    let metrics = state.metrics.list().await?;
    Ok(Json(MetricsListResponse {
        count: metrics.len(),
        metrics,
    }))
}

async fn latest_metric(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<AccountMetric>, ApiError> {
    debug!(%account_number, "fetching latest account metric");
    let metric = state
        .metrics
        .latest(&account_number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("metrics for account {account_number}")))?;
    Ok(Json(metric))
}
