//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for account metrics
//! - Server-sent event streams for deferred widget mounts
//! - Error response mapping

pub mod error;
pub mod routes;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vantage_core::account::AccountMetricSource;
use vantage_core::assets::AssetStore;
use vantage_shared::config::LoaderConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store holding widget bundles.
    pub assets: Arc<AssetStore>,
    /// Widget name to storage key.
    pub widgets: Arc<HashMap<String, String>>,
    /// Placeholder and failure texts, load timeout.
    pub loader: Arc<LoaderConfig>,
    /// Account metrics collaborator.
    pub metrics: Arc<dyn AccountMetricSource>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
