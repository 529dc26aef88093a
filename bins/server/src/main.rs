//! Vantage API Server
//!
//! Main entry point for the dashboard backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vantage_api::{AppState, create_router};
use vantage_core::account::{AccountMetricSource, InMemoryMetricSource};
use vantage_core::assets::AssetStore;
use vantage_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vantage=debug,vantage_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Open the widget bundle store
    let assets = AssetStore::from_provider(&config.assets.provider)?;
    info!(
        provider = assets.provider_name(),
        widgets = config.assets.widgets.len(),
        "Asset store ready"
    );
    for (name, key) in &config.assets.widgets {
        if !assets.exists(key).await {
            warn!(
                widget = %name,
                %key,
                "Widget bundle missing; mounts will render the failure view"
            );
        }
    }

    // Account metrics source
    let metrics: Arc<dyn AccountMetricSource> = match &config.metrics.seed_path {
        Some(path) => Arc::new(InMemoryMetricSource::from_json_file(path).await?),
        None => {
            warn!("No metrics seed configured; serving an empty account list");
            Arc::new(InMemoryMetricSource::default())
        }
    };

    // Create application state
    let state = AppState {
        assets: Arc::new(assets),
        widgets: Arc::new(config.assets.widgets.clone()),
        loader: Arc::new(config.loader.clone()),
        metrics,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
