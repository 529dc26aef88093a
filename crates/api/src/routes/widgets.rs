//! Deferred widget routes.
//!
//! Each stream request is one mount: the client receives a `placeholder`
//! event immediately, then exactly one `ready` or `failed` event, then the
//! stream closes. Disconnecting unmounts the widget and aborts its load.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::info;
use vantage_core::assets::{ContentUnit, StoredContentLoader};
use vantage_core::deferred::{
    ContentLoader, DeferredContentLoader, DisplayParams, RenderContext, View,
};
use vantage_shared::AppError;
use vantage_shared::types::MountId;

use crate::{AppState, error::ApiError};

/// Creates the widget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/widgets", get(list_widgets))
        .route("/widgets/{name}/stream", get(stream_widget))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for a widget stream.
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Style class forwarded to every view.
    pub class_name: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for the widget list.
#[derive(Debug, Serialize)]
pub struct WidgetListResponse {
    /// Configured widget names, sorted.
    pub widgets: Vec<String>,
}

/// Payload of one stream event.
#[derive(Debug, Serialize)]
pub struct ViewEvent {
    /// Widget name.
    pub widget: String,
    /// Mount this event belongs to.
    pub mount_id: MountId,
    /// `placeholder`, `ready` or `failed`.
    pub state: &'static str,
    /// Forwarded style class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Spinner status text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    /// Loaded bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentPayload>,
    /// Failure indicator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailurePayload>,
}

/// Loaded bundle description.
#[derive(Debug, Serialize)]
pub struct ContentPayload {
    /// Storage key.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size: usize,
    /// Body, when it is UTF-8 text.
    pub body: Option<String>,
}

/// Failure indicator.
#[derive(Debug, Serialize)]
pub struct FailurePayload {
    /// User-facing message.
    pub message: String,
    /// Error code.
    pub code: &'static str,
    /// Underlying cause.
    pub reason: String,
}

impl ViewEvent {
    fn from_view(widget: &str, mount_id: MountId, view: &View<ContentUnit>) -> Self {
        let mut event = Self {
            widget: widget.to_string(),
            mount_id,
            state: view.phase().view_name(),
            class_name: view.params().class_name.clone(),
            status_text: None,
            content: None,
            failure: None,
        };

        match view {
            View::Placeholder { status_text, .. } => {
                event.status_text = Some(status_text.clone());
            }
            View::Content { unit, .. } => {
                event.content = Some(ContentPayload {
                    name: unit.name.clone(),
                    content_type: unit.content_type.clone(),
                    size: unit.size(),
                    body: unit.as_text().map(str::to_string),
                });
            }
            View::Failure { message, error, .. } => {
                event.failure = Some(FailurePayload {
                    message: message.clone(),
                    code: error.code(),
                    reason: error.to_string(),
                });
            }
        }
        event
    }

    fn into_sse(self) -> Event {
        Event::default()
            .event(self.state)
            .data(serde_json::to_string(&self).unwrap_or_default())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_widgets(State(state): State<AppState>) -> Json<WidgetListResponse> {
    let mut widgets: Vec<String> = state.widgets.keys().cloned().collect();
    widgets.sort();
    Json(WidgetListResponse { widgets })
}

async fn stream_widget(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let key = state
        .widgets
        .get(&name)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("widget '{name}'")))?;

    let ctx = RenderContext::from_config(Handle::current(), &state.loader);
    let loader = StoredContentLoader::new(Arc::clone(&state.assets), key);
    let params = DisplayParams {
        class_name: query.class_name,
    };
    let mount = DeferredContentLoader::new(ctx, loader, params);
    info!(widget = %name, mount_id = %mount.mount_id(), "widget stream opened");

    Ok(Sse::new(view_events(name, mount)).keep_alive(KeepAlive::default()))
}

/// One mount's views as SSE events. Dropping the stream unmounts the widget.
fn view_events<L>(
    widget: String,
    mut mount: DeferredContentLoader<L>,
) -> impl Stream<Item = Result<Event, Infallible>> + Send
where
    L: ContentLoader<Output = ContentUnit>,
{
    let mount_id = mount.mount_id();
    async_stream::stream! {
        while let Some(view) = mount.next_view().await {
            yield Ok(ViewEvent::from_view(&widget, mount_id, &view).into_sse());
        }
    }
}
