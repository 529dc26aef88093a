//! Deferred content state, display parameters, and rendered views.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use vantage_shared::config::LoaderConfig;

use super::error::LoadError;

/// Display parameters forwarded verbatim to whichever view is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayParams {
    /// Style classification, e.g. `"widget-a"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl DisplayParams {
    /// Parameters carrying only a class name.
    #[must_use]
    pub fn with_class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
        }
    }
}

/// Phase of a mount, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    /// Waiting for the loader.
    Pending,
    /// Content resolved.
    Ready,
    /// Loader failed.
    Failed,
}

impl LoadPhase {
    /// Event name used when the phase is rendered.
    #[must_use]
    pub const fn view_name(self) -> &'static str {
        match self {
            Self::Pending => "placeholder",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

/// Load state of one mount. `Ready` and `Failed` are terminal.
#[derive(Debug)]
pub enum LoadState<T> {
    /// Loader not yet settled.
    Pending,
    /// Loader produced the content unit.
    Ready(Arc<T>),
    /// Loader failed.
    Failed(LoadError),
}

impl<T> Clone for LoadState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Pending => Self::Pending,
            Self::Ready(unit) => Self::Ready(Arc::clone(unit)),
            Self::Failed(error) => Self::Failed(error.clone()),
        }
    }
}

impl<T> LoadState<T> {
    /// Returns true while the loader has not settled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns the phase of this state.
    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        match self {
            Self::Pending => LoadPhase::Pending,
            Self::Ready(_) => LoadPhase::Ready,
            Self::Failed(_) => LoadPhase::Failed,
        }
    }
}

/// What the consuming view should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum View<T> {
    /// Spinner with status text.
    Placeholder {
        /// Forwarded display parameters.
        params: DisplayParams,
        /// Status text next to the spinner.
        status_text: String,
    },
    /// The resolved content unit.
    Content {
        /// Forwarded display parameters.
        params: DisplayParams,
        /// Resolved artifact.
        unit: Arc<T>,
    },
    /// Explicit failure indicator.
    Failure {
        /// Forwarded display parameters.
        params: DisplayParams,
        /// User-facing message.
        message: String,
        /// Underlying cause.
        error: LoadError,
    },
}

impl<T> View<T> {
    /// Display parameters of the active view.
    #[must_use]
    pub const fn params(&self) -> &DisplayParams {
        match self {
            Self::Placeholder { params, .. }
            | Self::Content { params, .. }
            | Self::Failure { params, .. } => params,
        }
    }

    /// Phase this view represents.
    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        match self {
            Self::Placeholder { .. } => LoadPhase::Pending,
            Self::Content { .. } => LoadPhase::Ready,
            Self::Failure { .. } => LoadPhase::Failed,
        }
    }

    /// Returns true for `Content` and `Failure`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Placeholder { .. })
    }
}

/// Explicit rendering context handed to every mount.
///
/// Carries the runtime that loads are spawned on and the texts the
/// placeholder and failure views display.
#[derive(Debug, Clone)]
pub struct RenderContext {
    runtime: Handle,
    placeholder_text: String,
    failure_text: String,
    timeout: Option<Duration>,
}

impl RenderContext {
    /// Context with default texts and no timeout.
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self::from_config(runtime, &LoaderConfig::default())
    }

    /// Context built from loader configuration.
    #[must_use]
    pub fn from_config(runtime: Handle, config: &LoaderConfig) -> Self {
        Self {
            runtime,
            placeholder_text: config.placeholder_text.clone(),
            failure_text: config.failure_text.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Set the placeholder status text.
    #[must_use]
    pub fn with_placeholder_text(mut self, text: impl Into<String>) -> Self {
        self.placeholder_text = text.into();
        self
    }

    /// Set the failure message.
    #[must_use]
    pub fn with_failure_text(mut self, text: impl Into<String>) -> Self {
        self.failure_text = text.into();
        self
    }

    /// Fail loads that take longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runtime loads are spawned on.
    #[must_use]
    pub const fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Placeholder status text.
    #[must_use]
    pub fn placeholder_text(&self) -> &str {
        &self.placeholder_text
    }

    /// Failure message.
    #[must_use]
    pub fn failure_text(&self) -> &str {
        &self.failure_text
    }

    /// Load timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Project a load state into the view the consumer should display.
    #[must_use]
    pub fn project<T>(&self, state: &LoadState<T>, params: &DisplayParams) -> View<T> {
        match state {
            LoadState::Pending => View::Placeholder {
                params: params.clone(),
                status_text: self.placeholder_text.clone(),
            },
            LoadState::Ready(unit) => View::Content {
                params: params.clone(),
                unit: Arc::clone(unit),
            },
            LoadState::Failed(error) => View::Failure {
                params: params.clone(),
                message: self.failure_text.clone(),
                error: error.clone(),
            },
        }
    }
}
