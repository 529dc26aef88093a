//! One mount of a deferred content region.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vantage_shared::types::MountId;

use super::error::LoadError;
use super::loader::ContentLoader;
use super::types::{DisplayParams, LoadState, RenderContext, View};

/// Sender half of a mount's state channel. Emptied by whichever of
/// settle or unmount gets there first.
type Slot<T> = Arc<Mutex<Option<watch::Sender<LoadState<T>>>>>;

/// Shows a placeholder, loads the content unit on first render, then swaps.
///
/// Each value is one mount: the loader runs at most once, the state moves
/// `Pending -> Ready | Failed` exactly once, and dropping the value aborts
/// an in-flight load without publishing its result.
pub struct DeferredContentLoader<L: ContentLoader> {
    id: MountId,
    ctx: RenderContext,
    params: DisplayParams,
    loader: Option<L>,
    slot: Slot<L::Output>,
    state: watch::Receiver<LoadState<L::Output>>,
    task: Option<JoinHandle<()>>,
    finished: bool,
}

impl<L: ContentLoader> DeferredContentLoader<L> {
    /// Mount a deferred region. Nothing is loaded until the first render.
    #[must_use]
    pub fn new(ctx: RenderContext, loader: L, params: DisplayParams) -> Self {
        let (sender, state) = watch::channel(LoadState::Pending);
        let id = MountId::new();
        debug!(mount_id = %id, class_name = ?params.class_name, "deferred content mounted");

        Self {
            id,
            ctx,
            params,
            loader: Some(loader),
            slot: Arc::new(Mutex::new(Some(sender))),
            state,
            task: None,
            finished: false,
        }
    }

    /// Identifier used in this mount's log lines.
    #[must_use]
    pub const fn mount_id(&self) -> MountId {
        self.id
    }

    /// Display parameters forwarded to every view.
    #[must_use]
    pub const fn params(&self) -> &DisplayParams {
        &self.params
    }

    /// Whether the loader has been invoked.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.loader.is_none()
    }

    /// Snapshot of the current load state.
    #[must_use]
    pub fn state(&self) -> LoadState<L::Output> {
        self.state.borrow().clone()
    }

    /// Receiver for observers outside the owning view.
    ///
    /// Sees exactly one terminal update, or the channel closing when the
    /// view unmounts first.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<L::Output>> {
        self.state.clone()
    }

    /// The view to display now. The first call starts the load and always
    /// returns the placeholder.
    pub fn render(&mut self) -> View<L::Output> {
        let view = self.ctx.project(&self.state.borrow_and_update(), &self.params);
        self.finished = view.is_terminal();
        if let Some(loader) = self.loader.take() {
            self.start(loader);
        }
        view
    }

    /// Next distinct view: the placeholder first, then the terminal view.
    ///
    /// Returns `None` once the terminal view has been handed out, whether
    /// by this method or by [`render`](Self::render). Waits
    /// indefinitely for a loader that never settles unless the context
    /// sets a timeout.
    pub async fn next_view(&mut self) -> Option<View<L::Output>> {
        if !self.is_started() {
            return Some(self.render());
        }
        if self.finished {
            return None;
        }

        self.state.changed().await.ok()?;
        let view = self.ctx.project(&self.state.borrow_and_update(), &self.params);
        self.finished = view.is_terminal();
        Some(view)
    }

    /// Tear the view down. Equivalent to dropping it.
    pub fn unmount(self) {
        drop(self);
    }

    fn start(&mut self, loader: L) {
        let id = self.id;
        let slot = Arc::clone(&self.slot);
        let timeout = self.ctx.timeout();
        debug!(mount_id = %id, ?timeout, "loading deferred content");

        let task = self.ctx.runtime().spawn(async move {
            let state = run_loader(&loader, timeout).await;
            settle(id, &slot, state);
        });
        self.task = Some(task);
    }
}

impl<L: ContentLoader> Drop for DeferredContentLoader<L> {
    fn drop(&mut self) {
        let unsettled = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        debug!(mount_id = %self.id, unsettled, "deferred content unmounted");
    }
}

async fn run_loader<L: ContentLoader>(
    loader: &L,
    timeout: Option<Duration>,
) -> LoadState<L::Output> {
    let guarded = AssertUnwindSafe(loader.load()).catch_unwind();
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(outcome) => outcome,
            Err(_) => {
                let after_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                return LoadState::Failed(LoadError::TimedOut { after_ms });
            }
        },
        None => guarded.await,
    };

    match outcome {
        Ok(Ok(unit)) => LoadState::Ready(Arc::new(unit)),
        Ok(Err(error)) => LoadState::Failed(error),
        Err(payload) => LoadState::Failed(LoadError::Panicked(panic_message(&*payload))),
    }
}

/// Publish the terminal state unless the view already unmounted.
///
/// The send happens under the slot lock so it cannot interleave with
/// `Drop` emptying the slot.
fn settle<T>(id: MountId, slot: &Mutex<Option<watch::Sender<LoadState<T>>>>, state: LoadState<T>) {
    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(sender) = guard.take() else {
        debug!(mount_id = %id, "view unmounted before load settled, discarding result");
        return;
    };

    match &state {
        LoadState::Ready(_) => info!(mount_id = %id, "deferred content ready"),
        LoadState::Failed(error) => {
            warn!(mount_id = %id, code = error.code(), error = %error, "deferred content failed");
        }
        LoadState::Pending => {}
    }
    sender.send_replace(state);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|msg| (*msg).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "loader panicked".to_string())
}
