//! Behavioural tests for deferred content mounts.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;
use rstest::rstest;
use tokio::runtime::Handle;
use tokio::time::sleep;

use super::*;

/// Counts invocations and completed loads of one loader.
#[derive(Clone, Default)]
struct Counters {
    invoked: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
}

impl Counters {
    fn invoked(&self) -> usize {
        self.invoked.load(Ordering::SeqCst)
    }

    fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

fn delayed(
    delay_ms: u64,
    value: &'static str,
    counters: &Counters,
) -> impl ContentLoader<Output = &'static str> {
    let counters = counters.clone();
    loader_fn(move || {
        counters.invoked.fetch_add(1, Ordering::SeqCst);
        let completed = Arc::clone(&counters.completed);
        async move {
            sleep(Duration::from_millis(delay_ms)).await;
            completed.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        }
    })
}

fn failing(error: LoadError) -> impl ContentLoader<Output = &'static str> {
    loader_fn(move || {
        let error = error.clone();
        async move { Err(error) }
    })
}

struct PanickingLoader;

#[async_trait]
impl ContentLoader for PanickingLoader {
    type Output = String;

    async fn load(&self) -> Result<String, LoadError> {
        panic!("scene graph exploded")
    }
}

fn ctx() -> RenderContext {
    RenderContext::new(Handle::current())
        .with_placeholder_text("Loading widget")
        .with_failure_text("Widget unavailable")
}

#[tokio::test(start_paused = true)]
async fn test_placeholder_then_content_after_delay() {
    let counters = Counters::default();
    let mut mount = DeferredContentLoader::new(
        ctx(),
        delayed(50, "X", &counters),
        DisplayParams::default(),
    );

    let first = mount.render();
    assert_eq!(
        first,
        View::Placeholder {
            params: DisplayParams::default(),
            status_text: "Loading widget".to_string(),
        }
    );

    sleep(Duration::from_millis(60)).await;

    match mount.render() {
        View::Content { unit, .. } => assert_eq!(*unit, "X"),
        other => panic!("expected content at 60ms, got {other:?}"),
    }
    assert_eq!(counters.invoked(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_placeholder_first_even_for_ready_loader() {
    let counters = Counters::default();
    let mut mount = DeferredContentLoader::new(
        ctx(),
        delayed(0, "instant", &counters),
        DisplayParams::default(),
    );

    assert_eq!(mount.render().phase(), LoadPhase::Pending);
    assert_eq!(mount.next_view().await.map(|v| v.phase()), Some(LoadPhase::Ready));
}

#[tokio::test(start_paused = true)]
async fn test_nothing_loads_before_first_render() {
    let counters = Counters::default();
    let mount =
        DeferredContentLoader::new(ctx(), delayed(5, "X", &counters), DisplayParams::default());

    sleep(Duration::from_millis(20)).await;
    assert!(!mount.is_started());
    assert!(mount.state().is_pending());
    assert_eq!(counters.invoked(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_loader_invoked_once_per_mount() {
    let counters = Counters::default();
    let mut mount =
        DeferredContentLoader::new(ctx(), delayed(10, "X", &counters), DisplayParams::default());

    for _ in 0..5 {
        let _ = mount.render();
    }
    sleep(Duration::from_millis(20)).await;
    for _ in 0..5 {
        let _ = mount.render();
    }
    assert_eq!(counters.invoked(), 1);
    mount.unmount();

    // A fresh mount re-invokes the loader; nothing is cached across mounts.
    let mut remount =
        DeferredContentLoader::new(ctx(), delayed(10, "X", &counters), DisplayParams::default());
    let _ = remount.render();
    sleep(Duration::from_millis(20)).await;
    assert_eq!(counters.invoked(), 2);
    assert_eq!(remount.state().phase(), LoadPhase::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_content_never_reverts_to_placeholder() {
    let counters = Counters::default();
    let mut mount =
        DeferredContentLoader::new(ctx(), delayed(50, "X", &counters), DisplayParams::default());

    assert_eq!(mount.next_view().await.map(|v| v.phase()), Some(LoadPhase::Pending));
    assert_eq!(mount.next_view().await.map(|v| v.phase()), Some(LoadPhase::Ready));
    assert!(mount.next_view().await.is_none());

    sleep(Duration::from_secs(5)).await;
    for _ in 0..3 {
        assert_eq!(mount.render().phase(), LoadPhase::Ready);
    }
}

#[tokio::test(start_paused = true)]
async fn test_terminal_view_from_render_is_not_repeated() {
    let counters = Counters::default();
    let mut mount =
        DeferredContentLoader::new(ctx(), delayed(10, "X", &counters), DisplayParams::default());

    assert_eq!(mount.render().phase(), LoadPhase::Pending);
    sleep(Duration::from_millis(20)).await;
    assert_eq!(mount.render().phase(), LoadPhase::Ready);
    assert!(mount.next_view().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unmount_while_pending_suppresses_update() {
    let counters = Counters::default();
    let mut mount =
        DeferredContentLoader::new(ctx(), delayed(50, "X", &counters), DisplayParams::default());
    let observer = mount.subscribe();

    let _ = mount.render();
    sleep(Duration::from_millis(10)).await;
    mount.unmount();

    sleep(Duration::from_millis(50)).await;

    assert_eq!(counters.invoked(), 1);
    assert_eq!(counters.completed(), 0, "load should be aborted on unmount");
    assert!(observer.borrow().is_pending());
    assert!(observer.has_changed().is_err(), "channel closes without an update");
}

#[tokio::test(start_paused = true)]
async fn test_unmount_before_render_never_invokes_loader() {
    let counters = Counters::default();
    let mount =
        DeferredContentLoader::new(ctx(), delayed(5, "X", &counters), DisplayParams::default());
    drop(mount);

    sleep(Duration::from_millis(20)).await;
    assert_eq!(counters.invoked(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_observer_sees_single_terminal_update() {
    let counters = Counters::default();
    let mut mount =
        DeferredContentLoader::new(ctx(), delayed(30, "X", &counters), DisplayParams::default());
    let mut observer = mount.subscribe();

    let _ = mount.render();
    observer.changed().await.unwrap();
    assert_eq!(observer.borrow_and_update().phase(), LoadPhase::Ready);
    assert!(observer.changed().await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unmount_racing_instant_loader_never_publishes_late() {
    for round in 0..500 {
        let mut mount = DeferredContentLoader::new(
            RenderContext::new(Handle::current()),
            loader_fn(|| async { Ok("X") }),
            DisplayParams::default(),
        );
        let observer = mount.subscribe();

        let _ = mount.render();
        if round % 2 == 0 {
            tokio::task::yield_now().await;
        }
        mount.unmount();

        // Either the load settled before unmount or it never will.
        let at_unmount = observer.borrow().phase();
        assert!(matches!(at_unmount, LoadPhase::Pending | LoadPhase::Ready));
        assert!(observer.has_changed().is_err(), "round {round}: channel still open");

        tokio::task::yield_now().await;
        assert_eq!(observer.borrow().phase(), at_unmount, "round {round}: late update");
    }
}

#[rstest]
#[case::not_found(LoadError::not_found("widgets/orb.js"), "NOT_FOUND")]
#[case::source(LoadError::source("connection reset"), "SOURCE_ERROR")]
#[tokio::test(start_paused = true)]
async fn test_loader_error_renders_failure(#[case] error: LoadError, #[case] code: &str) {
    let mut mount = DeferredContentLoader::new(
        ctx(),
        failing(error.clone()),
        DisplayParams::with_class("widget-a"),
    );

    assert_eq!(mount.next_view().await.map(|v| v.phase()), Some(LoadPhase::Pending));
    match mount.next_view().await {
        Some(View::Failure {
            params,
            message,
            error: reported,
        }) => {
            assert_eq!(params, DisplayParams::with_class("widget-a"));
            assert_eq!(message, "Widget unavailable");
            assert_eq!(reported, error);
            assert_eq!(reported.code(), code);
        }
        other => panic!("expected failure view, got {other:?}"),
    }
    assert!(mount.next_view().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_panicking_loader_is_contained() {
    let mut mount = DeferredContentLoader::new(ctx(), PanickingLoader, DisplayParams::default());

    let _ = mount.next_view().await;
    match mount.next_view().await {
        Some(View::Failure { error, .. }) => {
            assert_eq!(error, LoadError::Panicked("scene graph exploded".to_string()));
        }
        other => panic!("expected failure view, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_fails_slow_loader() {
    let counters = Counters::default();
    let mut mount = DeferredContentLoader::new(
        ctx().with_timeout(Duration::from_millis(100)),
        delayed(1_000, "X", &counters),
        DisplayParams::default(),
    );

    let _ = mount.next_view().await;
    match mount.next_view().await {
        Some(View::Failure { error, .. }) => {
            assert_eq!(error, LoadError::TimedOut { after_ms: 100 });
        }
        other => panic!("expected timeout failure, got {other:?}"),
    }
    assert_eq!(counters.completed(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_pending_loader_stays_pending_without_timeout() {
    let counters = Counters::default();
    let mut mount = DeferredContentLoader::new(
        ctx(),
        delayed(3_600_000, "X", &counters),
        DisplayParams::default(),
    );

    let _ = mount.render();
    sleep(Duration::from_secs(600)).await;
    assert!(mount.state().is_pending());
    assert_eq!(mount.render().phase(), LoadPhase::Pending);
}

#[test]
fn test_mount_ids_differ() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let counters = Counters::default();
    let ctx = RenderContext::new(runtime.handle().clone());

    let a = DeferredContentLoader::new(
        ctx.clone(),
        delayed(1, "a", &counters),
        DisplayParams::default(),
    );
    let b = DeferredContentLoader::new(ctx, delayed(1, "b", &counters), DisplayParams::default());
    assert_ne!(a.mount_id(), b.mount_id());
}

proptest! {
    /// Display parameters reach the placeholder and the content unchanged.
    #[test]
    fn prop_display_params_forwarded_in_every_state(class_name in "[a-z][a-z0-9-]{0,24}") {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let params = DisplayParams::with_class(class_name.clone());

        let (placeholder, content) = runtime.block_on(async {
            let counters = Counters::default();
            let mut mount = DeferredContentLoader::new(
                RenderContext::new(Handle::current()),
                delayed(1, "X", &counters),
                params.clone(),
            );
            let placeholder = mount.next_view().await;
            let content = mount.next_view().await;
            (placeholder, content)
        });

        let placeholder = placeholder.unwrap();
        let content = content.unwrap();
        prop_assert_eq!(placeholder.phase(), LoadPhase::Pending);
        prop_assert_eq!(content.phase(), LoadPhase::Ready);
        prop_assert_eq!(placeholder.params().class_name.as_deref(), Some(class_name.as_str()));
        prop_assert_eq!(content.params().class_name.as_deref(), Some(class_name.as_str()));
    }
}
