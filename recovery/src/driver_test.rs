use std::time::Duration;

use super::*;
use crate::backoff::RETRY_CEILING;

#[derive(Debug, thiserror::Error)]
#[error("Network request failed: timeout")]
struct FetchTimeout;

#[derive(Default)]
struct RecordingHooks {
    calls: Mutex<Vec<String>>,
    fail_cache_clear: bool,
    panic_on_error: bool,
}

impl RecordingHooks {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl BoundaryHooks for RecordingHooks {
    fn on_error(&self, error: &CaughtError, _component_stack: Option<&str>) {
        self.record(format!("on_error:{}", error.message));
        if self.panic_on_error {
            panic!("crash reporter offline");
        }
    }

    fn on_reset(&self, reason: ResetReason) {
        self.record(format!("on_reset:{reason:?}"));
    }

    fn clear_cache(&self) -> Result<(), RecoveryError> {
        self.record("clear_cache");
        if self.fail_cache_clear {
            return Err(RecoveryError::CacheClear("storage locked".into()));
        }
        Ok(())
    }

    fn open_settings(&self) {
        self.record("open_settings");
    }

    fn open_mail_composer(&self, mail: &SupportMail) {
        self.record(format!("mail:{}", mail.subject));
    }

    fn navigate_home(&self) {
        self.record("navigate_home");
    }

    fn reauthenticate(&self) {
        self.record("reauthenticate");
    }
}

fn config() -> BoundaryConfig {
    BoundaryConfig { debug_panel: false, ..BoundaryConfig::default() }
}

fn mount_with(hooks: RecordingHooks) -> (Boundary, Arc<RecordingHooks>) {
    let hooks = Arc::new(hooks);
    let boundary = Boundary::mount(Some("ResumeTailor"), config(), hooks.clone()).expect("runtime present");
    (boundary, hooks)
}

fn mount() -> (Boundary, Arc<RecordingHooks>) {
    mount_with(RecordingHooks::default())
}

fn fail_render(boundary: &Boundary) {
    let rendered = boundary.render(|| Err::<(), _>(FetchTimeout));
    assert!(matches!(rendered, Rendered::Recovery(_)), "render should fail into recovery");
}

// =============================================================
// Mount
// =============================================================

#[test]
fn mount_without_runtime_fails() {
    let result = Boundary::mount(None, config(), Arc::new(crate::hooks::NoopHooks));
    assert!(matches!(result, Err(RecoveryError::NoRuntime)));
}

#[tokio::test]
async fn boundaries_have_distinct_ids() {
    let (a, _) = mount();
    let (b, _) = mount();
    assert_ne!(a.id(), b.id());
}

// =============================================================
// Render
// =============================================================

#[tokio::test]
async fn healthy_render_is_transparent() {
    let (boundary, hooks) = mount();
    let rendered = boundary.render(|| Ok::<_, FetchTimeout>("dashboard"));
    assert!(matches!(rendered, Rendered::Content("dashboard")));
    assert!(boundary.state().is_pristine());
    assert!(hooks.calls().is_empty());
}

#[tokio::test]
async fn failed_render_classifies_and_reports() {
    let (boundary, hooks) = mount();
    let Rendered::Recovery(screen) = boundary.render(|| Err::<(), _>(FetchTimeout)) else {
        panic!("expected recovery screen");
    };
    assert_eq!(screen.context.title, "Connection Problem");
    assert_eq!(screen.context.labels(), vec!["Try Again", "Check Network Settings"]);
    assert_eq!(hooks.calls(), vec!["on_error:Network request failed: timeout".to_owned()]);

    let state = boundary.state();
    assert!(state.has_error);
    assert_eq!(state.current_error.map(|e| e.kind_hint), Some("FetchTimeout".to_owned()));
}

#[tokio::test]
async fn panicking_render_is_caught() {
    let (boundary, _) = mount();
    let rendered = boundary.render(|| -> Result<(), FetchTimeout> { panic!("Invalid props for ResumeCard") });
    let Rendered::Recovery(screen) = rendered else {
        panic!("expected recovery screen");
    };
    assert_eq!(screen.context.title, "Display Error");
}

#[tokio::test]
async fn caught_error_keeps_explicit_kind_hint() {
    let (boundary, _) = mount();
    let rendered = boundary.render(|| Err::<(), _>(CaughtError::new("Unexpected token < in JSON", "SyntaxError")));
    let Rendered::Recovery(screen) = rendered else {
        panic!("expected recovery screen");
    };
    assert_eq!(screen.context.category, ErrorCategory::Data);
    let state = boundary.state();
    assert_eq!(state.current_error.map(|e| e.kind_hint), Some("SyntaxError".to_owned()));
}

#[tokio::test]
async fn subtree_is_not_rendered_while_error_showing() {
    let (boundary, _) = mount();
    fail_render(&boundary);

    let mut called = false;
    let rendered = boundary.render(|| {
        called = true;
        Ok::<_, FetchTimeout>(())
    });
    assert!(matches!(rendered, Rendered::Recovery(_)));
    assert!(!called);
}

#[tokio::test]
async fn on_error_panic_is_swallowed() {
    let (boundary, hooks) = mount_with(RecordingHooks { panic_on_error: true, ..RecordingHooks::default() });
    fail_render(&boundary);
    assert!(boundary.state().has_error);
    assert_eq!(hooks.count("on_error"), 1);
}

// =============================================================
// Retry / backoff
// =============================================================

#[tokio::test(start_paused = true)]
async fn retry_completes_after_one_second() {
    let (boundary, hooks) = mount();
    fail_render(&boundary);

    assert_eq!(boundary.press(ActionKind::Retry), None);
    assert!(boundary.state().is_retrying, "retrying is visible before the delay");

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(boundary.state().is_retrying);
    assert!(boundary.state().has_error);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let state = boundary.state();
    assert!(!state.is_retrying);
    assert!(!state.has_error);
    assert_eq!(state.retry_count, 1);
    assert_eq!(hooks.count("on_reset:Retry"), 1);

    let rendered = boundary.render(|| Ok::<_, FetchTimeout>("recovered"));
    assert!(matches!(rendered, Rendered::Content("recovered")));
}

#[tokio::test(start_paused = true)]
async fn backoff_doubles_each_cycle() {
    let (boundary, _) = mount();
    let mut observed = Vec::new();

    for _ in 0..RETRY_CEILING {
        fail_render(&boundary);
        boundary.press(ActionKind::Retry);
        let started = tokio::time::Instant::now();
        let mut states = boundary.subscribe();
        while boundary.state().is_retrying {
            states.changed().await.expect("boundary alive");
        }
        observed.push(started.elapsed());
    }

    assert_eq!(observed, vec![Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(4)]);
    assert_eq!(boundary.state().retry_count, RETRY_CEILING);
}

#[tokio::test(start_paused = true)]
async fn presses_while_retrying_are_noops() {
    let (boundary, _) = mount();
    fail_render(&boundary);
    boundary.press(ActionKind::Retry);
    let generation = boundary.state().generation();

    for _ in 0..5 {
        assert_eq!(boundary.press(ActionKind::Retry), Some(Ignored::RetryInFlight));
        assert_eq!(boundary.press(ActionKind::ClearCacheAndRetry), Some(Ignored::RetryInFlight));
    }
    let state = boundary.state();
    assert_eq!(state.generation(), generation);
    assert_eq!(state.retry_count, 0);

    tokio::time::sleep(Duration::from_secs(1) + Duration::from_millis(1)).await;
    assert_eq!(boundary.state().retry_count, 1);
}

#[tokio::test(start_paused = true)]
async fn fourth_retry_changes_nothing() {
    let (boundary, _) = mount();
    for _ in 0..RETRY_CEILING {
        fail_render(&boundary);
        boundary.press(ActionKind::Retry);
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
    fail_render(&boundary);

    let before = boundary.state();
    assert_eq!(before.retry_count, RETRY_CEILING);
    assert_eq!(boundary.press(ActionKind::Retry), Some(Ignored::Exhausted));
    assert_eq!(boundary.state(), before);

    let Rendered::Recovery(screen) = boundary.render(|| Ok::<_, FetchTimeout>(())) else {
        panic!("error still showing");
    };
    assert!(!screen.buttons[0].enabled);
    assert!(screen.exhausted_notice.is_some());
}

#[tokio::test(start_paused = true)]
async fn clear_cache_failure_does_not_block_retry() {
    let (boundary, hooks) = mount_with(RecordingHooks { fail_cache_clear: true, ..RecordingHooks::default() });
    boundary.catch(CaughtError::new("Unexpected token in JSON", "SyntaxError"), None);

    assert_eq!(boundary.press(ActionKind::ClearCacheAndRetry), None);
    assert_eq!(hooks.count("clear_cache"), 1);
    assert!(boundary.state().is_retrying);

    tokio::time::sleep(Duration::from_millis(1001)).await;
    let state = boundary.state();
    assert!(!state.has_error);
    assert_eq!(state.retry_count, 1);
}

// =============================================================
// Reset
// =============================================================

#[tokio::test(start_paused = true)]
async fn go_home_during_retry_cancels_and_resets() {
    let (boundary, hooks) = mount();
    fail_render(&boundary);
    boundary.press(ActionKind::Retry);

    boundary.press(ActionKind::GoHome);
    assert!(boundary.state().is_pristine());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(boundary.state().is_pristine());
    assert_eq!(hooks.count("on_reset:Retry"), 0);
    assert_eq!(hooks.count("navigate_home"), 1);
    assert_eq!(hooks.count("on_reset:GoHome"), 1);
}

#[tokio::test]
async fn reauthenticate_resets_retry_count() {
    let (boundary, hooks) = mount();
    boundary.catch(CaughtError::new("401 Unauthorized", "Error"), None);
    assert_eq!(boundary.view().recovery().expect("screen").context.title, "Session Expired");

    assert_eq!(boundary.press(ActionKind::Reauthenticate), None);
    assert!(boundary.state().is_pristine());
    assert_eq!(
        hooks.calls(),
        vec!["on_error:401 Unauthorized".to_owned(), "reauthenticate".to_owned(), "on_reset:Reauthenticate".to_owned()]
    );
}

// =============================================================
// Platform actions
// =============================================================

#[tokio::test]
async fn contact_support_composes_mail() {
    let (boundary, hooks) = mount();
    boundary.catch(CaughtError::new("mystery", "Error"), None);
    boundary.press(ActionKind::ContactSupport);
    assert_eq!(hooks.count("mail:CareerPath error report: unknown"), 1);
    assert!(boundary.state().has_error);
}

#[tokio::test]
async fn open_settings_reaches_platform() {
    let (boundary, hooks) = mount();
    fail_render(&boundary);
    boundary.press(ActionKind::OpenNetworkSettings);
    assert_eq!(hooks.count("open_settings"), 1);
}

// =============================================================
// Cancellation
// =============================================================

#[tokio::test(start_paused = true)]
async fn unmount_during_backoff_prevents_completion() {
    let (boundary, hooks) = mount();
    fail_render(&boundary);
    boundary.press(ActionKind::Retry);
    let mut states = boundary.subscribe();
    states.borrow_and_update();

    boundary.unmount();
    let after_unmount = boundary.state();
    assert!(!after_unmount.is_mounted());
    states.borrow_and_update();

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(boundary.state(), after_unmount);
    assert!(!states.has_changed().expect("sender alive"));
    assert_eq!(hooks.count("on_reset"), 0);
    assert!(matches!(boundary.render(|| Ok::<_, FetchTimeout>(())), Rendered::Unmounted));
}

#[tokio::test(start_paused = true)]
async fn dropping_boundary_during_backoff_is_silent() {
    let (boundary, hooks) = mount();
    fail_render(&boundary);
    boundary.press(ActionKind::Retry);
    drop(boundary);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(hooks.count("on_reset"), 0);
}

#[tokio::test]
async fn subscribers_see_catch() {
    let (boundary, _) = mount();
    let mut states = boundary.subscribe();
    fail_render(&boundary);
    assert!(states.has_changed().expect("sender alive"));
    assert!(states.borrow_and_update().has_error);
}
