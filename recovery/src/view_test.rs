use super::*;
use crate::backoff::RETRY_CEILING;
use crate::context::ActionKind;
use crate::error::CaughtError;
use crate::state::{Event, reduce};

fn config(debug_panel: bool) -> BoundaryConfig {
    BoundaryConfig { debug_panel, ..BoundaryConfig::default() }
}

fn caught(message: &str, kind: &str) -> BoundaryState {
    reduce(&BoundaryState::default(), Event::caught(CaughtError::new(message, kind).with_stack_trace("at ResumeScreen")))
        .state
}

#[test]
fn healthy_state_renders_content() {
    assert_eq!(BoundaryView::of(&BoundaryState::default(), &config(true)), BoundaryView::Content);
}

#[test]
fn network_failure_renders_connection_problem() {
    let view = BoundaryView::of(&caught("Network request failed: timeout", "Error"), &config(false));
    let screen = view.recovery().expect("recovery screen");
    assert_eq!(screen.context.title, "Connection Problem");
    assert_eq!(screen.context.labels(), vec!["Try Again", "Check Network Settings"]);
    assert!(screen.buttons.iter().all(|b| b.enabled && !b.busy));
    assert!(screen.exhausted_notice.is_none());
}

#[test]
fn type_error_renders_data_error() {
    let view = BoundaryView::of(&caught("Cannot read property 'x' of undefined", "TypeError"), &config(false));
    let screen = view.recovery().expect("recovery screen");
    assert_eq!(screen.context.category, ErrorCategory::Data);
    assert_eq!(screen.context.labels(), vec!["Try Again", "Clear Cache & Retry"]);
}

#[test]
fn retry_buttons_are_busy_and_disabled_while_retrying() {
    let state = reduce(&caught("something odd", "Error"), Event::RetryPressed).state;
    let view = BoundaryView::of(&state, &config(false));
    let screen = view.recovery().expect("recovery screen");
    assert!(screen.retrying);

    let retry = screen.button("Try Again").expect("retry button");
    assert!(!retry.enabled);
    assert!(retry.busy);

    let home = screen.button("Go Home").expect("home button");
    assert!(home.enabled);
    assert!(!home.busy);
    assert!(screen.button("Contact Support").expect("support button").enabled);
}

#[test]
fn exhausted_retry_stays_visible_but_disabled() {
    let mut state = caught("something odd", "Error");
    for _ in 0..RETRY_CEILING {
        let pressed = reduce(&state, Event::RetryPressed).state;
        let done = reduce(&pressed, Event::RetryElapsed { generation: pressed.generation() }).state;
        state = reduce(&done, Event::caught(CaughtError::new("something odd", "Error"))).state;
    }

    let view = BoundaryView::of(&state, &config(false));
    let screen = view.recovery().expect("recovery screen");
    let retry = screen.buttons.iter().find(|b| b.action.kind == ActionKind::Retry).expect("retry still listed");
    assert!(!retry.enabled);
    assert!(!retry.busy);
    assert_eq!(screen.exhausted_notice, Some(EXHAUSTED_NOTICE));
    assert!(screen.button("Contact Support").expect("support").enabled);
    assert!(screen.button("Go Home").expect("home").enabled);
}

#[test]
fn debug_gate_requires_debug_build() {
    assert!(debug_allowed(true, &config(true)));
    assert!(!debug_allowed(true, &config(false)));
    assert!(!debug_allowed(false, &config(true)));
    assert!(!debug_allowed(false, &config(false)));
}

#[test]
fn debug_panel_hidden_when_disabled() {
    let state = caught("boom at render", "Error");
    let hidden = BoundaryView::of(&state, &config(false));
    assert!(hidden.recovery().expect("screen").debug.is_none());
}

#[cfg(not(debug_assertions))]
#[test]
fn release_build_never_shows_raw_error() {
    let state = caught("secret sql text", "Error");
    let view = BoundaryView::of(&state, &config(true));
    assert!(view.recovery().expect("screen").debug.is_none());
}

#[cfg(debug_assertions)]
#[test]
fn debug_build_shows_panel_when_enabled() {
    let state = caught("boom at render", "Error");
    let shown = BoundaryView::of(&state, &config(true));
    let debug = shown.recovery().expect("screen").debug.clone().expect("debug panel");
    assert_eq!(debug.message, "boom at render");
    assert_eq!(debug.kind, "Error");
    assert_eq!(debug.category, ErrorCategory::Ui);
    assert_eq!(debug.stack_trace.as_deref(), Some("at ResumeScreen"));
}

#[test]
fn view_serializes_with_tag() {
    let json = serde_json::to_value(BoundaryView::Content).expect("serialize");
    assert_eq!(json, serde_json::json!({ "view": "content" }));
}
