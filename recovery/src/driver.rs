//! Tokio driver for the boundary state machine.
//!
//! DESIGN
//! ======
//! [`Boundary`] is a cloneable handle over one boundary instance. `dispatch`
//! runs the pure reducer under a mutex, publishes the new state on a `watch`
//! channel, then executes the returned effects with the lock released, so
//! hooks may call back into the boundary.
//!
//! The backoff delay is the only suspension point. It runs as a spawned
//! `tokio::time::sleep` task whose `AbortHandle` is kept for cancellation.
//! The task holds a weak reference and re-enters through
//! `Event::RetryElapsed { generation }`; the reducer drops completions whose
//! generation is stale, so an abort that loses the race is still harmless.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here propagates. Hook panics and cache-clear failures are logged
//! with `warn!` and the recovery flow continues.

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::classify::{ErrorCategory, classify};
use crate::config::BoundaryConfig;
use crate::context::ActionKind;
use crate::error::{CaughtError, RecoveryError};
use crate::hooks::{BoundaryHooks, guarded};
use crate::state::{BoundaryState, Effect, Event, Ignored, ResetReason, reduce};
use crate::support::SupportMail;
use crate::view::{BoundaryView, RecoveryScreen};

/// Outcome of rendering through a boundary.
#[derive(Debug)]
pub enum Rendered<T> {
    Content(T),
    Recovery(RecoveryScreen),
    /// The boundary was unmounted; nothing renders.
    Unmounted,
}

/// Structured error report emitted to the log for each catch.
#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    boundary_id: Uuid,
    screen: Option<&'a str>,
    category: ErrorCategory,
    message: &'a str,
    kind: &'a str,
    stack_trace: Option<&'a str>,
    component_stack: Option<&'a str>,
}

#[derive(Clone)]
pub struct Boundary {
    inner: Arc<Inner>,
}

struct Inner {
    id: Uuid,
    screen_name: Option<String>,
    config: BoundaryConfig,
    hooks: Arc<dyn BoundaryHooks>,
    runtime: tokio::runtime::Handle,
    slot: Mutex<Slot>,
    states: watch::Sender<BoundaryState>,
}

struct Slot {
    state: BoundaryState,
    pending: Option<AbortHandle>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = slot.pending.take() {
            pending.abort();
        }
    }
}

impl Boundary {
    /// Mount a boundary on the current tokio runtime.
    pub fn mount(
        screen_name: Option<&str>,
        config: BoundaryConfig,
        hooks: Arc<dyn BoundaryHooks>,
    ) -> Result<Self, RecoveryError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| RecoveryError::NoRuntime)?;
        let (states, _) = watch::channel(BoundaryState::default());
        let inner = Inner {
            id: Uuid::new_v4(),
            screen_name: screen_name.map(str::to_owned),
            config,
            hooks,
            runtime,
            slot: Mutex::new(Slot { state: BoundaryState::default(), pending: None }),
            states,
        };
        info!(boundary = %inner.id, screen = ?inner.screen_name, "boundary mounted");
        Ok(Self { inner: Arc::new(inner) })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    #[must_use]
    pub fn state(&self) -> BoundaryState {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn view(&self) -> BoundaryView {
        BoundaryView::of(&self.state(), &self.inner.config)
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BoundaryState> {
        self.inner.states.subscribe()
    }

    /// Render the wrapped subtree, or the recovery screen while an error is
    /// showing. An `Err` or a panic from `render` is caught and classified.
    ///
    /// Any `std::error::Error` converts into a [`CaughtError`]; return a
    /// `CaughtError` directly to control the kind hint.
    pub fn render<T, E, F>(&self, render: F) -> Rendered<T>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<CaughtError>,
    {
        let state = self.state();
        if !state.is_mounted() {
            return Rendered::Unmounted;
        }
        if let BoundaryView::Recovery(screen) = BoundaryView::of(&state, &self.inner.config) {
            return Rendered::Recovery(screen);
        }

        let error = match catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(content)) => return Rendered::Content(content),
            Ok(Err(err)) => err.into(),
            Err(payload) => CaughtError::from_panic(payload),
        };
        self.catch(error, None);

        match self.view() {
            BoundaryView::Recovery(screen) => Rendered::Recovery(screen),
            BoundaryView::Content => Rendered::Unmounted,
        }
    }

    /// Record a render failure raised outside [`Boundary::render`].
    pub fn catch(&self, error: CaughtError, component_stack: Option<String>) {
        self.dispatch(Event::Caught { error, component_stack });
    }

    /// Press a recovery action. Returns why the press was ignored, if it was.
    pub fn press(&self, action: ActionKind) -> Option<Ignored> {
        self.dispatch(action.event())
    }

    /// Tear the boundary down; a pending backoff never completes.
    pub fn unmount(&self) {
        self.dispatch(Event::Unmount);
        info!(boundary = %self.inner.id, "boundary unmounted");
    }

    /// Apply one event and run its effects.
    pub fn dispatch(&self, event: Event) -> Option<Ignored> {
        let label = event_label(&event);
        let transition = {
            let mut slot = self.lock();
            let transition = reduce(&slot.state, event);
            if transition.ignored.is_none() {
                slot.state = transition.state.clone();
                self.inner.states.send_replace(transition.state.clone());
            }
            transition
        };

        if let Some(reason) = transition.ignored {
            debug!(boundary = %self.inner.id, event = label, ?reason, "event ignored");
            return Some(reason);
        }

        let state = &transition.state;
        debug!(
            boundary = %self.inner.id,
            event = label,
            has_error = state.has_error,
            retry_count = state.retry_count,
            is_retrying = state.is_retrying,
            "boundary transition"
        );
        for effect in transition.effects {
            self.run(effect);
        }
        None
    }

    fn run(&self, effect: Effect) {
        let hooks = &self.inner.hooks;
        match effect {
            Effect::ReportError { error, component_stack } => {
                self.report(&error, component_stack.as_deref());
                self.call_hook("on_error", || hooks.on_error(&error, component_stack.as_deref()));
            }
            Effect::ClearCache => match guarded("clear_cache", || hooks.clear_cache()) {
                Ok(Ok(())) => debug!(boundary = %self.inner.id, "cache cleared"),
                Ok(Err(e)) | Err(e) => warn!(boundary = %self.inner.id, error = %e, "cache clear failed; retrying anyway"),
            },
            Effect::ScheduleRetry { generation, delay } => self.schedule_retry(generation, delay),
            Effect::CancelRetry => {
                if let Some(pending) = self.lock().pending.take() {
                    pending.abort();
                    debug!(boundary = %self.inner.id, "pending retry cancelled");
                }
            }
            Effect::NotifyReset(reason) => {
                if reason == ResetReason::Retry {
                    // The completing timer task is the one calling us.
                    self.lock().pending = None;
                }
                info!(boundary = %self.inner.id, reason = ?reason, "boundary reset");
                self.call_hook("on_reset", || hooks.on_reset(reason));
            }
            Effect::NavigateHome => self.call_hook("navigate_home", || hooks.navigate_home()),
            Effect::Reauthenticate => self.call_hook("reauthenticate", || hooks.reauthenticate()),
            Effect::OpenSettings => self.call_hook("open_settings", || hooks.open_settings()),
            Effect::ContactSupport { error, category } => {
                let mail = SupportMail::compose(
                    error.as_ref(),
                    category,
                    self.inner.screen_name.as_deref(),
                    &self.inner.config,
                );
                self.call_hook("open_mail_composer", || hooks.open_mail_composer(&mail));
            }
        }
    }

    fn schedule_retry(&self, generation: u64, delay: std::time::Duration) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let task = self.inner.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                Boundary { inner }.dispatch(Event::RetryElapsed { generation });
            }
        });

        let previous = self.lock().pending.replace(task.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }
        info!(
            boundary = %self.inner.id,
            generation,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "retry scheduled"
        );
    }

    fn report(&self, error: &CaughtError, component_stack: Option<&str>) {
        let report = ErrorReport {
            boundary_id: self.inner.id,
            screen: self.inner.screen_name.as_deref(),
            category: classify(Some(error)),
            message: &error.message,
            kind: &error.kind_hint,
            stack_trace: error.stack_trace.as_deref(),
            component_stack,
        };
        match serde_json::to_string(&report) {
            Ok(json) => error!(boundary = %self.inner.id, category = %report.category, report = %json, "render failure caught"),
            Err(e) => warn!(boundary = %self.inner.id, error = %e, "failed to serialize error report"),
        }
    }

    fn call_hook(&self, hook: &'static str, f: impl FnOnce()) {
        if let Err(e) = guarded(hook, f) {
            warn!(boundary = %self.inner.id, error = %e, "boundary hook failed");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn event_label(event: &Event) -> &'static str {
    match event {
        Event::Caught { .. } => "caught",
        Event::RetryPressed => "retry",
        Event::ClearCacheAndRetryPressed => "clear_cache_and_retry",
        Event::RetryElapsed { .. } => "retry_elapsed",
        Event::GoHome => "go_home",
        Event::Reauthenticate => "reauthenticate",
        Event::OpenSettings => "open_settings",
        Event::ContactSupport => "contact_support",
        Event::Unmount => "unmount",
    }
}
