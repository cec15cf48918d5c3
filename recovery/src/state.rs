//! Boundary state machine.
//!
//! DESIGN
//! ======
//! [`reduce`] is a pure `(state, event) -> (state, effects)` function. It never
//! sleeps, logs or calls collaborators; it returns [`Effect`] values that an
//! outer driver executes (the tokio [`crate::driver::Boundary`] natively, a
//! Leptos signal in the browser).
//!
//! Retry lifecycle: `Idle -> Retrying -> Idle`, with "exhausted" derived from
//! `retry_count >= RETRY_CEILING` rather than stored.
//!
//! CANCELLATION
//! ============
//! Every scheduled retry, reset and unmount bumps `generation`. A backoff
//! completion carries the generation it was scheduled under and is ignored
//! when it no longer matches, so a timer that outlives its boundary (or a
//! reset) can never mutate state.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::time::Duration;

use serde::Serialize;

use crate::backoff::{backoff_delay, is_exhausted};
use crate::classify::{ErrorCategory, classify};
use crate::error::CaughtError;

/// State owned by one boundary instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoundaryState {
    pub has_error: bool,
    pub current_error: Option<CaughtError>,
    /// Completed retries since the last reset. Never exceeds the ceiling.
    pub retry_count: u32,
    /// True only while a backoff delay is in flight.
    pub is_retrying: bool,
    #[serde(skip)]
    generation: u64,
    #[serde(skip)]
    mounted: bool,
}

impl Default for BoundaryState {
    fn default() -> Self {
        Self { has_error: false, current_error: None, retry_count: 0, is_retrying: false, generation: 0, mounted: true }
    }
}

impl BoundaryState {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        is_exhausted(self.retry_count)
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        classify(self.current_error.as_ref())
    }

    /// Whether the user-visible fields hold their initial values.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        !self.has_error && self.current_error.is_none() && self.retry_count == 0 && !self.is_retrying
    }

    /// A retry may start only with an error showing, nothing in flight and
    /// budget remaining.
    fn retry_blocker(&self) -> Option<Ignored> {
        if !self.has_error {
            Some(Ignored::NoError)
        } else if self.is_retrying {
            Some(Ignored::RetryInFlight)
        } else if self.is_exhausted() {
            Some(Ignored::Exhausted)
        } else {
            None
        }
    }
}

/// Inputs to the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The wrapped subtree failed to render.
    Caught { error: CaughtError, component_stack: Option<String> },
    RetryPressed,
    ClearCacheAndRetryPressed,
    /// A backoff delay scheduled under `generation` finished.
    RetryElapsed { generation: u64 },
    GoHome,
    Reauthenticate,
    OpenSettings,
    ContactSupport,
    Unmount,
}

impl Event {
    #[must_use]
    pub fn caught(error: CaughtError) -> Self {
        Self::Caught { error, component_stack: None }
    }
}

/// Why a reset happened; passed to the owner's reset callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    Retry,
    GoHome,
    Reauthenticate,
}

/// Side effects requested by the reducer, executed in order by a driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Forward the failure to the owner's error hook and the log.
    ReportError { error: CaughtError, component_stack: Option<String> },
    /// Invalidate local caches; failures are logged and swallowed.
    ClearCache,
    /// Start the cancellable backoff timer, then raise `RetryElapsed`.
    ScheduleRetry { generation: u64, delay: Duration },
    /// Drop any pending backoff timer.
    CancelRetry,
    /// Tell the owner to reinitialize the subtree's data.
    NotifyReset(ResetReason),
    NavigateHome,
    Reauthenticate,
    OpenSettings,
    ContactSupport { error: Option<CaughtError>, category: ErrorCategory },
}

/// Reason an event produced no transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    NoError,
    RetryInFlight,
    Exhausted,
    StaleGeneration,
    Unmounted,
}

/// Result of one reducer step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: BoundaryState,
    pub effects: Vec<Effect>,
    pub ignored: Option<Ignored>,
}

impl Transition {
    fn to(state: BoundaryState, effects: Vec<Effect>) -> Self {
        Self { state, effects, ignored: None }
    }

    fn ignore(state: &BoundaryState, reason: Ignored) -> Self {
        Self { state: state.clone(), effects: Vec::new(), ignored: Some(reason) }
    }
}

/// Apply one event to a boundary state.
#[must_use]
pub fn reduce(state: &BoundaryState, event: Event) -> Transition {
    if !state.mounted {
        return Transition::ignore(state, Ignored::Unmounted);
    }

    match event {
        Event::Caught { error, component_stack } => {
            let next = BoundaryState { has_error: true, current_error: Some(error.clone()), ..state.clone() };
            Transition::to(next, vec![Effect::ReportError { error, component_stack }])
        }
        Event::RetryPressed => begin_retry(state, false),
        Event::ClearCacheAndRetryPressed => begin_retry(state, true),
        Event::RetryElapsed { generation } => {
            if !state.is_retrying || generation != state.generation {
                return Transition::ignore(state, Ignored::StaleGeneration);
            }
            let next = BoundaryState {
                has_error: false,
                current_error: None,
                retry_count: state.retry_count + 1,
                is_retrying: false,
                ..state.clone()
            };
            Transition::to(next, vec![Effect::NotifyReset(ResetReason::Retry)])
        }
        Event::GoHome => reset(state, ResetReason::GoHome, Effect::NavigateHome),
        Event::Reauthenticate => reset(state, ResetReason::Reauthenticate, Effect::Reauthenticate),
        Event::OpenSettings => Transition::to(state.clone(), vec![Effect::OpenSettings]),
        Event::ContactSupport => {
            let effect = Effect::ContactSupport { error: state.current_error.clone(), category: state.category() };
            Transition::to(state.clone(), vec![effect])
        }
        Event::Unmount => {
            let effects = if state.is_retrying { vec![Effect::CancelRetry] } else { Vec::new() };
            let next = BoundaryState {
                is_retrying: false,
                generation: state.generation + 1,
                mounted: false,
                ..state.clone()
            };
            Transition::to(next, effects)
        }
    }
}

fn begin_retry(state: &BoundaryState, clear_cache: bool) -> Transition {
    if let Some(reason) = state.retry_blocker() {
        return Transition::ignore(state, reason);
    }
    let Some(delay) = backoff_delay(state.retry_count) else {
        return Transition::ignore(state, Ignored::Exhausted);
    };

    let generation = state.generation + 1;
    let next = BoundaryState { is_retrying: true, generation, ..state.clone() };
    let mut effects = Vec::with_capacity(2);
    if clear_cache {
        effects.push(Effect::ClearCache);
    }
    effects.push(Effect::ScheduleRetry { generation, delay });
    Transition::to(next, effects)
}

fn reset(state: &BoundaryState, reason: ResetReason, effect: Effect) -> Transition {
    let mut effects = Vec::with_capacity(3);
    if state.is_retrying {
        effects.push(Effect::CancelRetry);
    }
    effects.push(effect);
    effects.push(Effect::NotifyReset(reason));
    let next = BoundaryState { generation: state.generation + 1, ..BoundaryState::default() };
    Transition::to(next, effects)
}
