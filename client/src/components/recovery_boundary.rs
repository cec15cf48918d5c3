//! Leptos error recovery boundary.
//!
//! DESIGN
//! ======
//! Wraps its children in Leptos' `ErrorBoundary`. The first error the subtree
//! throws is fed to the `recovery` reducer, and the boundary swaps the subtree
//! for the recovery screen. Resets and completed retries flip `has_error`
//! back, which mounts a fresh subtree.
//!
//! CANCELLATION
//! ============
//! Backoff runs on a `gloo-timers` sleep inside `spawn_local`, which cannot be
//! aborted. Unmount bumps the reducer generation through `on_cleanup`, and a
//! completion against a disposed signal or a stale generation is dropped.
//!
//! ERROR HANDLING
//! ==============
//! Owner callbacks run through `recovery::hooks::guarded`, so a panicking
//! callback is logged and dropped on native (SSR) builds. Browser builds
//! compile with `panic = "abort"`, where no containment is possible.

#[cfg(test)]
#[path = "recovery_boundary_test.rs"]
mod recovery_boundary_test;

use leptos::error::Errors;
use leptos::prelude::*;
use recovery::hooks::guarded;
use recovery::{
    ActionKind, BoundaryConfig, BoundaryState, BoundaryView, CaughtError, Effect, Event, ResetReason, SupportMail,
    reduce,
};

use crate::components::recovery_screen::RecoveryScreenView;
use crate::util::platform;

/// Kind hint for errors surfaced through Leptos' `ErrorBoundary`, which only
/// exposes the rendered message.
const VIEW_ERROR_KIND: &str = "Error";

const UNKNOWN_RENDER_FAILURE: &str = "unknown render failure";

/// Copyable handle bundling the boundary's signal and owner callbacks.
#[derive(Clone, Copy)]
struct BoundaryHandle {
    state: RwSignal<BoundaryState>,
    config: StoredValue<BoundaryConfig>,
    screen_name: StoredValue<Option<String>>,
    on_error: Option<Callback<CaughtError>>,
    on_reset: Option<Callback<ResetReason>>,
    on_clear_cache: Option<Callback<(), Result<(), String>>>,
    on_open_settings: Option<Callback<()>>,
}

impl BoundaryHandle {
    fn dispatch(self, event: Event) {
        // A disposed signal means the boundary is gone.
        let Some(current) = self.state.try_get_untracked() else {
            return;
        };
        let transition = reduce(&current, event);
        if let Some(reason) = transition.ignored {
            leptos::logging::log!("recovery boundary ignored event: {reason:?}");
            return;
        }
        if self.state.try_set(transition.state).is_some() {
            return;
        }
        for effect in transition.effects {
            self.run(effect);
        }
    }

    fn run(self, effect: Effect) {
        match effect {
            Effect::ReportError { error, .. } => {
                let screen = self.screen_name.get_value().unwrap_or_default();
                leptos::logging::error!("render failure caught on {screen:?}: {error}");
                if let Some(on_error) = self.on_error {
                    call_owner("on_error", || on_error.run(error));
                }
            }
            Effect::ClearCache => {
                if let Some(on_clear_cache) = self.on_clear_cache {
                    match guarded("on_clear_cache", || on_clear_cache.run(())) {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => leptos::logging::warn!("cache clear failed; retrying anyway: {e}"),
                        Err(e) => leptos::logging::warn!("cache clear callback failed; retrying anyway: {e}"),
                    }
                }
            }
            Effect::ScheduleRetry { generation, delay } => self.schedule_retry(generation, delay),
            Effect::CancelRetry => {
                leptos::logging::log!("recovery boundary dropped pending retry");
            }
            Effect::NotifyReset(reason) => {
                if let Some(on_reset) = self.on_reset {
                    call_owner("on_reset", || on_reset.run(reason));
                }
            }
            Effect::NavigateHome => {
                platform::navigate_home();
            }
            Effect::Reauthenticate => {
                platform::reauthenticate();
            }
            Effect::OpenSettings => match self.on_open_settings {
                Some(on_open_settings) => call_owner("on_open_settings", || on_open_settings.run(())),
                None => {
                    platform::open_network_settings();
                }
            },
            Effect::ContactSupport { error, category } => {
                let mail = self.config.with_value(|config| {
                    self.screen_name
                        .with_value(|screen| SupportMail::compose(error.as_ref(), category, screen.as_deref(), config))
                });
                platform::open_mail_composer(&mail.mailto_url());
            }
        }
    }

    fn schedule_retry(self, generation: u64, delay: std::time::Duration) {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(delay).await;
            self.dispatch(Event::RetryElapsed { generation });
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (generation, delay);
        }
    }

    /// Record the first error Leptos' `ErrorBoundary` collected.
    fn catch_errors(self, errors: &Errors) {
        self.dispatch(Event::caught(caught_from(errors)));
    }

    fn showing_error(self) -> Memo<bool> {
        Memo::new(move |_| self.state.with(|s| s.has_error))
    }

    fn recovery_screen(self) -> Option<recovery::RecoveryScreen> {
        let view = self
            .config
            .with_value(|config| self.state.with(|state| BoundaryView::of(state, config)));
        match view {
            BoundaryView::Content => None,
            BoundaryView::Recovery(screen) => Some(screen),
        }
    }
}

fn caught_from(errors: &Errors) -> CaughtError {
    let message = errors
        .clone()
        .into_iter()
        .next()
        .map_or_else(|| UNKNOWN_RENDER_FAILURE.to_owned(), |(_, e)| e.to_string());
    CaughtError::new(message, VIEW_ERROR_KIND)
}

fn call_owner(name: &'static str, f: impl FnOnce()) {
    if let Err(e) = guarded(name, f) {
        leptos::logging::warn!("boundary callback failed: {e}");
    }
}

/// Catch render failures from `children` and offer category-specific recovery.
#[component]
pub fn RecoveryBoundary(
    children: ChildrenFn,
    /// Screen identifier used in logs and support mail.
    #[prop(optional, into)]
    screen_name: Option<String>,
    #[prop(optional)] on_error: Option<Callback<CaughtError>>,
    /// Called after every reset so the owner can reload the subtree's data.
    #[prop(optional)]
    on_reset: Option<Callback<ResetReason>>,
    #[prop(optional)] on_clear_cache: Option<Callback<(), Result<(), String>>>,
    /// Native shells that can open OS network settings pass this.
    #[prop(optional)]
    on_open_settings: Option<Callback<()>>,
) -> impl IntoView {
    let handle = BoundaryHandle {
        state: RwSignal::new(BoundaryState::default()),
        config: StoredValue::new(BoundaryConfig::default()),
        screen_name: StoredValue::new(screen_name),
        on_error,
        on_reset,
        on_clear_cache,
        on_open_settings,
    };
    on_cleanup(move || handle.dispatch(Event::Unmount));

    let showing_error = handle.showing_error();
    let screen = Signal::derive(move || handle.recovery_screen());
    let on_action = Callback::new(move |kind: ActionKind| handle.dispatch(kind.event()));

    move || {
        if showing_error.get() {
            view! { <RecoveryScreenView screen=screen on_action=on_action/> }.into_any()
        } else {
            let children = children.clone();
            view! {
                <ErrorBoundary fallback=move |errors| {
                    errors.with_untracked(|errors| handle.catch_errors(errors));
                    view! { <div class="recovery-boundary__caught"></div> }
                }>
                    {children()}
                </ErrorBoundary>
            }
            .into_any()
        }
    }
}
