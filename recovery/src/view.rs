//! Render model: what the boundary shows for a given state.
//!
//! [`BoundaryView::of`] is a pure function of [`BoundaryState`] and
//! [`BoundaryConfig`], so any UI layer (Leptos, a terminal, a test) renders
//! the same decisions.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use serde::Serialize;

use crate::classify::ErrorCategory;
use crate::config::BoundaryConfig;
use crate::context::{ErrorContext, RecoveryAction, resolve};
use crate::state::BoundaryState;

/// Shown once the retry ceiling is reached.
pub const EXHAUSTED_NOTICE: &str = "We couldn't recover this screen. Please contact support if the problem continues.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum BoundaryView {
    /// Render the wrapped subtree.
    Content,
    /// Render the full-screen recovery view.
    Recovery(RecoveryScreen),
}

impl BoundaryView {
    #[must_use]
    pub fn of(state: &BoundaryState, config: &BoundaryConfig) -> Self {
        if !state.has_error {
            return Self::Content;
        }
        Self::Recovery(RecoveryScreen::of(state, config))
    }

    #[must_use]
    pub fn recovery(&self) -> Option<&RecoveryScreen> {
        match self {
            Self::Content => None,
            Self::Recovery(screen) => Some(screen),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecoveryScreen {
    pub context: ErrorContext,
    /// Parallel to `context.actions`.
    pub buttons: Vec<ActionButton>,
    pub retrying: bool,
    pub exhausted_notice: Option<&'static str>,
    /// Raw diagnostics; only present when the config enables the debug panel.
    pub debug: Option<DebugPanel>,
}

impl RecoveryScreen {
    fn of(state: &BoundaryState, config: &BoundaryConfig) -> Self {
        let category = state.category();
        let context = resolve(category);
        let exhausted = state.is_exhausted();
        let buttons = context
            .actions
            .iter()
            .map(|action| ActionButton {
                action: action.clone(),
                // Retry-type actions stay visible but inert while a retry is
                // in flight or the budget is spent.
                enabled: !action.kind.is_retry() || !(state.is_retrying || exhausted),
                busy: action.kind.is_retry() && state.is_retrying,
            })
            .collect();

        let debug = debug_allowed(cfg!(debug_assertions), config).then(|| DebugPanel {
            message: state.current_error.as_ref().map(|e| e.message.clone()).unwrap_or_default(),
            kind: state.current_error.as_ref().map(|e| e.kind_hint.clone()).unwrap_or_default(),
            category,
            stack_trace: state.current_error.as_ref().and_then(|e| e.stack_trace.clone()),
        });

        Self {
            context,
            buttons,
            retrying: state.is_retrying,
            exhausted_notice: exhausted.then_some(EXHAUSTED_NOTICE),
            debug,
        }
    }

    #[must_use]
    pub fn button(&self, label: &str) -> Option<&ActionButton> {
        self.buttons.iter().find(|b| b.action.label == label)
    }
}

/// Whether raw diagnostics may render. Release builds never show them; the
/// config can only switch the panel off in debug builds.
#[must_use]
pub fn debug_allowed(build_is_debug: bool, config: &BoundaryConfig) -> bool {
    build_is_debug && config.debug_panel
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub action: RecoveryAction,
    pub enabled: bool,
    /// Show a loading indicator on this button.
    pub busy: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DebugPanel {
    pub message: String,
    pub kind: String,
    pub category: ErrorCategory,
    pub stack_trace: Option<String>,
}
