//! Category-specific recovery presentation.
//!
//! Each [`ErrorCategory`] resolves to exactly one [`ErrorContext`]: a title, a
//! user-facing explanation, an icon handle and an ordered action list whose
//! first entry is the primary affordance. Actions carry an [`ActionKind`]
//! rather than a closure; drivers turn the kind into a reducer event, so every
//! retry goes through the same backoff path.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use serde::{Deserialize, Serialize};

use crate::classify::ErrorCategory;
use crate::state::Event;

/// Opaque icon handle; the UI layer maps it to artwork.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    WifiOff,
    Database,
    Lock,
    Layout,
    AlertTriangle,
}

/// Presentation hint for an action button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Primary,
    Secondary,
    Ghost,
}

/// What an action does when pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Retry,
    ClearCacheAndRetry,
    OpenNetworkSettings,
    Reauthenticate,
    GoHome,
    ContactSupport,
}

impl ActionKind {
    /// Reducer event raised when the user presses this action.
    #[must_use]
    pub fn event(self) -> Event {
        match self {
            Self::Retry => Event::RetryPressed,
            Self::ClearCacheAndRetry => Event::ClearCacheAndRetryPressed,
            Self::OpenNetworkSettings => Event::OpenSettings,
            Self::Reauthenticate => Event::Reauthenticate,
            Self::GoHome => Event::GoHome,
            Self::ContactSupport => Event::ContactSupport,
        }
    }

    /// Whether the action goes through the backoff path and so is bounded by
    /// the retry ceiling.
    #[must_use]
    pub fn is_retry(self) -> bool {
        matches!(self, Self::Retry | Self::ClearCacheAndRetry)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Retry => "Try Again",
            Self::ClearCacheAndRetry => "Clear Cache & Retry",
            Self::OpenNetworkSettings => "Check Network Settings",
            Self::Reauthenticate => "Sign In Again",
            Self::GoHome => "Go Home",
            Self::ContactSupport => "Contact Support",
        }
    }
}

/// One user-facing remedy on the recovery screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecoveryAction {
    pub kind: ActionKind,
    pub label: &'static str,
    pub variant: Variant,
}

impl RecoveryAction {
    fn new(kind: ActionKind, variant: Variant) -> Self {
        Self { kind, label: kind.label(), variant }
    }
}

/// Resolved presentation bundle for one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorContext {
    pub category: ErrorCategory,
    pub title: &'static str,
    pub message: &'static str,
    pub icon: Icon,
    /// Ordered; the first action is the primary affordance.
    pub actions: Vec<RecoveryAction>,
}

impl ErrorContext {
    #[must_use]
    pub fn primary(&self) -> Option<&RecoveryAction> {
        self.actions.first()
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.label).collect()
    }
}

/// Resolve the recovery presentation for a category.
#[must_use]
pub fn resolve(category: ErrorCategory) -> ErrorContext {
    let (title, message, icon, actions) = match category {
        ErrorCategory::Network => (
            "Connection Problem",
            "We couldn't reach our servers. Check your internet connection and try again.",
            Icon::WifiOff,
            vec![
                RecoveryAction::new(ActionKind::Retry, Variant::Primary),
                RecoveryAction::new(ActionKind::OpenNetworkSettings, Variant::Secondary),
            ],
        ),
        ErrorCategory::Data => (
            "Data Error",
            "Some of your data couldn't be loaded correctly. Retrying usually fixes this.",
            Icon::Database,
            vec![
                RecoveryAction::new(ActionKind::Retry, Variant::Primary),
                RecoveryAction::new(ActionKind::ClearCacheAndRetry, Variant::Secondary),
            ],
        ),
        ErrorCategory::Auth => (
            "Session Expired",
            "Your session has expired. Please sign in again to continue.",
            Icon::Lock,
            vec![
                RecoveryAction::new(ActionKind::Reauthenticate, Variant::Primary),
                RecoveryAction::new(ActionKind::GoHome, Variant::Ghost),
            ],
        ),
        ErrorCategory::Ui => (
            "Display Error",
            "This screen had trouble displaying. Try again or head back home.",
            Icon::Layout,
            vec![
                RecoveryAction::new(ActionKind::Retry, Variant::Primary),
                RecoveryAction::new(ActionKind::GoHome, Variant::Ghost),
            ],
        ),
        ErrorCategory::Unknown => (
            "Something Went Wrong",
            "An unexpected error occurred. Try again, and if it keeps happening let us know.",
            Icon::AlertTriangle,
            vec![
                RecoveryAction::new(ActionKind::Retry, Variant::Primary),
                RecoveryAction::new(ActionKind::ContactSupport, Variant::Secondary),
                RecoveryAction::new(ActionKind::GoHome, Variant::Ghost),
            ],
        ),
    };

    ErrorContext { category, title, message, icon, actions }
}
