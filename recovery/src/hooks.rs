//! Collaborator interface for the boundary's side effects.
//!
//! ERROR HANDLING
//! ==============
//! Hooks are fire-and-forget. A hook that panics or reports failure is logged
//! and dropped; nothing a hook does can re-enter the boundary as a catch.

#[cfg(test)]
#[path = "hooks_test.rs"]
mod hooks_test;

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::{CaughtError, RecoveryError};
use crate::state::ResetReason;
use crate::support::SupportMail;

/// Capabilities the owning screen and platform provide to a boundary.
///
/// Every method defaults to a no-op so owners implement only what they have.
pub trait BoundaryHooks: Send + Sync {
    /// Called once per catch, before the recovery screen renders.
    fn on_error(&self, _error: &CaughtError, _component_stack: Option<&str>) {}

    /// Called after every reset so the owner can reinitialize subtree data.
    fn on_reset(&self, _reason: ResetReason) {}

    /// Invalidate local caches ahead of a "Clear Cache & Retry".
    fn clear_cache(&self) -> Result<(), RecoveryError> {
        Ok(())
    }

    fn open_settings(&self) {}

    fn open_mail_composer(&self, _mail: &SupportMail) {}

    fn navigate_home(&self) {}

    fn reauthenticate(&self) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl BoundaryHooks for NoopHooks {}

/// Run a hook, containing any panic it raises.
pub fn guarded<T>(hook: &'static str, f: impl FnOnce() -> T) -> Result<T, RecoveryError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| RecoveryError::HookPanicked {
        hook,
        message: CaughtError::from_panic(payload).message,
    })
}
