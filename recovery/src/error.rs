//! Captured render failures and the crate's own error type.
//!
//! DESIGN
//! ======
//! A [`CaughtError`] is a plain value snapshot of whatever the subtree threw.
//! It is never mutated after capture; a new catch replaces it wholesale.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::any::Any;

use serde::{Deserialize, Serialize};

/// Kind hint recorded for failures captured from a panic.
pub const PANIC_KIND: &str = "panic";

/// One captured render failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaughtError {
    /// Human-readable failure text as produced by the failing code.
    pub message: String,
    /// Type name of the failure when known (`TypeError`, `io::Error`, `panic`).
    pub kind_hint: String,
    /// Backtrace or stack text, when the producer supplied one.
    pub stack_trace: Option<String>,
}

impl CaughtError {
    #[must_use]
    pub fn new(message: impl Into<String>, kind_hint: impl Into<String>) -> Self {
        Self { message: message.into(), kind_hint: kind_hint.into(), stack_trace: None }
    }

    #[must_use]
    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    /// Capture a typed error, using its short type name as the kind hint.
    ///
    /// `std::io::Error` yields `Error`, `serde_json::Error` yields `Error` as
    /// well, so producers that care about the distinction should use
    /// [`CaughtError::new`] with an explicit hint.
    #[must_use]
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::new(err.to_string(), short_type_name::<E>())
    }

    /// Capture a panic payload from `std::panic::catch_unwind`.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_owned()
        };
        Self::new(message, PANIC_KIND)
    }
}

impl std::fmt::Display for CaughtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind_hint.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.kind_hint, self.message)
        }
    }
}

impl<E> From<E> for CaughtError
where
    E: std::error::Error,
{
    fn from(err: E) -> Self {
        Self::from_error(&err)
    }
}

/// Last path segment of a type name, with generic arguments dropped.
fn short_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_owned()
}

/// Failures raised by recovery side effects and drivers.
///
/// None of these ever re-enter the boundary as a catch; drivers log and drop
/// them.
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    /// The cache invalidation collaborator reported a failure.
    #[error("cache clear failed: {0}")]
    CacheClear(String),
    /// A collaborator hook panicked; the panic was contained.
    #[error("hook `{hook}` panicked: {message}")]
    HookPanicked { hook: &'static str, message: String },
    /// The tokio driver was mounted outside a runtime.
    #[error("no tokio runtime available to schedule retries")]
    NoRuntime,
}
