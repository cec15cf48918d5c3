//! # recovery
//!
//! Error recovery boundary for the CareerPath screens: captures a render
//! failure, classifies it, picks a category-specific recovery screen and runs
//! bounded retry-with-backoff.
//!
//! ARCHITECTURE
//! ============
//! - [`classify`] maps a [`CaughtError`] to one of five categories.
//! - [`context`] resolves a category into a title, message and ranked actions.
//! - [`state`] is the pure reducer; it returns effects instead of doing IO.
//! - [`view`] turns a state into what the UI should draw.
//! - [`driver`] executes effects on tokio (feature `driver`); the Leptos
//!   client runs the same reducer on browser timers.

pub mod backoff;
pub mod classify;
pub mod config;
pub mod context;
#[cfg(feature = "driver")]
pub mod driver;
pub mod error;
pub mod hooks;
pub mod state;
pub mod support;
pub mod view;

pub use backoff::{BACKOFF_BASE, RETRY_CEILING, backoff_delay};
pub use classify::{ErrorCategory, classify};
pub use config::BoundaryConfig;
pub use context::{ActionKind, ErrorContext, Icon, RecoveryAction, Variant, resolve};
#[cfg(feature = "driver")]
pub use driver::{Boundary, Rendered};
pub use error::{CaughtError, RecoveryError};
pub use hooks::{BoundaryHooks, NoopHooks};
pub use state::{BoundaryState, Effect, Event, Ignored, ResetReason, Transition, reduce};
pub use support::SupportMail;
pub use view::{ActionButton, BoundaryView, DebugPanel, RecoveryScreen, debug_allowed};
