//! # client
//!
//! Leptos front end for the recovery boundary. The state machine, error
//! classification and recovery view model live in the `recovery` crate; this
//! crate renders them and bridges platform actions to the browser.
//!
//! Build with `hydrate` for the browser and `ssr` for server rendering.

pub mod components;
pub mod util;

pub use components::recovery_boundary::RecoveryBoundary;
