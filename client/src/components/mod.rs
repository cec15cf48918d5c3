//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `recovery_boundary` owns the boundary signal and effect wiring;
//! `recovery_screen` is a stateless renderer of the screen model.

pub mod recovery_boundary;
pub mod recovery_screen;
