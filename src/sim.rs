//! Scripted run of one boundary against a screen that fails a fixed number of
//! renders before it succeeds.
//!
//! Each step renders through the boundary, prints the resulting snapshot as
//! JSON on stdout, then presses the configured action. Retry presses wait on
//! the boundary's state channel until the backoff completes.

#[cfg(test)]
#[path = "sim_test.rs"]
mod sim_test;

use std::cell::Cell;
use std::sync::Arc;

use recovery::error::PANIC_KIND;
use recovery::{
    ActionKind, Boundary, BoundaryConfig, BoundaryHooks, BoundaryState, CaughtError, RecoveryError, RecoveryScreen,
    Rendered, ResetReason, SupportMail,
};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Recovery(#[from] RecoveryError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("boundary state channel closed")]
    StateClosed,
}

/// Inputs for one simulated session.
#[derive(Debug, Clone)]
pub struct Script {
    pub message: String,
    pub kind: String,
    pub screen: Option<String>,
    pub failures: u32,
    pub action: ActionKind,
    pub presses: u32,
    pub config: BoundaryConfig,
}

/// One rendered step, as printed.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub step: u32,
    pub retry_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery: Option<RecoveryScreen>,
    pub unmounted: bool,
}

/// Result of a finished session.
#[derive(Debug)]
pub struct Outcome {
    pub snapshots: Vec<Snapshot>,
    /// State right before the boundary was unmounted.
    pub final_state: BoundaryState,
}

/// Screen whose first `remaining` renders fail.
struct FailingScreen {
    name: String,
    message: String,
    kind: String,
    remaining: Cell<u32>,
}

impl FailingScreen {
    fn render(&self) -> Result<String, CaughtError> {
        let remaining = self.remaining.get();
        if remaining == 0 {
            return Ok(format!("{} rendered", self.name));
        }
        self.remaining.set(remaining - 1);
        if self.kind == PANIC_KIND {
            panic!("{}", self.message);
        }
        Err(CaughtError::new(self.message.clone(), self.kind.clone()))
    }
}

/// Hooks that log what a real platform would do.
struct SimHooks;

impl BoundaryHooks for SimHooks {
    fn on_reset(&self, reason: ResetReason) {
        info!(?reason, "screen data reloaded");
    }

    fn clear_cache(&self) -> Result<(), RecoveryError> {
        info!("local cache cleared");
        Ok(())
    }

    fn open_settings(&self) {
        info!("would open network settings");
    }

    fn open_mail_composer(&self, mail: &SupportMail) {
        info!(to = %mail.to, url = %mail.mailto_url(), "would open mail composer");
    }

    fn navigate_home(&self) {
        info!("would navigate home");
    }

    fn reauthenticate(&self) {
        info!("would start sign-in");
    }
}

/// Run the script and print every snapshot to stdout.
pub async fn run(script: Script) -> Result<Outcome, SimError> {
    let boundary = Boundary::mount(script.screen.as_deref(), script.config.clone(), Arc::new(SimHooks))?;
    let mut states = boundary.subscribe();
    let screen = FailingScreen {
        name: script.screen.clone().unwrap_or_else(|| "screen".to_owned()),
        message: script.message,
        kind: script.kind,
        remaining: Cell::new(script.failures),
    };

    let mut snapshots = Vec::new();
    snapshots.push(step(&boundary, &screen, 0)?);

    for press in 1..=script.presses {
        if let Some(reason) = boundary.press(script.action) {
            warn!(press, ?reason, "press ignored");
        } else if boundary.state().is_retrying {
            states
                .wait_for(|s| !s.is_retrying)
                .await
                .map_err(|_| SimError::StateClosed)?;
        }
        snapshots.push(step(&boundary, &screen, press)?);
    }

    let final_state = boundary.state();
    boundary.unmount();
    Ok(Outcome { snapshots, final_state })
}

fn step(boundary: &Boundary, screen: &FailingScreen, step: u32) -> Result<Snapshot, SimError> {
    let rendered = boundary.render(|| screen.render());
    let retry_count = boundary.state().retry_count;
    let snapshot = match rendered {
        Rendered::Content(content) => {
            Snapshot { step, retry_count, content: Some(content), recovery: None, unmounted: false }
        }
        Rendered::Recovery(recovery) => {
            Snapshot { step, retry_count, content: None, recovery: Some(recovery), unmounted: false }
        }
        Rendered::Unmounted => Snapshot { step, retry_count, content: None, recovery: None, unmounted: true },
    };
    print_json(&snapshot)?;
    Ok(snapshot)
}

fn print_json(value: &impl Serialize) -> Result<(), SimError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
