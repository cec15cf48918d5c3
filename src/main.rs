//! recovery-sim: run a recovery boundary against a failing screen from the
//! command line and watch every transition.
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); snapshots go to stdout as
//! JSON.

mod sim;


use clap::{Parser, ValueEnum};
use recovery::{ActionKind, BoundaryConfig};
use tracing_subscriber::EnvFilter;

use crate::sim::{Script, SimError};

#[derive(Parser, Debug)]
#[command(name = "recovery-sim", about = "Drive an error recovery boundary against a failing screen")]
struct Cli {
    #[arg(long, env = "RECOVERY_SIM_MESSAGE", default_value = "Network request failed: timeout")]
    message: String,

    #[arg(long, env = "RECOVERY_SIM_KIND", default_value = "TypeError", help = "Kind hint, or `panic` to panic in render")]
    kind: String,

    #[arg(long, env = "RECOVERY_SIM_SCREEN")]
    screen: Option<String>,

    #[arg(long, default_value_t = 1, help = "Renders that fail before the screen recovers")]
    failures: u32,

    #[arg(long, value_enum, default_value_t = Action::Retry)]
    action: Action,

    #[arg(long, default_value_t = 1)]
    presses: u32,

    #[arg(long, default_value_t = false, help = "Enable the debug panel (debug builds only)")]
    debug_panel: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Action {
    Retry,
    ClearCache,
    GoHome,
    Reauth,
    ContactSupport,
    Settings,
}

impl Action {
    fn kind(self) -> ActionKind {
        match self {
            Self::Retry => ActionKind::Retry,
            Self::ClearCache => ActionKind::ClearCacheAndRetry,
            Self::GoHome => ActionKind::GoHome,
            Self::Reauth => ActionKind::Reauthenticate,
            Self::ContactSupport => ActionKind::ContactSupport,
            Self::Settings => ActionKind::OpenNetworkSettings,
        }
    }
}

impl Cli {
    fn into_script(self, mut config: BoundaryConfig) -> Script {
        if self.debug_panel {
            config.debug_panel = true;
        }
        Script {
            message: self.message,
            kind: self.kind,
            screen: self.screen,
            failures: self.failures,
            action: self.action.kind(),
            presses: self.presses,
            config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), SimError> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let outcome = sim::run(cli.into_script(BoundaryConfig::from_env())).await?;
    let state = &outcome.final_state;
    tracing::info!(
        steps = outcome.snapshots.len(),
        has_error = state.has_error,
        retry_count = state.retry_count,
        "simulation finished"
    );
    Ok(())
}
