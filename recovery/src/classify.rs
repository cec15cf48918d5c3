//! Error classification into coarse recovery categories.
//!
//! DESIGN
//! ======
//! Classification is one ordered table of `(category, predicate)` rows,
//! evaluated top to bottom against the lower-cased message and kind hint.
//! The first matching row wins, so a message mentioning both `network` and
//! `json` is a network problem. Anything unmatched is [`ErrorCategory::Unknown`].
//!
//! The categories are a recovery-UX taxonomy, not a root-cause taxonomy: a
//! JSON parse failure and a null access both land in `Data` because the
//! remedy is the same.

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;

use serde::{Deserialize, Serialize};

use crate::error::CaughtError;

/// Coarse failure category selecting the recovery screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Data,
    Auth,
    Ui,
    Unknown,
}

impl ErrorCategory {
    /// Every category, in classification order.
    pub const ALL: [Self; 5] = [Self::Network, Self::Data, Self::Auth, Self::Ui, Self::Unknown];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Data => "data",
            Self::Auth => "auth",
            Self::Ui => "ui",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased view of a caught error that the rule predicates match on.
struct Probe {
    message: String,
    kind: String,
}

impl Probe {
    fn message_has(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.message.contains(n))
    }

    fn either_has(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.message.contains(n) || self.kind.contains(n))
    }

    fn kind_is(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.kind == *n)
    }
}

const NETWORK_KEYWORDS: &[&str] = &["network", "fetch", "timeout", "connection", "offline"];
const NETWORK_KINDS: &[&str] = &["networkerror"];
const DATA_KEYWORDS: &[&str] = &["json", "parse", "undefined", "null", "type"];
const DATA_KINDS: &[&str] = &["syntaxerror", "typeerror"];
const AUTH_KEYWORDS: &[&str] = &["auth", "token", "unauthorized", "401", "403"];
const UI_KEYWORDS: &[&str] = &["render", "component", "props", "state"];

type Rule = (ErrorCategory, fn(&Probe) -> bool);

/// Classification rules, first match wins.
const RULES: &[Rule] = &[
    (ErrorCategory::Network, is_network),
    (ErrorCategory::Data, is_data),
    (ErrorCategory::Auth, is_auth),
    (ErrorCategory::Ui, is_ui),
];

fn is_network(p: &Probe) -> bool {
    p.either_has(NETWORK_KEYWORDS) || p.kind_is(NETWORK_KINDS)
}

fn is_data(p: &Probe) -> bool {
    p.either_has(DATA_KEYWORDS) || p.kind_is(DATA_KINDS)
}

fn is_auth(p: &Probe) -> bool {
    p.message_has(AUTH_KEYWORDS)
}

fn is_ui(p: &Probe) -> bool {
    p.message_has(UI_KEYWORDS)
}

/// Classify a caught error. Absence of an error is [`ErrorCategory::Unknown`].
#[must_use]
pub fn classify(error: Option<&CaughtError>) -> ErrorCategory {
    let Some(error) = error else {
        return ErrorCategory::Unknown;
    };
    let probe = Probe { message: error.message.to_lowercase(), kind: error.kind_hint.to_lowercase() };
    RULES
        .iter()
        .find(|(_, matches)| matches(&probe))
        .map_or(ErrorCategory::Unknown, |(category, _)| *category)
}
