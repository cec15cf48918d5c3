//! "Contact Support" mail composition.

#[cfg(test)]
#[path = "support_test.rs"]
mod support_test;

use serde::Serialize;
use url::form_urlencoded;

use crate::classify::ErrorCategory;
use crate::config::BoundaryConfig;
use crate::error::CaughtError;

/// Screen label used when the boundary owner gave none.
pub const UNKNOWN_SCREEN: &str = "unknown";

/// Pre-filled support mail handed to the platform mail composer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SupportMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl SupportMail {
    #[must_use]
    pub fn compose(
        error: Option<&CaughtError>,
        category: ErrorCategory,
        screen_name: Option<&str>,
        config: &BoundaryConfig,
    ) -> Self {
        let screen = screen_name.filter(|s| !s.is_empty()).unwrap_or(UNKNOWN_SCREEN);
        let (message, kind) = error.map_or(("no error captured", "none"), |e| (e.message.as_str(), e.kind_hint.as_str()));

        let subject = format!("{} error report: {category}", config.app_name);
        let body = format!(
            "Please describe what you were doing when this happened:\n\n\n\
             ---\n\
             Error: {message}\n\
             Category: {category}\n\
             Screen: {screen}\n\
             Kind: {kind}\n"
        );

        Self { to: config.support_email.clone(), subject, body }
    }

    /// `mailto:` URL with subject and body percent-encoded.
    #[must_use]
    pub fn mailto_url(&self) -> String {
        format!("mailto:{}?subject={}&body={}", self.to, encode(&self.subject), encode(&self.body))
    }
}

/// Form-encode and swap `+` for `%20`; mail clients do not decode `+` as a
/// space. A literal `+` is already `%2B` at this point.
fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
