//! Boundary configuration parsed from environment variables.
//!
//! Only presentation knobs live here. The retry ceiling and backoff base are
//! constants in [`crate::backoff`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_SUPPORT_EMAIL: &str = "support@careerpath.app";
pub const DEFAULT_APP_NAME: &str = "CareerPath";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryConfig {
    /// Recipient of "Contact Support" mail.
    pub support_email: String,
    /// Product name used in the support mail subject.
    pub app_name: String,
    /// Render raw error text, category and stack on the recovery screen.
    /// Has no effect in release builds.
    pub debug_panel: bool,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            support_email: DEFAULT_SUPPORT_EMAIL.to_owned(),
            app_name: DEFAULT_APP_NAME.to_owned(),
            debug_panel: cfg!(debug_assertions),
        }
    }
}

impl BoundaryConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `RECOVERY_SUPPORT_EMAIL`: default `support@careerpath.app`
    /// - `RECOVERY_APP_NAME`: default `CareerPath`
    /// - `RECOVERY_DEBUG_PANEL`: `true`/`false`, defaults to on in debug builds;
    ///   ignored in release builds
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            support_email: env_string("RECOVERY_SUPPORT_EMAIL").unwrap_or(defaults.support_email),
            app_name: env_string("RECOVERY_APP_NAME").unwrap_or(defaults.app_name),
            debug_panel: env_parse("RECOVERY_DEBUG_PANEL", defaults.debug_panel),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
