//! Platform capabilities the recovery boundary hands off to the browser.
//!
//! Every helper navigates `window.location`; a `mailto:` URL opens the user's
//! mail composer. Requires a browser environment; SSR and tests get a no-op
//! that reports `false`.
//!
//! TRADE-OFFS
//! ==========
//! Browsers cannot open OS network settings. The web build logs a hint
//! instead; native shells override the action through the boundary's props.

#[cfg(test)]
#[path = "platform_test.rs"]
mod platform_test;

/// Route the app treats as "home".
pub const HOME_PATH: &str = "/";

/// Route that starts a fresh sign-in.
pub const LOGIN_PATH: &str = "/login";

/// Navigate the window to `href`. Returns `true` when a browser accepted it.
pub fn navigate(href: &str) -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().is_some_and(|w| w.location().set_href(href).is_ok())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = href;
        false
    }
}

pub fn navigate_home() -> bool {
    navigate(HOME_PATH)
}

pub fn reauthenticate() -> bool {
    navigate(LOGIN_PATH)
}

/// Open the mail composer with a pre-filled `mailto:` URL.
pub fn open_mail_composer(mailto: &str) -> bool {
    navigate(mailto)
}

pub fn open_network_settings() -> bool {
    leptos::logging::warn!("network settings are not reachable from the browser");
    false
}
