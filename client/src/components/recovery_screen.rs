//! Full-screen recovery view shown when a boundary has caught an error.
//!
//! Renders the [`RecoveryScreen`] model as-is; all decisions (which actions,
//! which are disabled, whether diagnostics show) were made by the
//! `recovery` crate.

#[cfg(test)]
#[path = "recovery_screen_test.rs"]
mod recovery_screen_test;

use leptos::prelude::*;
use recovery::{ActionButton, ActionKind, DebugPanel, Icon, RecoveryScreen, Variant};

/// Label shown on a retry button while its backoff is in flight.
pub const RETRYING_LABEL: &str = "Retrying...";

#[component]
pub fn RecoveryScreenView(screen: Signal<Option<RecoveryScreen>>, on_action: Callback<ActionKind>) -> impl IntoView {
    view! {
        <div class="recovery-screen" role="alert">
            {move || {
                screen
                    .get()
                    .map(|screen| {
                        let RecoveryScreen { context, buttons, retrying, exhausted_notice, debug } = screen;
                        view! {
                            <div class=icon_class(context.icon)></div>
                            <h2 class="recovery-screen__title">{context.title}</h2>
                            <p class="recovery-screen__message">{context.message}</p>
                            {retrying.then(|| view! { <div class="recovery-screen__spinner"></div> })}
                            {exhausted_notice.map(|notice| view! { <p class="recovery-screen__notice">{notice}</p> })}
                            <div class="recovery-screen__actions">
                                {buttons
                                    .into_iter()
                                    .map(|button| {
                                        let kind = button.action.kind;
                                        let class = button_class(&button);
                                        let label = button_label(&button);
                                        view! {
                                            <button
                                                class=class
                                                disabled=!button.enabled
                                                on:click=move |_| on_action.run(kind)
                                            >
                                                {label}
                                            </button>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                            {debug.map(|panel| view! { <pre class="recovery-screen__debug">{debug_text(&panel)}</pre> })}
                        }
                    })
            }}
        </div>
    }
}

pub(crate) fn icon_class(icon: Icon) -> &'static str {
    match icon {
        Icon::WifiOff => "recovery-screen__icon recovery-screen__icon--wifi-off",
        Icon::Database => "recovery-screen__icon recovery-screen__icon--database",
        Icon::Lock => "recovery-screen__icon recovery-screen__icon--lock",
        Icon::Layout => "recovery-screen__icon recovery-screen__icon--layout",
        Icon::AlertTriangle => "recovery-screen__icon recovery-screen__icon--alert",
    }
}

pub(crate) fn button_class(button: &ActionButton) -> String {
    let variant = match button.action.variant {
        Variant::Primary => "primary",
        Variant::Secondary => "secondary",
        Variant::Ghost => "ghost",
    };
    let mut class = format!("recovery-button recovery-button--{variant}");
    if !button.enabled {
        class.push_str(" recovery-button--disabled");
    }
    if button.busy {
        class.push_str(" recovery-button--busy");
    }
    class
}

pub(crate) fn button_label(button: &ActionButton) -> &'static str {
    if button.busy { RETRYING_LABEL } else { button.action.label }
}

pub(crate) fn debug_text(panel: &DebugPanel) -> String {
    let mut text = format!("{} [{}] {}", panel.category, panel.kind, panel.message);
    if let Some(stack) = &panel.stack_trace {
        text.push('\n');
        text.push_str(stack);
    }
    text
}
