use dioxus::prelude::*;

use crate::api;
use crate::session::use_session;

#[component]
pub fn SettingsView(on_logout: EventHandler<()>) -> Element {
    let mut session = use_session();
    let mut error = use_signal(|| None::<String>);
    let mut refreshing = use_signal(|| false);

    let user = session.user.read().clone();
    let email = user.as_ref().map(|u| u.email.clone()).unwrap_or_default();
    let name = user.and_then(|u| u.name).unwrap_or_else(|| "-".to_string());

    let handle_refresh = move |_| {
        refreshing.set(true);
        spawn(async move {
            match api::get_me(session.token()).await {
                Ok(profile) => {
                    session.user.set(Some(profile));
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            refreshing.set(false);
        });
    };

    rsx! {
        div { class: "content-header",
            h1 { "SETTINGS" }
        }

        if let Some(err) = error() {
            div { class: "error-message", "{err}" }
        }

        div { class: "settings-block",
            h2 { "ACCOUNT" }

            div { class: "settings-item",
                span { "EMAIL" }
                span { class: "font-mono", "{email}" }
            }

            div { class: "settings-item",
                span { "NAME" }
                span { "{name}" }
            }

            div { class: "settings-item",
                span { "PROFILE" }
                button {
                    disabled: refreshing(),
                    onclick: handle_refresh,
                    if refreshing() { "REFRESHING..." } else { "REFRESH" }
                }
            }

            div { class: "settings-item",
                span { "SESSION" }
                button { onclick: move |_| on_logout.call(()), "LOGOUT" }
            }
        }
    }
}
