use dioxus::prelude::*;

use shop_admin::models::{LoginPayload, LoginResponse};

use crate::api;

#[component]
pub fn AuthScreen(on_login: EventHandler<LoginResponse>) -> Element {
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);

    let handle_submit = move |e: Event<FormData>| {
        e.prevent_default();
        e.stop_propagation();

        let email_val = email().trim().to_string();
        let password_val = password().clone();

        if email_val.is_empty() || password_val.is_empty() {
            error.set(Some("Please fill in all fields".to_string()));
            return;
        }

        loading.set(true);
        error.set(None);

        spawn(async move {
            let result = api::login(LoginPayload {
                email: email_val,
                password: password_val,
            })
            .await;

            loading.set(false);

            match result {
                Ok(response) => on_login.call(response),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    rsx! {
        div { class: "auth-container",
            div { class: "auth-block",
                h1 { "LOGIN" }

                if let Some(err) = error() {
                    div { class: "error-message", "{err}" }
                }

                form {
                    onsubmit: handle_submit,

                    div { class: "form-group",
                        label { "EMAIL" }
                        input {
                            r#type: "email",
                            value: "{email}",
                            oninput: move |e| email.set(e.value()),
                            disabled: loading(),
                        }
                    }

                    div { class: "form-group",
                        label { "PASSWORD" }
                        input {
                            r#type: "password",
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                            disabled: loading(),
                        }
                    }

                    button {
                        class: "primary w-full",
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "LOADING..." } else { "LOGIN" }
                    }
                }
            }
        }
    }
}
