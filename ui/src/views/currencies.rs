use dioxus::prelude::*;

use shop_admin::models::{Currency, CurrencyPayload};
use shop_admin::utils::{normalize_currency, validate_currency};

use crate::api;
use crate::components::Overlay;
use crate::session::use_session;

#[component]
pub fn CurrenciesView() -> Element {
    let session = use_session();
    let mut currencies = use_signal(Vec::<Currency>::new);
    let mut error = use_signal(|| None::<String>);
    let mut show_add_overlay = use_signal(|| false);
    let mut editing = use_signal(|| None::<Currency>);

    let reload = move || {
        spawn(async move {
            match api::get_currencies(session.token()).await {
                Ok(list) => {
                    currencies.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    use_effect(move || reload());

    rsx! {
        div { class: "content-header",
            h1 { "CURRENCIES" }
            button { onclick: move |_| show_add_overlay.set(true), "ADD" }
        }

        if let Some(err) = error() {
            div { class: "error-message", "{err}" }
        }

        if currencies.read().is_empty() {
            div { class: "empty-state", "NO CURRENCIES" }
        } else {
            div { class: "category-list border p-2",
                for cur in currencies() {
                    {
                        let cur_clone = cur.clone();
                        rsx! {
                            div {
                                class: "category-row",
                                key: "{cur.id}",
                                onclick: move |_| editing.set(Some(cur_clone.clone())),
                                span { class: "font-mono", "{cur.code}" }
                                span { class: "name", "{cur.name}" }
                                span { class: "type-tag", "{cur.symbol}" }
                            }
                        }
                    }
                }
            }
        }

        if show_add_overlay() {
            CurrencyOverlay {
                currency: None,
                on_close: move |_| show_add_overlay.set(false),
                on_change: move |_| {
                    show_add_overlay.set(false);
                    reload();
                }
            }
        }

        if let Some(cur) = editing() {
            CurrencyOverlay {
                currency: Some(cur),
                on_close: move |_| editing.set(None),
                on_change: move |_| {
                    editing.set(None);
                    reload();
                }
            }
        }
    }
}

/// Add form when `currency` is `None`, edit form with a delete button otherwise.
#[component]
fn CurrencyOverlay(
    #[props(!optional)] currency: Option<Currency>,
    on_close: EventHandler<()>,
    on_change: EventHandler<()>,
) -> Element {
    let session = use_session();
    let existing = currency.clone();
    let mut name = use_signal(|| existing.as_ref().map(|c| c.name.clone()).unwrap_or_default());
    let mut symbol = use_signal(|| existing.as_ref().map(|c| c.symbol.clone()).unwrap_or_default());
    let mut code = use_signal(|| existing.as_ref().map(|c| c.code.clone()).unwrap_or_default());
    let mut error = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);

    let currency_id = currency.as_ref().map(|c| c.id.clone());
    let currency_id_for_delete = currency_id.clone();
    let title = if currency.is_some() { "EDIT CURRENCY" } else { "ADD CURRENCY" };

    let handle_submit = move |e: Event<FormData>| {
        e.prevent_default();
        e.stop_propagation();

        let payload = normalize_currency(&CurrencyPayload {
            name: name(),
            symbol: symbol(),
            code: code(),
        });
        if let Err(err) = validate_currency(&payload) {
            error.set(Some(err.user_message()));
            return;
        }
        code.set(payload.code.clone());

        loading.set(true);
        error.set(None);

        let id = currency_id.clone();
        spawn(async move {
            let token = session.token();
            let result = match id {
                Some(id) => api::update_currency(token, &id, payload).await,
                None => api::create_currency(token, payload).await,
            };

            loading.set(false);

            match result {
                Ok(_) => on_change.call(()),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let handle_delete = move |_| {
        let Some(id) = currency_id_for_delete.clone() else {
            return;
        };
        loading.set(true);
        spawn(async move {
            match api::delete_currency(session.token(), &id).await {
                Ok(()) => on_change.call(()),
                Err(e) => {
                    loading.set(false);
                    error.set(Some(e));
                }
            }
        });
    };

    rsx! {
        Overlay { title: title.to_string(), on_close: on_close, busy: loading(),
            if let Some(err) = error() {
                div { class: "error-message", "{err}" }
            }

            form { onsubmit: handle_submit,
                div { class: "form-group",
                    label { "NAME" }
                    input {
                        r#type: "text",
                        value: "{name}",
                        oninput: move |e| name.set(e.value()),
                        disabled: loading(),
                    }
                }

                div { class: "form-group",
                    label { "SYMBOL" }
                    input {
                        r#type: "text",
                        value: "{symbol}",
                        oninput: move |e| symbol.set(e.value()),
                        disabled: loading(),
                    }
                }

                div { class: "form-group",
                    label { "CODE" }
                    input {
                        r#type: "text",
                        class: "font-mono",
                        value: "{code}",
                        oninput: move |e| code.set(e.value()),
                        disabled: loading(),
                    }
                }

                div { class: "flex gap-2",
                    button {
                        class: "primary flex-1",
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "SAVING..." } else { "SAVE" }
                    }
                    if currency.is_some() {
                        button {
                            r#type: "button",
                            onclick: handle_delete,
                            disabled: loading(),
                            "DELETE"
                        }
                    }
                }
            }
        }
    }
}
