use dioxus::prelude::*;

/// Modal dialog. While `busy` the dialog cannot be dismissed.
#[component]
pub fn Overlay(
    title: String,
    on_close: EventHandler<()>,
    #[props(default)] busy: bool,
    children: Element,
) -> Element {
    let close = move || {
        if !busy {
            on_close.call(());
        }
    };

    rsx! {
        div {
            class: "overlay",
            onclick: move |_| close(),
            div {
                class: "overlay-content",
                onclick: move |e| e.stop_propagation(),
                div { class: "overlay-header",
                    h2 { "{title}" }
                    button {
                        class: "btn-text",
                        disabled: busy,
                        onclick: move |_| close(),
                        "CLOSE"
                    }
                }
                {children}
            }
        }
    }
}
