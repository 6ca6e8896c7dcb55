use dioxus::prelude::*;

use shop_admin::models::Profile;

#[derive(Clone, Copy, PartialEq)]
pub enum Section {
    Categories,
    Currencies,
    Settings,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Categories => "CATEGORIES",
            Section::Currencies => "CURRENCIES",
            Section::Settings => "SETTINGS",
        }
    }

    pub fn all() -> &'static [Section] {
        &[Section::Categories, Section::Currencies, Section::Settings]
    }
}

#[component]
pub fn TopStrip(
    #[props(!optional)] user: Option<Profile>,
    on_logout: EventHandler<()>,
) -> Element {
    let who = user
        .map(|u| u.name.unwrap_or(u.email))
        .unwrap_or_default();

    rsx! {
        div { class: "top-strip",
            div { class: "app-name", "SHOP ADMIN" }
            div { class: "user-area",
                span { "{who}" }
                button { class: "btn-text", onclick: move |_| on_logout.call(()), "LOGOUT" }
            }
        }
    }
}

#[component]
pub fn SectionSwitcher(current: Section, on_change: EventHandler<Section>) -> Element {
    rsx! {
        div { class: "section-switcher",
            for section in Section::all() {
                button {
                    class: if *section == current { "active" } else { "" },
                    onclick: move |_| on_change.call(*section),
                    "{section.label()}"
                }
            }
        }
    }
}

#[component]
pub fn Shell(
    #[props(!optional)] user: Option<Profile>,
    current_section: Section,
    on_section_change: EventHandler<Section>,
    on_logout: EventHandler<()>,
    children: Element,
) -> Element {
    rsx! {
        div { id: "main",
            TopStrip { user: user, on_logout: on_logout }
            SectionSwitcher { current: current_section, on_change: on_section_change }
            div { class: "content container",
                {children}
            }
        }
    }
}
