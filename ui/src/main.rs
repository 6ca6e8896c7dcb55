mod api;
mod components;
mod session;
mod views;

use dioxus::prelude::*;

use components::{Section, Shell};
use session::SessionContext;
use shop_admin::models::LoginResponse;
use views::{AuthScreen, CategoriesView, CurrenciesView, SettingsView};

fn main() {
    dioxus::launch(App);
}

#[allow(non_snake_case)]
fn App() -> Element {
    let mut session = SessionContext::provide();
    let mut current_section = use_signal(|| Section::Categories);
    let mut checking_auth = use_signal(|| true);

    // Rehydrate the profile for a token left in storage
    use_effect(move || {
        spawn(async move {
            if let Some(token) = session.token() {
                match api::get_me(Some(token)).await {
                    Ok(profile) => session.user.set(Some(profile)),
                    Err(_) => session.logout(),
                }
            }
            checking_auth.set(false);
        });
    });

    let handle_login = move |response: LoginResponse| {
        session.login(response.token, Some(response.user));
        current_section.set(Section::Categories);
    };

    let handle_logout = move |_| {
        session.logout();
        current_section.set(Section::Categories);
    };

    let handle_section_change = move |section: Section| {
        current_section.set(section);
    };

    // Show loading while checking auth
    if checking_auth() {
        return rsx! {
            div { class: "auth-container",
                div { class: "loading", "LOADING..." }
            }
        };
    }

    if !session.is_authenticated() {
        return rsx! {
            AuthScreen { on_login: handle_login }
        };
    }

    rsx! {
        Shell {
            user: session.user.read().clone(),
            current_section: current_section(),
            on_section_change: handle_section_change,
            on_logout: handle_logout,

            match current_section() {
                Section::Categories => rsx! { CategoriesView {} },
                Section::Currencies => rsx! { CurrenciesView {} },
                Section::Settings => rsx! { SettingsView { on_logout: handle_logout } },
            }
        }
    }
}
