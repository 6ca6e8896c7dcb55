use dioxus::prelude::*;
use shop_admin::models::Profile;

const TOKEN_KEY: &str = "shop_admin_token";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn load_token() -> Option<String> {
    storage()?.get_item(TOKEN_KEY).ok().flatten()
}

/// Session provided once by `App` and read by every view through context.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionContext {
    pub token: Signal<Option<String>>,
    pub user: Signal<Option<Profile>>,
}

impl SessionContext {
    /// Hydrates the token from local storage.
    pub fn provide() -> Self {
        let token = use_signal(load_token);
        let user = use_signal(|| None::<Profile>);
        use_context_provider(|| SessionContext { token, user })
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn login(&mut self, token: String, user: Option<Profile>) {
        if let Some(storage) = storage() {
            let _ = storage.set_item(TOKEN_KEY, &token);
        }
        self.token.set(Some(token));
        self.user.set(user);
    }

    pub fn logout(&mut self) {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
        self.token.set(None);
        self.user.set(None);
    }
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}
