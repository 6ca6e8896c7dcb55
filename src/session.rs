//! Session context: the bearer token, the signed-in profile, and the timer
//! that logs the user out when the token expires.
//!
//! A `SessionStore` is constructed once at startup and handed to whatever
//! needs it (the API client, the CLI). It is cheap to clone; clones share
//! the same state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::{LoginPayload, Profile};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<Profile>,
    /// Unix seconds after which the token is no longer accepted.
    pub expires_at: Option<i64>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// JSON file holding the persisted session.
#[derive(Debug, Clone)]
pub struct TokenStorage {
    path: PathBuf,
}

impl TokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ApiResult<Option<SessionState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&data)?))
    }

    pub fn save(&self, state: &SessionState) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn clear(&self) -> ApiResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads the `exp` claim when `token` is a JWT. Signature is not checked.
pub fn token_expiry(token: &str) -> Option<i64> {
    let claims = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(claims.trim_end_matches('=')).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    value.get("exp")?.as_i64()
}

fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    storage: TokenStorage,
    ttl_secs: i64,
    logout_timer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionStore {
    /// An empty session that persists to `storage`.
    pub fn new(storage: TokenStorage, ttl_secs: i64) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            storage,
            ttl_secs,
            logout_timer: Arc::new(Mutex::new(None)),
        }
    }

    /// Restores the persisted session, dropping it if it already expired.
    pub async fn hydrate(storage: TokenStorage, ttl_secs: i64) -> ApiResult<Self> {
        let store = Self::new(storage, ttl_secs);
        let Some(persisted) = store.storage.load()? else {
            return Ok(store);
        };

        if persisted.token.is_none() || persisted.is_expired_at(now_unix()) {
            tracing::info!("persisted session expired, clearing");
            store.storage.clear()?;
            return Ok(store);
        }

        let expires_at = persisted.expires_at;
        *store.state.write().await = persisted;
        if let Some(expires_at) = expires_at {
            store.arm_timer(expires_at);
        }
        tracing::debug!("session restored from {}", store.storage.path().display());
        Ok(store)
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<Profile> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Signs in with the backend and stores the returned token and profile.
    pub async fn login(&self, client: &ApiClient, payload: LoginPayload) -> ApiResult<Profile> {
        let response = client.login(&payload).await?;
        self.establish(response.token, Some(response.user.clone()))
            .await?;
        tracing::info!("logged in as {}", response.user.email);
        Ok(response.user)
    }

    /// Accepts a token issued elsewhere (e.g. by the identity provider).
    pub async fn set_token(&self, token: impl Into<String>) -> ApiResult<()> {
        self.establish(token.into(), None).await
    }

    /// Reloads the signed-in profile from `/auth/me`.
    pub async fn refresh_profile(&self, client: &ApiClient) -> ApiResult<Profile> {
        let profile = client.me().await?;
        let mut state = self.state.write().await;
        state.user = Some(profile.clone());
        self.storage.save(&state)?;
        Ok(profile)
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.cancel_timer();
        *self.state.write().await = SessionState::default();
        self.storage.clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    async fn establish(&self, token: String, user: Option<Profile>) -> ApiResult<()> {
        let expires_at = token_expiry(&token).unwrap_or_else(|| now_unix() + self.ttl_secs);
        let state = SessionState {
            token: Some(token),
            user,
            expires_at: Some(expires_at),
        };
        self.storage.save(&state)?;
        *self.state.write().await = state;
        self.arm_timer(expires_at);
        Ok(())
    }

    fn arm_timer(&self, expires_at: i64) {
        let delay = (expires_at - now_unix()).max(0) as u64;
        let store = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(delay)).await;
            store.expire(expires_at).await;
        });

        if let Ok(mut timer) = self.logout_timer.lock() {
            if let Some(previous) = timer.replace(handle) {
                previous.abort();
            }
        }
    }

    fn cancel_timer(&self) {
        if let Ok(mut timer) = self.logout_timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }

    async fn expire(&self, expires_at: i64) {
        let mut state = self.state.write().await;
        // A newer login replaced the token this timer was armed for.
        if state.expires_at != Some(expires_at) {
            return;
        }
        *state = SessionState::default();
        if let Err(e) = self.storage.clear() {
            tracing::warn!("failed to clear expired session: {}", e);
        }
        tracing::info!("session expired, logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u1","exp":{}}}"#, exp));
        format!("{}.{}.signature", header, claims)
    }

    #[test]
    fn reads_exp_from_jwt() {
        assert_eq!(token_expiry(&jwt_with_exp(1_900_000_000)), Some(1_900_000_000));
        assert_eq!(token_expiry("opaque-token"), None);
        assert_eq!(token_expiry("a.!!!.c"), None);
    }

    #[test]
    fn storage_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TokenStorage::new(dir.path().join("nested/session.json"));
        assert_eq!(storage.load().unwrap(), None);

        let state = SessionState {
            token: Some("t".to_string()),
            user: None,
            expires_at: Some(42),
        };
        storage.save(&state).unwrap();
        assert_eq!(storage.load().unwrap(), Some(state));

        storage.clear().unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }
}
