use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use urlencoding::encode;

use crate::constants::*;
use crate::error::{ApiError, ApiResult, extract_error_message};
use crate::models::*;
use crate::session::SessionStore;

/// Bearer-authenticated client for the shop REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fails before any network activity when no token is stored.
    async fn authorized(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let token = self.session.token().await.ok_or(ApiError::MissingToken)?;
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&body, fallback);
            tracing::warn!("request failed with {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT && body.trim().is_empty() {
            // Only unit-like results accept an empty body.
            return serde_json::from_value(serde_json::Value::Null)
                .map_err(|_| ApiError::UnexpectedShape("empty response body".to_string()));
        }

        Envelope::<T>::decode(&body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> ApiResult<T> {
        let request = self.authorized(Method::GET, path).await?;
        self.send(request, fallback).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ApiResult<T> {
        let request = self.authorized(Method::POST, path).await?.json(body);
        self.send(request, fallback).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ApiResult<T> {
        let request = self.authorized(Method::PUT, path).await?.json(body);
        self.send(request, fallback).await
    }

    async fn delete(&self, path: &str, body: Option<&impl Serialize>, fallback: &str) -> ApiResult<()> {
        let mut request = self.authorized(Method::DELETE, path).await?;
        if let Some(body) = body {
            request = request.json(body);
        }
        let _: serde_json::Value = self.send(request, fallback).await?;
        Ok(())
    }

    // Auth API

    pub async fn login(&self, payload: &LoginPayload) -> ApiResult<LoginResponse> {
        let url = self.url("/auth/login");
        tracing::debug!("POST {}", url);
        let request = self.http.post(url).json(payload);
        self.send(request, ERR_LOGIN).await
    }

    pub async fn me(&self) -> ApiResult<Profile> {
        self.get("/auth/me", ERR_PROFILE).await
    }

    // Categories API

    pub async fn get_categories(&self) -> ApiResult<Vec<Category>> {
        self.get("/categories", ERR_LOAD_CATEGORIES).await
    }

    pub async fn create_category(&self, payload: &CreateCategoryPayload) -> ApiResult<Category> {
        self.post("/categories", payload, ERR_CREATE_CATEGORY).await
    }

    pub async fn update_category(
        &self,
        id: &str,
        payload: &UpdateCategoryPayload,
    ) -> ApiResult<Category> {
        self.put(&format!("/categories/{}", encode(id)), payload, ERR_UPDATE_CATEGORY)
            .await
    }

    pub async fn delete_category(
        &self,
        id: &str,
        payload: &DeleteCategoryPayload,
    ) -> ApiResult<()> {
        self.delete(&format!("/categories/{}", encode(id)), Some(payload), ERR_DELETE_CATEGORY)
            .await
    }

    // Currencies API

    pub async fn get_currencies(&self) -> ApiResult<Vec<Currency>> {
        self.get("/currencies", ERR_LOAD_CURRENCIES).await
    }

    pub async fn create_currency(&self, payload: &CurrencyPayload) -> ApiResult<Currency> {
        self.post("/currencies", payload, ERR_CREATE_CURRENCY).await
    }

    pub async fn update_currency(&self, id: &str, payload: &CurrencyPayload) -> ApiResult<Currency> {
        self.put(&format!("/currencies/{}", encode(id)), payload, ERR_UPDATE_CURRENCY)
            .await
    }

    pub async fn delete_currency(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/currencies/{}", encode(id)), None::<&()>, ERR_DELETE_CURRENCY)
            .await
    }
}
