use serde::de::DeserializeOwned;
use shop_admin::constants::*;
use shop_admin::error::extract_error_message;
use shop_admin::models::*;
use shop_admin::utils::api_base_url;
use urlencoding::encode;
use wasm_bindgen::JsCast;

// Same variable the CLI reads, baked in at build time.
fn api_base() -> &'static str {
    api_base_url(option_env!("SHOP_API_URL"))
}

// Helper to make JSON requests against the shop API
async fn request<T: DeserializeOwned>(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<String>,
    fallback: &str,
) -> Result<T, String> {
    use web_sys::{RequestInit, RequestMode};

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);

    let headers = web_sys::Headers::new().map_err(|_| "Failed to create headers")?;
    if let Some(token) = token {
        headers
            .set("Authorization", &format!("Bearer {}", token))
            .map_err(|_| "Failed to set header")?;
    }
    if let Some(b) = body {
        let body_js = wasm_bindgen::JsValue::from_str(&b);
        opts.set_body(&body_js);
        headers
            .set("Content-Type", "application/json")
            .map_err(|_| "Failed to set header")?;
    }
    opts.set_headers(&headers);

    let window = web_sys::window().ok_or("No window")?;
    let url = format!("{}{}", api_base(), path);
    let request =
        web_sys::Request::new_with_str_and_init(&url, &opts).map_err(|_| "Failed to create request")?;

    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| "Fetch failed")?;

    let resp: web_sys::Response = resp_value.dyn_into().map_err(|_| "Invalid response")?;

    let text = wasm_bindgen_futures::JsFuture::from(
        resp.text().map_err(|_| "Failed to get text")?,
    )
    .await
    .map_err(|_| "Failed to read text")?;
    let text = text.as_string().unwrap_or_default();

    if !resp.ok() {
        return Err(extract_error_message(&text, fallback));
    }

    if resp.status() == 204 && text.trim().is_empty() {
        return serde_json::from_value(serde_json::Value::Null)
            .map_err(|_| "Empty response body".to_string());
    }

    Envelope::<T>::decode(&text).map_err(|e| e.user_message())
}

// A missing token fails here, before fetch is ever called.
async fn authed<T: DeserializeOwned>(
    method: &str,
    path: &str,
    token: Option<String>,
    body: Option<String>,
    fallback: &str,
) -> Result<T, String> {
    let token = token.ok_or_else(|| ERR_NO_TOKEN.to_string())?;
    request(method, path, Some(&token), body, fallback).await
}

fn to_body(payload: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string(payload).map_err(|e| e.to_string())
}

// Auth API

pub async fn login(payload: LoginPayload) -> Result<LoginResponse, String> {
    request("POST", "/auth/login", None, Some(to_body(&payload)?), ERR_LOGIN).await
}

pub async fn get_me(token: Option<String>) -> Result<Profile, String> {
    authed("GET", "/auth/me", token, None, ERR_PROFILE).await
}

// Categories API

pub async fn get_categories(token: Option<String>) -> Result<Vec<Category>, String> {
    authed("GET", "/categories", token, None, ERR_LOAD_CATEGORIES).await
}

pub async fn create_category(
    token: Option<String>,
    payload: CreateCategoryPayload,
) -> Result<Category, String> {
    let body = to_body(&payload)?;
    authed("POST", "/categories", token, Some(body), ERR_CREATE_CATEGORY).await
}

pub async fn update_category(
    token: Option<String>,
    id: &str,
    payload: UpdateCategoryPayload,
) -> Result<Category, String> {
    let body = to_body(&payload)?;
    let path = format!("/categories/{}", encode(id));
    authed("PUT", &path, token, Some(body), ERR_UPDATE_CATEGORY).await
}

pub async fn delete_category(
    token: Option<String>,
    id: &str,
    payload: DeleteCategoryPayload,
) -> Result<(), String> {
    let body = to_body(&payload)?;
    let path = format!("/categories/{}", encode(id));
    let _: serde_json::Value = authed("DELETE", &path, token, Some(body), ERR_DELETE_CATEGORY).await?;
    Ok(())
}

// Currencies API

pub async fn get_currencies(token: Option<String>) -> Result<Vec<Currency>, String> {
    authed("GET", "/currencies", token, None, ERR_LOAD_CURRENCIES).await
}

pub async fn create_currency(
    token: Option<String>,
    payload: CurrencyPayload,
) -> Result<Currency, String> {
    let body = to_body(&payload)?;
    authed("POST", "/currencies", token, Some(body), ERR_CREATE_CURRENCY).await
}

pub async fn update_currency(
    token: Option<String>,
    id: &str,
    payload: CurrencyPayload,
) -> Result<Currency, String> {
    let body = to_body(&payload)?;
    let path = format!("/currencies/{}", encode(id));
    authed("PUT", &path, token, Some(body), ERR_UPDATE_CURRENCY).await
}

pub async fn delete_currency(token: Option<String>, id: &str) -> Result<(), String> {
    let path = format!("/currencies/{}", encode(id));
    let _: serde_json::Value = authed("DELETE", &path, token, None, ERR_DELETE_CURRENCY).await?;
    Ok(())
}
