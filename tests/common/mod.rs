//! In-process fake of the shop REST API, served on a random localhost port.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use shop_admin::models::*;
use shop_admin::{ApiClient, SessionStore, TokenStorage};
use tokio::sync::RwLock;
use uuid::Uuid;

#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test-token";
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "secret";

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct FakeState {
    pub categories: Vec<Category>,
    pub currencies: Vec<Currency>,
    pub requests: Vec<RecordedRequest>,
    /// Canned error responses keyed by "METHOD /path".
    pub failures: HashMap<String, (StatusCode, Value)>,
}

pub type SharedState = Arc<RwLock<FakeState>>;

type Reply = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

pub struct TestBackend {
    pub base_url: String,
    pub state: SharedState,
}

#[allow(dead_code)]
impl TestBackend {
    pub async fn seed_categories(&self, categories: Vec<Category>) {
        self.state.write().await.categories = categories;
    }

    pub async fn fail(&self, method: &str, path: &str, status: StatusCode, body: Value) {
        self.state
            .write()
            .await
            .failures
            .insert(format!("{} {}", method, path), (status, body));
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.state.read().await.requests.len()
    }
}

pub async fn spawn_backend() -> anyhow::Result<TestBackend> {
    let state: SharedState = Arc::new(RwLock::new(FakeState::default()));

    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/categories", post(create_category).get(list_categories))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/currencies", post(create_currency).get(list_currencies))
        .route(
            "/currencies/{id}",
            put(update_currency).delete(delete_currency),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestBackend {
        base_url: format!("http://{}", addr),
        state,
    })
}

/// A client with an empty session persisted under a fresh temp dir.
#[allow(dead_code)]
pub fn anonymous_client(backend: &TestBackend) -> anyhow::Result<ApiClient> {
    let temp_dir = tempfile::tempdir()?;
    let storage = TokenStorage::new(temp_dir.path().join("session.json"));
    std::mem::forget(temp_dir);
    let session = SessionStore::new(storage, 3600);
    Ok(ApiClient::new(backend.base_url.clone(), session))
}

#[allow(dead_code)]
pub async fn authed_client(backend: &TestBackend) -> anyhow::Result<ApiClient> {
    let client = anonymous_client(backend)?;
    client.session().set_token(TEST_TOKEN).await?;
    Ok(client)
}

#[allow(dead_code)]
pub fn category(id: &str, parent: Option<&str>) -> Category {
    Category {
        id: id.to_string(),
        name: format!("Category {}", id),
        description: None,
        parent: parent.map(str::to_string),
        status: CategoryStatus::Active,
        image: None,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

fn ok(status: StatusCode, data: impl serde::Serialize) -> Reply {
    Ok((status, Json(json!({ "data": data }))))
}

fn parse_body(bytes: &Bytes) -> Option<Value> {
    if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(bytes).ok()
    }
}

/// Records the call, checks the bearer token, and applies canned failures.
async fn guard(
    state: &SharedState,
    headers: &HeaderMap,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> Result<(), (StatusCode, Json<Value>)> {
    let mut s = state.write().await;
    s.requests.push(RecordedRequest {
        method: method.to_string(),
        path: path.to_string(),
        body,
    });

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false);
    if !authorized {
        return Err(error(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    if let Some((status, body)) = s.failures.get(&format!("{} {}", method, path)) {
        return Err((*status, Json(body.clone())));
    }
    Ok(())
}

async fn login(State(state): State<SharedState>, body: Bytes) -> Reply {
    let body = parse_body(&body);
    state.write().await.requests.push(RecordedRequest {
        method: "POST".to_string(),
        path: "/auth/login".to_string(),
        body: body.clone(),
    });
    let payload: LoginPayload = body
        .and_then(|b| serde_json::from_value(b).ok())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid body"))?;
    if payload.password != TEST_PASSWORD {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }
    ok(
        StatusCode::OK,
        LoginResponse {
            token: TEST_TOKEN.to_string(),
            user: owner(&payload.email),
        },
    )
}

fn owner(email: &str) -> Profile {
    Profile {
        id: "u1".to_string(),
        email: email.to_string(),
        name: Some("Owner".to_string()),
    }
}

async fn me(State(state): State<SharedState>, headers: HeaderMap) -> Reply {
    guard(&state, &headers, "GET", "/auth/me", None).await?;
    ok(StatusCode::OK, owner("owner@shop.test"))
}

async fn list_categories(State(state): State<SharedState>, headers: HeaderMap) -> Reply {
    guard(&state, &headers, "GET", "/categories", None).await?;
    ok(StatusCode::OK, state.read().await.categories.clone())
}

async fn create_category(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    let body = parse_body(&body);
    guard(&state, &headers, "POST", "/categories", body.clone()).await?;
    let payload: CreateCategoryPayload = body
        .and_then(|b| serde_json::from_value(b).ok())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid body"))?;

    let created = Category {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        description: payload.description,
        parent: payload.parent,
        status: payload.status.unwrap_or_default(),
        image: None,
    };
    state.write().await.categories.push(created.clone());
    ok(StatusCode::CREATED, created)
}

async fn update_category(
    State(state): State<SharedState>,
    headers: HeaderMap,
    uri: Uri,
    Path(id): Path<String>,
    body: Bytes,
) -> Reply {
    let body = parse_body(&body);
    // Recorded as sent, before percent-decoding.
    let path = uri.path().to_string();
    guard(&state, &headers, "PUT", &path, body.clone()).await?;
    let payload: UpdateCategoryPayload = body
        .and_then(|b| serde_json::from_value(b).ok())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid body"))?;

    let mut s = state.write().await;
    let category = s
        .categories
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Category not found"))?;
    if let Some(name) = payload.name {
        category.name = name;
    }
    if payload.description.is_some() {
        category.description = payload.description;
    }
    if let Some(status) = payload.status {
        category.status = status;
    }
    if payload.image.is_some() {
        category.image = payload.image;
    }
    if let Some(parent) = payload.parent {
        category.parent = parent;
    }
    ok(StatusCode::OK, category.clone())
}

async fn delete_category(
    State(state): State<SharedState>,
    headers: HeaderMap,
    uri: Uri,
    Path(id): Path<String>,
    body: Bytes,
) -> Reply {
    let body = parse_body(&body);
    let path = uri.path().to_string();
    guard(&state, &headers, "DELETE", &path, body.clone()).await?;
    let payload: Option<DeleteCategoryPayload> = body.and_then(|b| serde_json::from_value(b).ok());

    let mut s = state.write().await;
    if !s.categories.iter().any(|c| c.id == id) {
        return Err(error(StatusCode::NOT_FOUND, "Category not found"));
    }

    match payload.map(|p| p.subcategories) {
        Some(Disposition::Move {
            target: Some(target),
        }) => {
            for c in s.categories.iter_mut() {
                if c.parent.as_deref() == Some(id.as_str()) {
                    c.parent = Some(target.clone());
                }
            }
        }
        _ => {
            let mut doomed = vec![id.clone()];
            let mut i = 0;
            while i < doomed.len() {
                let current = doomed[i].clone();
                doomed.extend(
                    s.categories
                        .iter()
                        .filter(|c| c.parent.as_deref() == Some(current.as_str()))
                        .map(|c| c.id.clone()),
                );
                i += 1;
            }
            s.categories.retain(|c| !doomed.contains(&c.id));
        }
    }
    s.categories.retain(|c| c.id != id);
    ok(StatusCode::OK, json!({ "id": id }))
}

async fn list_currencies(State(state): State<SharedState>, headers: HeaderMap) -> Reply {
    guard(&state, &headers, "GET", "/currencies", None).await?;
    ok(StatusCode::OK, state.read().await.currencies.clone())
}

async fn create_currency(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    let body = parse_body(&body);
    guard(&state, &headers, "POST", "/currencies", body.clone()).await?;
    let payload: CurrencyPayload = body
        .and_then(|b| serde_json::from_value(b).ok())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid body"))?;

    let created = Currency {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        symbol: payload.symbol,
        code: payload.code,
        created_at: Some("2026-01-01T00:00:00Z".to_string()),
        updated_at: Some("2026-01-01T00:00:00Z".to_string()),
    };
    state.write().await.currencies.push(created.clone());
    ok(StatusCode::CREATED, created)
}

async fn update_currency(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Reply {
    let body = parse_body(&body);
    let path = format!("/currencies/{}", id);
    guard(&state, &headers, "PUT", &path, body.clone()).await?;
    let payload: CurrencyPayload = body
        .and_then(|b| serde_json::from_value(b).ok())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid body"))?;

    let mut s = state.write().await;
    let currency = s
        .currencies
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Currency not found"))?;
    currency.name = payload.name;
    currency.symbol = payload.symbol;
    currency.code = payload.code;
    ok(StatusCode::OK, currency.clone())
}

async fn delete_currency(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let path = format!("/currencies/{}", id);
    guard(&state, &headers, "DELETE", &path, None).await?;
    let mut s = state.write().await;
    let before = s.currencies.len();
    s.currencies.retain(|c| c.id != id);
    if s.currencies.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "Currency not found"));
    }
    ok(StatusCode::OK, json!({ "id": id }))
}
