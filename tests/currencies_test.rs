mod common;

use serde_json::json;
use shop_admin::ApiError;
use shop_admin::currencies::CurrencyManager;
use shop_admin::models::CurrencyPayload;

use common::{authed_client, spawn_backend};

fn form(name: &str, symbol: &str, code: &str) -> CurrencyPayload {
    CurrencyPayload {
        name: name.to_string(),
        symbol: symbol.to_string(),
        code: code.to_string(),
    }
}

#[tokio::test]
async fn create_submits_uppercase_code() {
    let backend = spawn_backend().await.expect("spawn backend");
    let mut manager = CurrencyManager::new(authed_client(&backend).await.unwrap());

    let created = manager
        .create(&form("Euro", "€", "eur"))
        .await
        .expect("create currency");
    assert_eq!(created.code, "EUR");

    let requests = backend.requests().await;
    let post = requests.iter().find(|r| r.method == "POST").unwrap();
    assert_eq!(
        post.body,
        Some(json!({ "name": "Euro", "symbol": "€", "code": "EUR" }))
    );

    // refetched after the mutation
    assert_eq!(requests.last().unwrap().method, "GET");
    assert_eq!(manager.currencies().len(), 1);
}

#[tokio::test]
async fn update_submits_uppercase_code() {
    let backend = spawn_backend().await.expect("spawn backend");
    let mut manager = CurrencyManager::new(authed_client(&backend).await.unwrap());
    let created = manager.create(&form("Dollar", "$", "USD")).await.unwrap();

    let updated = manager
        .update(&created.id, &form("US Dollar", "$", "usd"))
        .await
        .expect("update currency");
    assert_eq!(updated.code, "USD");
    assert_eq!(updated.name, "US Dollar");

    let requests = backend.requests().await;
    let put = requests.iter().find(|r| r.method == "PUT").unwrap();
    assert_eq!(put.path, format!("/currencies/{}", created.id));
    assert_eq!(put.body.as_ref().unwrap()["code"], "USD");
}

#[tokio::test]
async fn format_hints_block_submission() {
    let backend = spawn_backend().await.expect("spawn backend");
    let mut manager = CurrencyManager::new(authed_client(&backend).await.unwrap());

    let err = manager.create(&form("Franc", "CHFR", "chf")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    let err = manager.create(&form("Dollar", "$", "us")).await.unwrap_err();
    assert_eq!(err.user_message(), "Code must be 3 letters (ISO 4217)");
    assert_eq!(manager.last_error(), Some("Code must be 3 letters (ISO 4217)"));

    assert_eq!(backend.request_count().await, 0);
}

#[tokio::test]
async fn delete_removes_and_reports_missing() {
    let backend = spawn_backend().await.expect("spawn backend");
    let mut manager = CurrencyManager::new(authed_client(&backend).await.unwrap());
    let created = manager.create(&form("Yen", "¥", "jpy")).await.unwrap();

    manager.delete(&created.id).await.expect("delete currency");
    assert!(manager.currencies().is_empty());

    let err = manager.delete(&created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Currency not found");
}
