//! Integration tests for the registration API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use client_registry::api::{create_router, AppState};
use client_registry::notify::Notifier;
use client_registry::store::{Client, ClientStore, MemoryClientStore};
use phonenumber::country;
use telegram_client::TelegramError;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Notifier double that records every announcement and can be told to fail.
#[derive(Default)]
struct TestNotifier {
    sent: Mutex<Vec<String>>,
    fail: AtomicBool,
}

#[async_trait]
impl Notifier for TestNotifier {
    async fn client_registered(&self, client: &Client) -> Result<(), TelegramError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TelegramError::Api {
                code: 400,
                description: "Bad Request: chat not found".into(),
            });
        }

        self.sent.lock().await.push(client.phone_number.clone());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.fail.load(Ordering::SeqCst)
    }
}

struct TestApp {
    router: Router,
    store: Arc<MemoryClientStore>,
    notifier: Arc<TestNotifier>,
}

fn create_test_app() -> TestApp {
    let store = Arc::new(MemoryClientStore::new());
    let notifier = Arc::new(TestNotifier::default());
    let state = AppState::new(store.clone(), notifier.clone(), country::Id::RU);
    let router = create_router(state, "/webhook", None);

    TestApp {
        router,
        store,
        notifier,
    }
}

async fn post_json(router: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn register(router: &Router, phone_number: &str) -> (StatusCode, serde_json::Value) {
    post_json(
        router,
        "/v1/clients/",
        serde_json::json!({ "phone_number": phone_number }),
    )
    .await
}

#[tokio::test]
async fn test_register_normalizes_and_creates() {
    let app = create_test_app();

    let (status, json) = register(&app.router, "+7 (912) 345-67-89").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["phone_number"], "+79123456789");
    assert_eq!(json["id"], 1);
    assert!(json["message"].as_str().unwrap().contains("+79123456789"));

    let row = app.store.get("+79123456789").await.unwrap();
    assert_eq!(row.id, 1);

    let sent = app.notifier.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], "+79123456789");
}

#[tokio::test]
async fn test_register_wrong_region() {
    let app = create_test_app();

    let (status, json) = register(&app.router, "+1 212 555 0100").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "WRONG_REGION");
    assert!(json["error"].as_str().unwrap().contains("+1 212 555 0100"));

    assert_eq!(app.store.count().await.unwrap(), 0);
    assert!(app.notifier.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_register_invalid_number() {
    let app = create_test_app();

    let (status, json) = register(&app.router, "+7 912 345-67-8").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_NUMBER");
    assert!(json["error"].as_str().unwrap().contains("+7 912 345-67-8"));

    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_unparseable_input() {
    let app = create_test_app();

    let (status, json) = register(&app.router, "not-a-number").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "UNPARSEABLE_NUMBER");
    assert!(json["error"].as_str().unwrap().contains("not-a-number"));
}

#[tokio::test]
async fn test_rejection_is_idempotent() {
    let app = create_test_app();

    for _ in 0..2 {
        let (status, json) = register(&app.router, "+7 912 345-67-8").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_NUMBER");
    }

    assert_eq!(app.store.count().await.unwrap(), 0);
    assert!(app.notifier.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = create_test_app();

    let (status, _) = register(&app.router, "+79123456789").await;
    assert_eq!(status, StatusCode::CREATED);

    // Same number in national formatting normalizes to the same row.
    let (status, json) = register(&app.router, "8 (912) 345-67-89").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_REGISTERED");
    assert!(json["error"].as_str().unwrap().contains("8 (912) 345-67-89"));

    assert_eq!(app.store.count().await.unwrap(), 1);
    assert_eq!(app.notifier.sent.lock().await.len(), 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_registrations() {
    let app = create_test_app();

    let (first, second) = tokio::join!(
        register(&app.router, "+79123456789"),
        register(&app.router, "+7 (912) 345-67-89"),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    assert_eq!(app.store.count().await.unwrap(), 1);
    assert_eq!(app.notifier.sent.lock().await.len(), 1);
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_registration() {
    let app = create_test_app();
    app.notifier.fail.store(true, Ordering::SeqCst);

    let (status, json) = register(&app.router, "+79123456789").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["phone_number"], "+79123456789");
    assert!(app.store.get("+79123456789").await.is_some());
}

#[tokio::test]
async fn test_missing_body_is_rejected() {
    let app = create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/clients/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    register(&app.router, "+79123456789").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["status"], "ok");
    assert_eq!(json["client_count"], 1);
    assert_eq!(json["bot_healthy"], true);
}

#[tokio::test]
async fn test_webhook_acknowledges_updates() {
    let app = create_test_app();

    let update = serde_json::json!({
        "update_id": 7,
        "message": {
            "message_id": 3,
            "chat": { "id": 5, "type": "private" },
            "date": 1700000000,
            "text": "/start"
        }
    });

    let (status, _) = post_json(&app.router, "/webhook", update).await;
    assert_eq!(status, StatusCode::OK);
}
