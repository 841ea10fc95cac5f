//! Shared harness for API integration tests.
//!
//! Builds the full application router (same middleware stack as production)
//! on top of a `#[sqlx::test]` pool, plus JSON request helpers and an
//! account registration helper.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pawtrail_core::storage::LocalPhotoStorage;
use pawtrail_core::types::DbId;
use pawtrail_events::{EventBus, NotificationWriter, SubscriberSet};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use pawtrail_api::auth::jwt::JwtConfig;
use pawtrail_api::config::ServerConfig;
use pawtrail_api::router::build_app_router;
use pawtrail_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: std::env::temp_dir()
            .join("pawtrail-test-uploads")
            .to_string_lossy()
            .into_owned(),
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Also wires the event bus to a running dispatch loop with the
/// notification writer registered, so report activity produces
/// notifications just like in production.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let event_bus = Arc::new(EventBus::default());
    let mut subscribers = SubscriberSet::new();
    subscribers.register(Arc::new(NotificationWriter::new(pool.clone())));
    tokio::spawn(subscribers.run(event_bus.subscribe()));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        storage: Arc::new(LocalPhotoStorage::new(config.upload_dir.clone())),
    };

    build_app_router(state, &config)
}

/// Send a request and return the raw response.
pub async fn request(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str) -> Response<Body> {
    request(app, Method::GET, path, None, None).await
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    request(app, Method::GET, path, Some(token), None).await
}

pub async fn post_json(app: Router, path: &str, token: Option<&str>, body: Value) -> Response<Body> {
    request(app, Method::POST, path, token, Some(body)).await
}

pub async fn put_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    request(app, Method::PUT, path, Some(token), None).await
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a fresh account through the API and return `(token, user_id)`.
pub async fn register(app: &Router, username: &str, email: &str) -> (String, DbId) {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        None,
        serde_json::json!({
            "username": username,
            "email": email,
            "password": "correct-horse-battery",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    let user_id = json["user"]["id"].as_i64().unwrap();
    (token, user_id)
}

/// Top up a user's balance through the API.
pub async fn top_up(app: &Router, token: &str, amount: i64) {
    let response = post_json(
        app.clone(),
        "/api/v1/users/me/top-up",
        Some(token),
        serde_json::json!({ "amount": amount }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
