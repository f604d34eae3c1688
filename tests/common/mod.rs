use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use playnet_tutorials::config::Config;
use playnet_tutorials::ledger::ManualClock;
use playnet_tutorials::routes::create_app;
use playnet_tutorials::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Fixed starting time for the ledger clock
#[allow(dead_code)]
pub const START_TIME: i64 = 1_700_000_000;

/// Create a test app with a manual clock.
/// Returns the router, the shared state and the clock.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START_TIME));
    let state = Arc::new(AppState::new(Config::test_default(), clock.clone()));
    (create_app(state.clone()), state, clock)
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// Create a wallet, returning its address and session token.
#[allow(dead_code)]
pub async fn create_wallet(app: &Router) -> (String, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/wallets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    (
        body["address"].as_str().unwrap().to_string(),
        body["access_token"].as_str().unwrap().to_string(),
    )
}

/// Send a transaction signed by the wallet behind `token`.
#[allow(dead_code)]
pub async fn send(app: &Router, token: &str, instructions: Value) -> (StatusCode, Value) {
    post_json(
        app,
        "/api/transactions",
        token,
        json!({ "instructions": instructions }).to_string(),
    )
    .await
}

/// Simulate a transaction for the wallet behind `token`.
#[allow(dead_code)]
pub async fn simulate(app: &Router, token: &str, instructions: Value) -> (StatusCode, Value) {
    post_json(
        app,
        "/api/transactions/simulate",
        token,
        json!({ "instructions": instructions }).to_string(),
    )
    .await
}

/// POST a raw JSON body with a session token.
#[allow(dead_code)]
pub async fn post_json(app: &Router, uri: &str, token: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, json_body(response).await)
}

/// GET a path and return status and JSON body.
#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    (status, json_body(response).await)
}

/// Address at `index` in the accounts created by a transaction.
#[allow(dead_code)]
pub fn created(record: &Value, index: usize) -> String {
    record["created"][index].as_str().unwrap().to_string()
}
