// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use extraction_planner::config::Config;
use extraction_planner::db::Store;
use extraction_planner::routes::create_router;
use extraction_planner::services::DesignService;
use extraction_planner::AppState;
use std::sync::Arc;

/// API key matching `Config::test_default()`.
#[allow(dead_code)]
pub const TEST_API_KEY: &str = "test-api-key";

/// Create a test app backed by a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let state = Arc::new(AppState {
        config,
        store: Store::new(),
        designer: DesignService::new(),
    });

    (create_router(state.clone()), state)
}

/// Send an authenticated request and decode the JSON response body.
#[allow(dead_code)]
pub async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TEST_API_KEY}"));

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    // Rejections from extractors are plain text; map anything non-JSON to null
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Create an experiment and return its JSON record.
#[allow(dead_code)]
pub async fn create_experiment(app: &axum::Router, body: serde_json::Value) -> serde_json::Value {
    let (status, json) = send_json(app, "POST", "/api/experiments", Some(body)).await;
    assert_eq!(status, axum::http::StatusCode::OK, "create failed: {json}");
    json
}
