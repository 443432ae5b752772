// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{header, Request};
use levelup_tracker::config::Config;
use levelup_tracker::db::BlobStore;
use levelup_tracker::routes::create_router;
use levelup_tracker::services::{NutritionClient, VisionClient};
use levelup_tracker::AppState;
use std::sync::Arc;

/// Create a test app with an in-memory blob store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let state = Arc::new(AppState {
        config,
        store: BlobStore::new_in_memory(),
        sessions: dashmap::DashMap::new(),
        nutrition: NutritionClient::new(None),
        vision: VisionClient::new(None),
    });

    (create_router(state.clone()), state)
}

/// Create a session token for a test user.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    levelup_tracker::middleware::auth::create_jwt(user_id, signing_key)
        .expect("Failed to create test JWT")
}

/// Build an authenticated JSON request.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Build an authenticated request with no body.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("Failed to build request")
}

/// Read and parse a JSON response body.
#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Response was not valid JSON")
}
