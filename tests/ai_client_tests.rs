// SPDX-License-Identifier: MIT

//! AI advisory clients against a local stand-in for the upstream APIs.

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use levelup_tracker::services::{NutritionClient, VisionClient};

/// Serve `router` on an ephemeral local port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_nutrition_estimate_against_mocked_endpoint() {
    let router = Router::new().route(
        "/v1/messages",
        post(|headers: HeaderMap| async move {
            // The client must authenticate the way the real API expects
            assert_eq!(headers.get("x-api-key").unwrap(), "key-123");
            assert!(headers.get("anthropic-version").is_some());
            Json(serde_json::json!({
                "content": [{
                    "type": "text",
                    "text": "Here you go:\n```json\n{\"calories\": 650, \
                             \"protein_grams\": 45, \"carbs_grams\": null, \
                             \"fat_grams\": 20}\n```"
                }]
            }))
        }),
    );
    let base_url = serve(router).await;

    let client = NutritionClient::with_base_url(Some("key-123".to_string()), base_url);
    let estimate = client.estimate("chicken and rice").await.unwrap();

    assert_eq!(estimate.calories, Some(650.0));
    assert_eq!(estimate.protein_grams, Some(45.0));
    assert_eq!(estimate.carbs_grams, None);
    assert_eq!(estimate.fat_grams, Some(20.0));
}

#[tokio::test]
async fn test_nutrition_upstream_failure_is_ai_error() {
    let router = Router::new().route(
        "/v1/messages",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
    );
    let base_url = serve(router).await;

    let client = NutritionClient::with_base_url(Some("key-123".to_string()), base_url);
    let err = client.estimate("chicken and rice").await.unwrap_err();
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn test_body_scan_against_mocked_endpoint() {
    let router = Router::new()
        .route(
            "/photo.jpg",
            get(|| async {
                ([(header::CONTENT_TYPE, "image/jpeg")], vec![0xffu8, 0xd8, 0xff])
            }),
        )
        .route(
            "/v1beta/models/gemini-pro-vision:generateContent",
            post(|Json(body): Json<serde_json::Value>| async move {
                // The image must arrive inlined, not as a URL
                let inline = &body["contents"][0]["parts"][1]["inline_data"];
                assert_eq!(inline["mime_type"], "image/jpeg");
                assert!(!inline["data"].as_str().unwrap().is_empty());
                Json(serde_json::json!({
                    "candidates": [{
                        "content": {
                            "parts": [{
                                "text": "{\"body_fat_percentage\": 18.5, \
                                         \"advice\": \"Keep building your back.\"}"
                            }]
                        }
                    }]
                }))
            }),
        );
    let base_url = serve(router).await;

    let client = VisionClient::with_base_url(Some("key-123".to_string()), base_url.clone());
    let estimate = client
        .analyze_body_photo(&format!("{}/photo.jpg", base_url))
        .await
        .unwrap();

    assert_eq!(estimate.body_fat_percentage, Some(18.5));
    assert_eq!(estimate.advice, "Keep building your back.");
}

#[tokio::test]
async fn test_body_scan_unfetchable_image_is_ai_error() {
    let router = Router::new();
    let base_url = serve(router).await;

    let client = VisionClient::with_base_url(Some("key-123".to_string()), base_url.clone());
    let err = client
        .analyze_body_photo(&format!("{}/missing.jpg", base_url))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to fetch image"));
}
