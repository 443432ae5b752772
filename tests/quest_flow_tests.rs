// SPDX-License-Identifier: MIT

//! End-to-end progression flow through the HTTP API: onboarding, quest
//! logging, XP awards, streaks, and reset.

use axum::http::StatusCode;
use chrono::Utc;
use tower::ServiceExt;

mod common;

fn today() -> String {
    Utc::now().date_naive().to_string()
}

#[tokio::test]
async fn test_initial_state_has_no_profile() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("hunter-1", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::empty_request("GET", "/api/state", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::response_json(response).await;
    assert!(body["user_profile"].is_null());
    assert_eq!(body["level"]["current_level"], 1);
    assert_eq!(body["level"]["next_level_xp"], 1000);
    assert_eq!(body["streaks"]["current"], 0);
}

#[tokio::test]
async fn test_onboarding_sets_profile() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("hunter-1", &state.config.jwt_signing_key);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "PUT",
            "/api/profile",
            &token,
            serde_json::json!({
                "height_cm": 180.0,
                "start_weight_kg": 90.0,
                "current_weight_kg": 90.0,
                "goal_weight_kg": 80.0,
                "start_date": "2024-01-01",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::response_json(response).await;
    assert_eq!(body["persisted"], true);
    assert_eq!(body["state"]["user_profile"]["user_id"], "hunter-1");
    assert_eq!(body["state"]["user_profile"]["current_weight_kg"], 90.0);
}

#[tokio::test]
async fn test_meal_logging_completes_calorie_quest_once() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("hunter-1", &state.config.jwt_signing_key);

    // First meal: 2000 kcal, below the 3500 target
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/quests/log",
            &token,
            serde_json::json!({ "date": today(), "quest": "calories", "value": 2000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["quest"]["value"], 2000.0);
    assert_eq!(body["quest"]["completed"], false);
    assert_eq!(body["awarded_xp"], 0);

    // Second meal pushes past the target; exactly one 50 XP award
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/quests/log",
            &token,
            serde_json::json!({ "date": today(), "quest": "calories", "value": 1600.0 }),
        ))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    assert_eq!(body["quest"]["value"], 3600.0);
    assert_eq!(body["quest"]["completed"], true);
    assert_eq!(body["awarded_xp"], 50);
    assert_eq!(body["level"]["total_xp"], 50);
    assert_eq!(body["streaks"]["current"], 1);

    // Third call: still completed, no double pay, streak unchanged
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/quests/log",
            &token,
            serde_json::json!({ "date": today(), "quest": "calories", "value": 100.0 }),
        ))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    assert_eq!(body["awarded_xp"], 0);
    assert_eq!(body["level"]["total_xp"], 50);
    assert_eq!(body["streaks"]["current"], 1);

    // The day's log carries all five mandatory quests
    let response = app
        .oneshot(common::empty_request("GET", "/api/state", &token))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    let quests = &body["daily_logs"][today()]["quests"];
    for name in ["workout", "calories", "protein", "creatine", "sleep"] {
        assert!(!quests[name].is_null(), "missing quest {}", name);
    }
    assert_eq!(quests["workout"]["xp"], 100);
    assert_eq!(quests["protein"]["target"], 160.0);
}

#[tokio::test]
async fn test_back_logging_past_date_skips_streak() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("hunter-1", &state.config.jwt_signing_key);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/quests/log",
            &token,
            serde_json::json!({ "date": "2020-01-01", "quest": "workout", "completed": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    // XP is still awarded for the back-logged completion
    assert_eq!(body["awarded_xp"], 100);
    // ...but the streak is untouched
    assert_eq!(body["streaks"]["current"], 0);
    assert!(body["streaks"]["last_active"].is_null());
}

#[tokio::test]
async fn test_add_xp_levels_up_at_exact_boundary() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("hunter-1", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/xp",
            &token,
            serde_json::json!({ "amount": 2500 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::response_json(response).await;
    assert_eq!(body["levels_gained"], 2);
    assert_eq!(body["level"]["current_level"], 3);
    assert_eq!(body["level"]["current_xp"], 0);
    assert_eq!(body["level"]["next_level_xp"], 2250);
    assert_eq!(body["level"]["total_xp"], 2500);
}

#[tokio::test]
async fn test_weigh_in_updates_profile_and_appends_record() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("hunter-1", &state.config.jwt_signing_key);

    // Weigh-in before onboarding is a 404
    let response = app
        .clone()
        .oneshot(common::json_request(
            "PUT",
            "/api/weight",
            &token,
            serde_json::json!({ "weight_kg": 88.5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.clone()
        .oneshot(common::json_request(
            "PUT",
            "/api/profile",
            &token,
            serde_json::json!({
                "height_cm": 180.0,
                "start_weight_kg": 90.0,
                "current_weight_kg": 90.0,
                "goal_weight_kg": 80.0,
                "start_date": "2024-01-01",
            }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "PUT",
            "/api/weight",
            &token,
            serde_json::json!({ "weight_kg": 88.5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["record_saved"], true);
    assert_eq!(body["current_weight_kg"], 88.5);

    // Profile reflects the new weight; only that field changed
    let response = app
        .clone()
        .oneshot(common::empty_request("GET", "/api/state", &token))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    assert_eq!(body["user_profile"]["current_weight_kg"], 88.5);
    assert_eq!(body["user_profile"]["start_weight_kg"], 90.0);

    // The durable weight record is listed
    let response = app
        .oneshot(common::empty_request("GET", "/api/weights", &token))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["weight_kg"], 88.5);
}

#[tokio::test]
async fn test_reset_restores_initial_state() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("hunter-1", &state.config.jwt_signing_key);

    app.clone()
        .oneshot(common::json_request(
            "POST",
            "/api/xp",
            &token,
            serde_json::json!({ "amount": 99999 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(common::empty_request("POST", "/api/reset", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["state"]["level"]["current_level"], 1);
    assert_eq!(body["state"]["level"]["total_xp"], 0);
    assert!(body["state"]["user_profile"].is_null());
    assert_eq!(body["state"]["streaks"]["longest"], 0);
}

#[tokio::test]
async fn test_state_survives_session_reload() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("hunter-1", &state.config.jwt_signing_key);

    app.clone()
        .oneshot(common::json_request(
            "POST",
            "/api/xp",
            &token,
            serde_json::json!({ "amount": 700 }),
        ))
        .await
        .unwrap();

    // Drop the in-memory session to force a reload from the snapshot
    state.sessions.remove("hunter-1");

    let response = app
        .oneshot(common::empty_request("GET", "/api/state", &token))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    assert_eq!(body["level"]["total_xp"], 700);
}
