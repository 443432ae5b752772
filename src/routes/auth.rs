// SPDX-License-Identifier: MIT

//! Session authentication routes.
//!
//! The auth provider is external; this service only turns an established
//! identity into a signed session. Identities are opaque strings,
//! constrained to a storage-safe alphabet.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub token: String,
}

/// Issue a session JWT for an identity, as a cookie and in the body.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    validate_user_id(&payload.user_id)?;

    let token = create_jwt(&payload.user_id, &state.config.jwt_signing_key)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!(user_id = %payload.user_id, "Session created");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            user_id: payload.user_id,
            token,
        }),
    ))
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    (
        jar.remove(cookie),
        Json(serde_json::json!({ "success": true })),
    )
}

/// Identities double as storage directory names, so the alphabet is strict.
fn validate_user_id(user_id: &str) -> Result<()> {
    let ok = !user_id.is_empty()
        && user_id.len() <= 64
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "user_id must be 1-64 characters of [A-Za-z0-9_-]".to_string(),
        ))
    }
}
