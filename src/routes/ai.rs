// SPDX-License-Identifier: MIT

//! AI advisory proxy routes.
//!
//! Purely advisory: results are handed back to the client, which feeds them
//! into engine operations or record writes as ordinary data. Failures here
//! never touch progression state.

use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::services::{BodyCompositionEstimate, NutritionEstimate};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ai/nutrition", post(estimate_nutrition))
        .route("/api/ai/body-scan", post(analyze_body_photo))
}

#[derive(Deserialize, Validate)]
pub struct NutritionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub description: String,
}

/// Estimate meal macros from a free-text description.
async fn estimate_nutrition(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NutritionRequest>,
) -> Result<Json<NutritionEstimate>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    tracing::debug!(user_id = %user.user_id, "Nutrition estimate requested");
    let estimate = state.nutrition.estimate(&payload.description).await?;
    Ok(Json(estimate))
}

#[derive(Deserialize, Validate)]
pub struct BodyScanRequest {
    #[validate(length(min = 1, max = 2048))]
    pub image_url: String,
}

/// Analyze an uploaded body photo for composition and advice.
async fn analyze_body_photo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<BodyScanRequest>,
) -> Result<Json<BodyCompositionEstimate>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if !payload.image_url.starts_with("http://") && !payload.image_url.starts_with("https://") {
        return Err(AppError::Validation(
            "image_url must be an http(s) URL".to_string(),
        ));
    }

    tracing::debug!(user_id = %user.user_id, "Body scan requested");
    let estimate = state.vision.analyze_body_photo(&payload.image_url).await?;
    Ok(Json(estimate))
}
