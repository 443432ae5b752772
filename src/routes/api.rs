// SPDX-License-Identifier: MIT

//! API routes for authenticated users: progression-engine operations and
//! durable fitness records.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::db::collections;
use crate::engine::{
    Attribute, AttributeName, DailyQuest, EngineState, Level, QuestName, QuestUpdate, Streaks,
};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    CreatineRecord, DocumentRecord, MealRecord, SleepRecord, UserProfile, WeightRecord,
    WorkoutRecord,
};
use crate::time_utils::{format_utc_rfc3339, today_utc};
use crate::AppState;

fn record_timestamp() -> String {
    format_utc_rfc3339(chrono::Utc::now())
}

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        // Progression engine
        .route("/api/state", get(get_state))
        .route("/api/profile", put(set_profile))
        .route("/api/attributes/{name}", put(set_attribute))
        .route("/api/xp", post(add_xp))
        .route("/api/quests/log", post(log_quest))
        .route("/api/weight", put(weigh_in))
        .route("/api/reset", post(reset_state))
        // Durable records
        .route("/api/workouts", post(create_workout).get(list_workouts))
        .route("/api/meals", post(create_meal).get(list_meals))
        .route("/api/sleep", post(create_sleep).get(list_sleep))
        .route("/api/creatine", post(create_creatine).get(list_creatine))
        .route("/api/weights", get(list_weights))
        .route("/api/documents", post(create_document).get(list_documents))
}

fn validate<T: Validate>(payload: &T) -> Result<()> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

// ─── Engine State ────────────────────────────────────────────

/// Full engine snapshot. An absent profile means onboarding has not
/// completed yet.
async fn get_state(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<EngineState>> {
    let snapshot = state.engine_snapshot(&user.user_id).await?;
    Ok(Json(snapshot))
}

/// Response for engine mutations that return the whole state.
#[derive(Serialize)]
pub struct EngineResponse {
    /// False when the snapshot write failed; the mutation itself stuck and
    /// the client should surface a warning
    pub persisted: bool,
    pub state: EngineState,
}

#[derive(Deserialize, Validate)]
pub struct ProfilePayload {
    #[validate(range(min = 1.0, message = "height must be positive"))]
    pub height_cm: f64,
    #[validate(range(min = 1.0, message = "start weight must be positive"))]
    pub start_weight_kg: f64,
    #[validate(range(min = 1.0, message = "current weight must be positive"))]
    pub current_weight_kg: f64,
    #[validate(range(min = 1.0, message = "goal weight must be positive"))]
    pub goal_weight_kg: f64,
    pub start_date: NaiveDate,
}

/// Complete onboarding (or replace the profile wholesale).
async fn set_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<EngineResponse>> {
    validate(&payload)?;

    let profile = UserProfile {
        user_id: user.user_id.clone(),
        height_cm: payload.height_cm,
        start_weight_kg: payload.start_weight_kg,
        current_weight_kg: payload.current_weight_kg,
        goal_weight_kg: payload.goal_weight_kg,
        start_date: payload.start_date,
    };

    let ((), persisted) = state
        .mutate_engine(&user.user_id, |engine| {
            engine.set_profile(profile);
            Ok(())
        })
        .await?;

    tracing::info!(user_id = %user.user_id, "Profile set");

    let snapshot = state.engine_snapshot(&user.user_id).await?;
    Ok(Json(EngineResponse {
        persisted,
        state: snapshot,
    }))
}

/// Replace one attribute record. Unknown names fail to deserialize.
async fn set_attribute(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<AttributeName>,
    Json(attribute): Json<Attribute>,
) -> Result<Json<EngineResponse>> {
    let ((), persisted) = state
        .mutate_engine(&user.user_id, |engine| {
            engine.set_attribute(name, attribute)?;
            Ok(())
        })
        .await?;

    tracing::info!(user_id = %user.user_id, attribute = %name, "Attribute updated");

    let snapshot = state.engine_snapshot(&user.user_id).await?;
    Ok(Json(EngineResponse {
        persisted,
        state: snapshot,
    }))
}

// ─── XP and Quests ───────────────────────────────────────────

/// Negative amounts are unrepresentable; they fail deserialization.
#[derive(Deserialize)]
pub struct AddXpRequest {
    pub amount: u64,
}

#[derive(Serialize)]
pub struct AddXpResponse {
    pub persisted: bool,
    pub levels_gained: u32,
    pub level: Level,
}

/// Grant XP directly (e.g. bonus awards outside the quest system).
async fn add_xp(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddXpRequest>,
) -> Result<Json<AddXpResponse>> {
    let ((levels_gained, level), persisted) = state
        .mutate_engine(&user.user_id, |engine| {
            let gained = engine.add_xp(payload.amount);
            Ok((gained, engine.level.clone()))
        })
        .await?;

    if levels_gained > 0 {
        tracing::info!(
            user_id = %user.user_id,
            levels_gained,
            new_level = level.current_level,
            "Level up"
        );
    }

    Ok(Json(AddXpResponse {
        persisted,
        levels_gained,
        level,
    }))
}

#[derive(Deserialize)]
pub struct QuestLogRequest {
    pub date: NaiveDate,
    pub quest: QuestName,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub xp: Option<u64>,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Serialize)]
pub struct QuestLogResponse {
    pub persisted: bool,
    pub quest: DailyQuest,
    pub day_total_xp: u64,
    pub awarded_xp: u64,
    pub levels_gained: u32,
    pub level: Level,
    pub streaks: Streaks,
}

/// Log a daily quest event.
///
/// "Today" is resolved here, at the boundary, and passed into the engine so
/// the streak rule stays deterministic under test.
async fn log_quest(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<QuestLogRequest>,
) -> Result<Json<QuestLogResponse>> {
    let today = today_utc();
    let update = QuestUpdate {
        completed: payload.completed,
        xp: payload.xp,
        value: payload.value,
    };

    let ((outcome, level), persisted) = state
        .mutate_engine(&user.user_id, |engine| {
            let outcome = engine.log_daily_quest(today, payload.date, payload.quest, &update)?;
            Ok((outcome, engine.level.clone()))
        })
        .await?;

    tracing::debug!(
        user_id = %user.user_id,
        quest = %payload.quest,
        date = %payload.date,
        awarded_xp = outcome.awarded_xp,
        "Quest logged"
    );

    Ok(Json(QuestLogResponse {
        persisted,
        quest: outcome.quest,
        day_total_xp: outcome.day_total_xp,
        awarded_xp: outcome.awarded_xp,
        levels_gained: outcome.levels_gained,
        level,
        streaks: outcome.streaks,
    }))
}

// ─── Weigh-in ────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct WeighInRequest {
    #[validate(range(min = 1.0, max = 500.0, message = "weight out of range"))]
    pub weight_kg: f64,
    /// Date of the weigh-in record; defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct WeighInResponse {
    pub persisted: bool,
    /// Whether the durable weight record was written. Progression state is
    /// never rolled back on a record-write failure.
    pub record_saved: bool,
    pub current_weight_kg: f64,
}

/// Record a weigh-in: updates the profile's current weight and appends a
/// durable weight record.
async fn weigh_in(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<WeighInRequest>,
) -> Result<Json<WeighInResponse>> {
    validate(&payload)?;

    let ((), persisted) = state
        .mutate_engine(&user.user_id, |engine| {
            engine.update_current_weight(payload.weight_kg)?;
            Ok(())
        })
        .await?;

    let record = WeightRecord {
        weight_kg: payload.weight_kg,
        date: payload.date.unwrap_or_else(today_utc),
        created_at: record_timestamp(),
        user_id: user.user_id.clone(),
    };
    let record_saved = match state
        .store
        .append_record(&user.user_id, collections::WEIGHTS, &record)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(user_id = %user.user_id, error = %e, "Weight record write failed");
            false
        }
    };

    Ok(Json(WeighInResponse {
        persisted,
        record_saved,
        current_weight_kg: payload.weight_kg,
    }))
}

// ─── Reset ───────────────────────────────────────────────────

/// Restore the engine to its initial state (account/app reset).
async fn reset_state(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<EngineResponse>> {
    let ((), persisted) = state
        .mutate_engine(&user.user_id, |engine| {
            engine.reset();
            Ok(())
        })
        .await?;

    tracing::info!(user_id = %user.user_id, "Engine state reset");

    let snapshot = state.engine_snapshot(&user.user_id).await?;
    Ok(Json(EngineResponse {
        persisted,
        state: snapshot,
    }))
}

// ─── Durable Records ─────────────────────────────────────────

#[derive(Serialize)]
pub struct RecordAck {
    pub success: bool,
}

async fn append<T>(
    state: &AppState,
    user_id: &str,
    collection: &'static str,
    record: &T,
) -> Result<Json<RecordAck>>
where
    T: Serialize + DeserializeOwned + Clone,
{
    state.store.append_record(user_id, collection, record).await?;
    Ok(Json(RecordAck { success: true }))
}

/// Records are listed newest first.
async fn list<T>(
    state: &AppState,
    user_id: &str,
    collection: &'static str,
) -> Result<Json<Vec<T>>>
where
    T: Serialize + DeserializeOwned,
{
    let mut records: Vec<T> = state.store.list_records(user_id, collection).await?;
    records.reverse();
    Ok(Json(records))
}

#[derive(Deserialize, Validate)]
pub struct WorkoutPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: u32,
    pub date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<WorkoutPayload>,
) -> Result<Json<RecordAck>> {
    validate(&payload)?;
    let record = WorkoutRecord {
        name: payload.name,
        duration_minutes: payload.duration_minutes,
        date: payload.date,
        notes: payload.notes,
        created_at: record_timestamp(),
        user_id: user.user_id.clone(),
    };
    append(&state, &user.user_id, collections::WORKOUTS, &record).await
}

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<WorkoutRecord>>> {
    list(&state, &user.user_id, collections::WORKOUTS).await
}

#[derive(Deserialize, Validate)]
pub struct MealPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub date: NaiveDate,
    /// Time of day, "HH:MM"
    pub time: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub calories: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub protein_grams: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub carbs_grams: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fat_grams: Option<f64>,
}

async fn create_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<MealPayload>,
) -> Result<Json<RecordAck>> {
    validate(&payload)?;
    if chrono::NaiveTime::parse_from_str(&payload.time, "%H:%M").is_err() {
        return Err(AppError::Validation(
            "time must be in HH:MM format".to_string(),
        ));
    }
    let record = MealRecord {
        name: payload.name,
        date: payload.date,
        time: payload.time,
        calories: payload.calories,
        protein_grams: payload.protein_grams,
        carbs_grams: payload.carbs_grams,
        fat_grams: payload.fat_grams,
        created_at: record_timestamp(),
        user_id: user.user_id.clone(),
    };
    append(&state, &user.user_id, collections::MEALS, &record).await
}

async fn list_meals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<MealRecord>>> {
    list(&state, &user.user_id, collections::MEALS).await
}

#[derive(Deserialize, Validate)]
pub struct SleepPayload {
    #[validate(range(min = 0.0, max = 24.0))]
    pub duration_hours: f64,
    #[validate(range(min = 1, max = 5))]
    pub quality: u8,
    pub date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

async fn create_sleep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SleepPayload>,
) -> Result<Json<RecordAck>> {
    validate(&payload)?;
    let record = SleepRecord {
        duration_hours: payload.duration_hours,
        quality: payload.quality,
        date: payload.date,
        notes: payload.notes,
        created_at: record_timestamp(),
        user_id: user.user_id.clone(),
    };
    append(&state, &user.user_id, collections::SLEEP_LOGS, &record).await
}

async fn list_sleep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SleepRecord>>> {
    list(&state, &user.user_id, collections::SLEEP_LOGS).await
}

#[derive(Deserialize, Validate)]
pub struct CreatinePayload {
    #[validate(range(min = 1, max = 50_000))]
    pub dose_mg: u32,
    pub date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

async fn create_creatine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatinePayload>,
) -> Result<Json<RecordAck>> {
    validate(&payload)?;
    let record = CreatineRecord {
        dose_mg: payload.dose_mg,
        date: payload.date,
        notes: payload.notes,
        created_at: record_timestamp(),
        user_id: user.user_id.clone(),
    };
    append(&state, &user.user_id, collections::CREATINE_LOGS, &record).await
}

async fn list_creatine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CreatineRecord>>> {
    list(&state, &user.user_id, collections::CREATINE_LOGS).await
}

async fn list_weights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<WeightRecord>>> {
    list(&state, &user.user_id, collections::WEIGHTS).await
}

#[derive(Deserialize, Validate)]
pub struct DocumentPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub body_fat_percentage: Option<f64>,
    #[serde(default)]
    pub ai_advice: Option<String>,
}

async fn create_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<DocumentPayload>,
) -> Result<Json<RecordAck>> {
    validate(&payload)?;
    let record = DocumentRecord {
        title: payload.title,
        url: payload.url,
        description: payload.description,
        category: payload.category,
        body_fat_percentage: payload.body_fat_percentage,
        ai_advice: payload.ai_advice,
        created_at: record_timestamp(),
        user_id: user.user_id.clone(),
    };
    append(&state, &user.user_id, collections::DOCUMENTS, &record).await
}

async fn list_documents(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<DocumentRecord>>> {
    list(&state, &user.user_id, collections::DOCUMENTS).await
}
