// SPDX-License-Identifier: MIT

//! Durable record types for the remote store collections.
//!
//! These are the one-way write targets invoked by the UI layer; the
//! progression engine never reads or reconciles against them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A logged workout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub name: String,
    pub duration_minutes: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    /// Server-side RFC3339 timestamp set at append time
    #[serde(default)]
    pub created_at: String,
    pub user_id: String,
}

/// A logged meal with its (possibly AI-estimated) macros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub name: String,
    pub date: NaiveDate,
    /// Time of day, "HH:MM"
    pub time: String,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein_grams: Option<f64>,
    #[serde(default)]
    pub carbs_grams: Option<f64>,
    #[serde(default)]
    pub fat_grams: Option<f64>,
    /// Server-side RFC3339 timestamp set at append time
    #[serde(default)]
    pub created_at: String,
    pub user_id: String,
}

/// A night of sleep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepRecord {
    pub duration_hours: f64,
    /// Subjective quality, 1-5
    pub quality: u8,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    /// Server-side RFC3339 timestamp set at append time
    #[serde(default)]
    pub created_at: String,
    pub user_id: String,
}

/// A creatine dose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatineRecord {
    pub dose_mg: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    /// Server-side RFC3339 timestamp set at append time
    #[serde(default)]
    pub created_at: String,
    pub user_id: String,
}

/// A weigh-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRecord {
    pub weight_kg: f64,
    pub date: NaiveDate,
    /// Server-side RFC3339 timestamp set at append time
    #[serde(default)]
    pub created_at: String,
    pub user_id: String,
}

/// An uploaded document or progress photo, with optional AI-derived
/// body-composition findings attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub body_fat_percentage: Option<f64>,
    #[serde(default)]
    pub ai_advice: Option<String>,
    /// Server-side RFC3339 timestamp set at append time
    #[serde(default)]
    pub created_at: String,
    pub user_id: String,
}
