// SPDX-License-Identifier: MIT

//! The progression engine state and its mutation operations.
//!
//! `EngineState` is an explicit owned value: every operation is a sequential
//! in-memory transform with no clock reads. "Today" is a parameter where the
//! streak rule needs it, so tests can replay arbitrary dates.
//!
//! Serialized as the per-user snapshot document. Every field tolerates being
//! absent in an older snapshot by substituting its initial default.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::attributes::{Attribute, AttributeName, Attributes};
use crate::engine::level::Level;
use crate::engine::quest::{DailyLog, DailyQuest, QuestName, QuestUpdate};
use crate::engine::streaks::Streaks;
use crate::models::UserProfile;

/// Domain errors raised by engine operations. State is never mutated when
/// one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("No profile exists; complete onboarding first")]
    MissingProfile,

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result of a quest logging event, for the caller's UI feedback.
#[derive(Debug, Clone, Serialize)]
pub struct QuestLogOutcome {
    /// The quest record after the update
    pub quest: DailyQuest,
    /// The day's recomputed XP total
    pub day_total_xp: u64,
    /// XP awarded by this call (0 unless the quest just completed)
    pub awarded_xp: u64,
    /// Levels gained by the award
    pub levels_gained: u32,
    /// Streak state after the call
    pub streaks: Streaks,
}

/// Full engine state: profile, attributes, level, streaks, and the
/// day-indexed quest log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineState {
    /// Absent until onboarding completes
    pub user_profile: Option<UserProfile>,
    pub attributes: Attributes,
    pub level: Level,
    pub streaks: Streaks,
    /// One log per date; logs are never deleted
    pub daily_logs: BTreeMap<NaiveDate, DailyLog>,
    /// Opaque payload for randomly assigned quests; the engine carries it
    /// through the snapshot without interpreting it
    pub active_quests: Vec<serde_json::Value>,
}

impl EngineState {
    /// Replace the profile wholesale.
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.user_profile = Some(profile);
    }

    /// Replace one attribute record by name.
    pub fn set_attribute(&mut self, name: AttributeName, attribute: Attribute) -> Result<(), EngineError> {
        if !attribute.score.is_finite() || attribute.score < 0.0 {
            return Err(EngineError::InvalidValue(format!(
                "attribute {} score must be a finite non-negative number",
                name
            )));
        }
        self.attributes.set(name, attribute);
        Ok(())
    }

    /// Add XP to the global level. Returns levels gained.
    pub fn add_xp(&mut self, amount: u64) -> u32 {
        self.level.add_xp(amount)
    }

    /// Log a daily quest event for `date`, lazily creating the day's log.
    ///
    /// Completion XP flows into the global level exactly once per quest per
    /// day. The streak is only touched when `date` is `today`; back-logging
    /// past dates never affects it.
    pub fn log_daily_quest(
        &mut self,
        today: NaiveDate,
        date: NaiveDate,
        name: QuestName,
        update: &QuestUpdate,
    ) -> Result<QuestLogOutcome, EngineError> {
        if let Some(value) = update.value {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidValue(format!(
                    "quest {} value must be a finite non-negative number",
                    name
                )));
            }
        }

        let log = self
            .daily_logs
            .entry(date)
            .or_insert_with(|| DailyLog::new(date));
        let awarded_xp = log.apply_update(name, update);
        let quest = log.quests[&name].clone();
        let day_total_xp = log.total_xp;

        let levels_gained = if awarded_xp > 0 {
            self.level.add_xp(awarded_xp)
        } else {
            0
        };

        if date == today {
            self.streaks.record_activity(today);
        }

        Ok(QuestLogOutcome {
            quest,
            day_total_xp,
            awarded_xp,
            levels_gained,
            streaks: self.streaks.clone(),
        })
    }

    /// Record a weigh-in: the only post-creation profile mutation.
    pub fn update_current_weight(&mut self, weight_kg: f64) -> Result<(), EngineError> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(EngineError::InvalidValue(
                "weight must be a finite positive number".to_string(),
            ));
        }
        let profile = self.user_profile.as_mut().ok_or(EngineError::MissingProfile)?;
        profile.current_weight_kg = weight_kg;
        Ok(())
    }

    /// Restore the entire state to its initial values.
    pub fn reset(&mut self) {
        *self = EngineState::default();
    }
}
