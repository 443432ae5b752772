// SPDX-License-Identifier: MIT

//! LevelUp Tracker: a gamified fitness and nutrition tracking backend.
//!
//! This crate provides the API for the progression engine (XP, levels,
//! streaks, daily quests, attribute ranks), durable fitness records, and
//! AI-assisted meal and body-composition estimates.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use dashmap::DashMap;
use db::BlobStore;
use engine::EngineState;
use error::{AppError, Result};
use services::{NutritionClient, VisionClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: BlobStore,
    /// In-memory engine sessions, one per user. Between snapshot writes the
    /// in-memory state is the source of truth.
    pub sessions: DashMap<String, EngineState>,
    pub nutrition: NutritionClient,
    pub vision: VisionClient,
}

impl AppState {
    /// Ensure the user's engine session is loaded from its snapshot.
    async fn ensure_session(&self, user_id: &str) -> Result<()> {
        if self.sessions.contains_key(user_id) {
            return Ok(());
        }
        let loaded = self.store.load_state(user_id).await?.unwrap_or_default();
        self.sessions.entry(user_id.to_string()).or_insert(loaded);
        Ok(())
    }

    /// Read the user's current engine state.
    pub async fn engine_snapshot(&self, user_id: &str) -> Result<EngineState> {
        self.ensure_session(user_id).await?;
        let entry = self
            .sessions
            .get(user_id)
            .ok_or_else(|| AppError::Storage("session disappeared".to_string()))?;
        Ok(entry.value().clone())
    }

    /// Apply a mutation to the user's engine state, then write the snapshot.
    ///
    /// A failed write does not roll the mutation back: the in-memory state
    /// stays authoritative and the caller reports `persisted = false` so the
    /// UI can warn and retry on the next mutation.
    pub async fn mutate_engine<T>(
        &self,
        user_id: &str,
        mutation: impl FnOnce(&mut EngineState) -> Result<T>,
    ) -> Result<(T, bool)> {
        self.ensure_session(user_id).await?;
        let (output, snapshot) = {
            let mut entry = self
                .sessions
                .get_mut(user_id)
                .ok_or_else(|| AppError::Storage("session disappeared".to_string()))?;
            let output = mutation(entry.value_mut())?;
            (output, entry.value().clone())
        };

        let persisted = match self.store.save_state(user_id, &snapshot).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Snapshot write failed; state kept in memory");
                false
            }
        };
        Ok((output, persisted))
    }
}
