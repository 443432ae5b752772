// SPDX-License-Identifier: MIT

//! Progression engine: leveling, XP, streaks, attributes, and the
//! day-indexed quest log.
//!
//! Everything here is pure in-memory state manipulation; persistence and
//! wall-clock reads live at the route boundary.

pub mod attributes;
pub mod level;
pub mod quest;
pub mod state;
pub mod streaks;

pub use attributes::{Attribute, AttributeName, Attributes, Rank};
pub use level::{next_level_xp, Level};
pub use quest::{DailyLog, DailyQuest, QuestName, QuestUpdate};
pub use state::{EngineError, EngineState, QuestLogOutcome};
pub use streaks::Streaks;
