// SPDX-License-Identifier: MIT

//! Daily quests and the per-day quest log.
//!
//! Each calendar day gets one `DailyLog`, created lazily on the first quest
//! event for that date and never deleted. The five mandatory quest types are
//! always present with their default XP rewards and targets; kickboxing is
//! optional and appears only once logged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily quest types. Unknown names are unrepresentable: payloads naming
/// anything else fail deserialization before the engine is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestName {
    Workout,
    Calories,
    Protein,
    Creatine,
    Sleep,
    Kickboxing,
}

impl QuestName {
    /// The quest types present in every daily log from creation.
    pub const MANDATORY: [QuestName; 5] = [
        QuestName::Workout,
        QuestName::Calories,
        QuestName::Protein,
        QuestName::Creatine,
        QuestName::Sleep,
    ];

    /// Whether logged values accumulate across calls (meals add up) rather
    /// than replace the prior value.
    pub fn accumulates(self) -> bool {
        matches!(self, QuestName::Calories | QuestName::Protein)
    }

    /// Default quest record for this type.
    pub fn default_quest(self) -> DailyQuest {
        match self {
            QuestName::Workout => DailyQuest::with_target(100, 1.0),
            QuestName::Calories => DailyQuest::with_progress(50, 3500.0),
            QuestName::Protein => DailyQuest::with_progress(50, 160.0),
            QuestName::Creatine => DailyQuest::with_target(20, 1.0),
            QuestName::Sleep => DailyQuest::with_target(30, 7.0),
            QuestName::Kickboxing => DailyQuest::binary(0),
        }
    }
}

impl std::fmt::Display for QuestName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuestName::Workout => "workout",
            QuestName::Calories => "calories",
            QuestName::Protein => "protein",
            QuestName::Creatine => "creatine",
            QuestName::Sleep => "sleep",
            QuestName::Kickboxing => "kickboxing",
        };
        write!(f, "{}", name)
    }
}

/// One quest record within a daily log.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyQuest {
    /// Whether the quest counts as completed today
    pub completed: bool,
    /// XP reward, granted once on first completion
    pub xp: u64,
    /// Accumulated numeric progress (e.g. calories logged so far)
    pub value: Option<f64>,
    /// Goal that triggers auto-completion when `value` reaches it;
    /// absent for binary quests
    pub target: Option<f64>,
}

impl DailyQuest {
    fn with_target(xp: u64, target: f64) -> Self {
        Self {
            completed: false,
            xp,
            value: None,
            target: Some(target),
        }
    }

    fn with_progress(xp: u64, target: f64) -> Self {
        Self {
            value: Some(0.0),
            ..Self::with_target(xp, target)
        }
    }

    fn binary(xp: u64) -> Self {
        Self {
            completed: false,
            xp,
            value: None,
            target: None,
        }
    }
}

/// Caller-supplied fields for a quest logging event. Any subset may be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestUpdate {
    pub completed: Option<bool>,
    pub xp: Option<u64>,
    pub value: Option<f64>,
}

/// One log per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub quests: BTreeMap<QuestName, DailyQuest>,
    /// Sum of `xp` over quests currently marked completed
    #[serde(default)]
    pub total_xp: u64,
}

impl DailyLog {
    /// Fresh log with the mandatory quest set fully populated.
    pub fn new(date: NaiveDate) -> Self {
        let quests = QuestName::MANDATORY
            .into_iter()
            .map(|name| (name, name.default_quest()))
            .collect();
        Self {
            date,
            quests,
            total_xp: 0,
        }
    }

    /// Apply a quest update and return the XP award for this call.
    ///
    /// Values accumulate for calories/protein and replace otherwise;
    /// completion is the explicit flag OR value-reaches-target; the day's
    /// total is recomputed in full. XP is awarded only on a not-completed to
    /// completed transition, so re-logging an already completed quest never
    /// pays twice.
    pub fn apply_update(&mut self, name: QuestName, update: &QuestUpdate) -> u64 {
        let quest = self.quests.entry(name).or_insert_with(|| name.default_quest());
        let was_completed = quest.completed;

        let new_value = if name.accumulates() {
            Some(quest.value.unwrap_or(0.0) + update.value.unwrap_or(0.0))
        } else {
            update.value.or(quest.value)
        };

        if let Some(xp) = update.xp {
            quest.xp = xp;
        }
        quest.value = new_value;
        quest.completed = match quest.target {
            Some(target) => {
                update.completed.unwrap_or(false)
                    || new_value.is_some_and(|v| v >= target)
            }
            None => update.completed.unwrap_or(false),
        };

        let awarded = if quest.completed && !was_completed {
            quest.xp
        } else {
            0
        };

        self.total_xp = self
            .quests
            .values()
            .filter(|q| q.completed)
            .map(|q| q.xp)
            .sum();

        awarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_log_has_all_mandatory_quests() {
        let log = DailyLog::new(date("2024-03-01"));
        assert_eq!(log.quests.len(), 5);

        let workout = &log.quests[&QuestName::Workout];
        assert_eq!((workout.xp, workout.target), (100, Some(1.0)));
        let calories = &log.quests[&QuestName::Calories];
        assert_eq!((calories.xp, calories.target, calories.value), (50, Some(3500.0), Some(0.0)));
        let protein = &log.quests[&QuestName::Protein];
        assert_eq!((protein.xp, protein.target, protein.value), (50, Some(160.0), Some(0.0)));
        let creatine = &log.quests[&QuestName::Creatine];
        assert_eq!((creatine.xp, creatine.target), (20, Some(1.0)));
        let sleep = &log.quests[&QuestName::Sleep];
        assert_eq!((sleep.xp, sleep.target), (30, Some(7.0)));

        assert!(log.quests.values().all(|q| !q.completed));
        assert_eq!(log.total_xp, 0);
    }

    #[test]
    fn test_calorie_values_accumulate() {
        let mut log = DailyLog::new(date("2024-03-01"));

        let first = log.apply_update(
            QuestName::Calories,
            &QuestUpdate {
                value: Some(2000.0),
                ..QuestUpdate::default()
            },
        );
        assert_eq!(first, 0); // 2000 < 3500
        assert!(!log.quests[&QuestName::Calories].completed);

        let second = log.apply_update(
            QuestName::Calories,
            &QuestUpdate {
                value: Some(1600.0),
                ..QuestUpdate::default()
            },
        );
        let quest = &log.quests[&QuestName::Calories];
        assert_eq!(quest.value, Some(3600.0));
        assert!(quest.completed);
        assert_eq!(second, 50);

        // Re-logging more calories never pays again
        let third = log.apply_update(
            QuestName::Calories,
            &QuestUpdate {
                value: Some(100.0),
                ..QuestUpdate::default()
            },
        );
        assert_eq!(third, 0);
        assert_eq!(log.quests[&QuestName::Calories].value, Some(3700.0));
    }

    #[test]
    fn test_non_accumulating_value_replaces() {
        let mut log = DailyLog::new(date("2024-03-01"));
        log.apply_update(
            QuestName::Sleep,
            &QuestUpdate {
                value: Some(5.0),
                ..QuestUpdate::default()
            },
        );
        assert_eq!(log.quests[&QuestName::Sleep].value, Some(5.0));

        let awarded = log.apply_update(
            QuestName::Sleep,
            &QuestUpdate {
                value: Some(8.0),
                ..QuestUpdate::default()
            },
        );
        assert_eq!(log.quests[&QuestName::Sleep].value, Some(8.0));
        assert!(log.quests[&QuestName::Sleep].completed);
        assert_eq!(awarded, 30);
    }

    #[test]
    fn test_value_persists_when_not_supplied() {
        let mut log = DailyLog::new(date("2024-03-01"));
        log.apply_update(
            QuestName::Workout,
            &QuestUpdate {
                value: Some(1.0),
                ..QuestUpdate::default()
            },
        );
        assert!(log.quests[&QuestName::Workout].completed);

        // Empty update: value unchanged, still completed, no re-award
        let awarded = log.apply_update(QuestName::Workout, &QuestUpdate::default());
        assert_eq!(awarded, 0);
        assert_eq!(log.quests[&QuestName::Workout].value, Some(1.0));
        assert!(log.quests[&QuestName::Workout].completed);
    }

    #[test]
    fn test_explicit_completed_flag() {
        let mut log = DailyLog::new(date("2024-03-01"));
        let awarded = log.apply_update(
            QuestName::Workout,
            &QuestUpdate {
                completed: Some(true),
                xp: Some(100),
                ..QuestUpdate::default()
            },
        );
        assert_eq!(awarded, 100);
        assert_eq!(log.total_xp, 100);
    }

    #[test]
    fn test_kickboxing_created_lazily() {
        let mut log = DailyLog::new(date("2024-03-01"));
        assert!(!log.quests.contains_key(&QuestName::Kickboxing));

        let awarded = log.apply_update(
            QuestName::Kickboxing,
            &QuestUpdate {
                completed: Some(true),
                xp: Some(75),
                ..QuestUpdate::default()
            },
        );
        assert_eq!(awarded, 75);
        assert!(log.quests.contains_key(&QuestName::Kickboxing));
        assert_eq!(log.total_xp, 75);
    }

    #[test]
    fn test_total_xp_recomputed_each_call() {
        let mut log = DailyLog::new(date("2024-03-01"));
        log.apply_update(
            QuestName::Workout,
            &QuestUpdate {
                completed: Some(true),
                ..QuestUpdate::default()
            },
        );
        log.apply_update(
            QuestName::Creatine,
            &QuestUpdate {
                value: Some(1.0),
                ..QuestUpdate::default()
            },
        );
        assert_eq!(log.total_xp, 120);
    }

    #[test]
    fn test_quest_name_rejects_unknown() {
        assert!(serde_json::from_str::<QuestName>("\"yoga\"").is_err());
        let ok: QuestName = serde_json::from_str("\"kickboxing\"").unwrap();
        assert_eq!(ok, QuestName::Kickboxing);
    }
}
