// SPDX-License-Identifier: MIT

//! Streak counters: consecutive days with quest activity.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Streak state. `current` counts consecutive days ending today or
/// yesterday; `longest` is its historical maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
    /// Most recent day credited to the streak, if any
    pub last_active: Option<NaiveDate>,
}

impl Streaks {
    /// Credit `today` to the streak.
    ///
    /// Continues the streak when the last active day was yesterday, leaves it
    /// alone on a same-day repeat, and otherwise restarts at 1. Logging for
    /// past dates must never reach this method.
    pub fn record_activity(&mut self, today: NaiveDate) {
        let yesterday = today.checked_sub_days(Days::new(1));

        if self.last_active.is_some() && self.last_active == yesterday {
            self.current += 1;
        } else if self.last_active != Some(today) {
            self.current = 1;
        }
        self.last_active = Some(today);

        if self.current > self.longest {
            self.longest = self.current;
        }
    }
}
