// SPDX-License-Identifier: MIT

//! Level and XP accounting.
//!
//! The XP curve is `next_level_xp(l) = round(1000 * 1.5^(l - 1))`, so
//! 1000 XP advances from level 1, 1500 from level 2, 2250 from level 3.

use serde::{Deserialize, Serialize};

const BASE_LEVEL_XP: u64 = 1000;
const LEVEL_XP_GROWTH: f64 = 1.5;

/// XP required to advance from `level` to `level + 1`.
pub fn next_level_xp(level: u32) -> u64 {
    if level <= 1 {
        return BASE_LEVEL_XP;
    }
    (BASE_LEVEL_XP as f64 * LEVEL_XP_GROWTH.powi(level as i32 - 1)).round() as u64
}

/// Current level and XP totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Level {
    /// Current level, starts at 1
    pub current_level: u32,
    /// XP accumulated toward the next level, always < next_level_xp
    pub current_xp: u64,
    /// XP threshold to advance from the current level
    pub next_level_xp: u64,
    /// Lifetime XP total, monotonically non-decreasing
    pub total_xp: u64,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            next_level_xp: BASE_LEVEL_XP,
            total_xp: 0,
        }
    }
}

impl Level {
    /// Add XP, consuming level thresholds as long as the pool covers them.
    ///
    /// Returns the number of levels gained. `amount == 0` is a no-op that
    /// completes with zero loop iterations. Both the pool and the lifetime
    /// total saturate at `u64::MAX` so totals never wrap backwards.
    pub fn add_xp(&mut self, amount: u64) -> u32 {
        let start_level = self.current_level;
        let mut pool = self.current_xp.saturating_add(amount);

        while pool >= self.next_level_xp {
            pool -= self.next_level_xp;
            self.current_level += 1;
            self.next_level_xp = next_level_xp(self.current_level);
        }

        self.current_xp = pool;
        self.total_xp = self.total_xp.saturating_add(amount);
        self.current_level - start_level
    }
}
