// SPDX-License-Identifier: MIT

//! User profile model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User profile, created once at onboarding.
///
/// `current_weight_kg` is the only field mutated afterward, exclusively by
/// the weigh-in operation. Absence of a profile means the user has not
/// completed onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque identity from the auth provider, immutable
    pub user_id: String,
    /// Height in cm
    pub height_cm: f64,
    /// Weight at onboarding, kg
    pub start_weight_kg: f64,
    /// Latest weigh-in, kg
    pub current_weight_kg: f64,
    /// Goal weight, kg
    pub goal_weight_kg: f64,
    /// Calendar date the journey started, immutable
    pub start_date: NaiveDate,
}
