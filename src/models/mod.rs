// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod profile;
pub mod records;

pub use profile::UserProfile;
pub use records::{
    CreatineRecord, DocumentRecord, MealRecord, SleepRecord, WeightRecord, WorkoutRecord,
};
