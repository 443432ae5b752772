// SPDX-License-Identifier: MIT

//! Persistence layer (JSON blob store).

pub mod store;

pub use store::BlobStore;

/// Document/collection names within a user's storage slot.
pub mod collections {
    /// Full engine-state snapshot
    pub const STATE: &str = "state";
    pub const WORKOUTS: &str = "workouts";
    pub const MEALS: &str = "meals";
    pub const SLEEP_LOGS: &str = "sleep_logs";
    pub const CREATINE_LOGS: &str = "creatine_logs";
    pub const WEIGHTS: &str = "weights";
    pub const DOCUMENTS: &str = "documents";
}
