// SPDX-License-Identifier: MIT

//! Services module - external AI advisory clients.

pub mod nutrition;
pub mod vision;

pub use nutrition::{NutritionClient, NutritionEstimate};
pub use vision::{BodyCompositionEstimate, VisionClient};
