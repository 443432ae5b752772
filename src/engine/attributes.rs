// SPDX-License-Identifier: MIT

//! Hunter attributes: six fixed categories, each with a rank and score.

use serde::{Deserialize, Serialize};

/// Coarse ordinal rank attached to an attribute, E lowest.
///
/// Rank is display-oriented and independently settable from the numeric
/// score; no automatic rank-from-score promotion exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    #[default]
    E,
    D,
    C,
    B,
    A,
    S,
}

/// The six fixed attribute categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeName {
    Intelligence,
    Strength,
    Endurance,
    Agility,
    Discipline,
    Recovery,
}

impl AttributeName {
    pub const ALL: [AttributeName; 6] = [
        AttributeName::Intelligence,
        AttributeName::Strength,
        AttributeName::Endurance,
        AttributeName::Agility,
        AttributeName::Discipline,
        AttributeName::Recovery,
    ];
}

impl std::fmt::Display for AttributeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttributeName::Intelligence => "intelligence",
            AttributeName::Strength => "strength",
            AttributeName::Endurance => "endurance",
            AttributeName::Agility => "agility",
            AttributeName::Discipline => "discipline",
            AttributeName::Recovery => "recovery",
        };
        write!(f, "{}", name)
    }
}

/// One attribute record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Display rank (E..S)
    #[serde(default)]
    pub rank: Rank,
    /// Numeric score, >= 0
    #[serde(default)]
    pub score: f64,
    /// Date of the last attribute re-test, if any
    #[serde(default)]
    pub last_test: Option<chrono::NaiveDate>,
    /// Rolling 30-day metric (discipline only)
    #[serde(default)]
    pub rolling_30_day: Option<f64>,
    /// Weekly average metric (recovery only)
    #[serde(default)]
    pub weekly_avg: Option<f64>,
}

impl Default for Attribute {
    fn default() -> Self {
        Self {
            rank: Rank::E,
            score: 0.0,
            last_test: None,
            rolling_30_day: None,
            weekly_avg: None,
        }
    }
}

/// The full attribute set. All six exist at all times; none may be removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub intelligence: Attribute,
    pub strength: Attribute,
    pub endurance: Attribute,
    pub agility: Attribute,
    pub discipline: Attribute,
    pub recovery: Attribute,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            intelligence: Attribute::default(),
            strength: Attribute::default(),
            endurance: Attribute::default(),
            agility: Attribute::default(),
            discipline: Attribute {
                rolling_30_day: Some(0.0),
                ..Attribute::default()
            },
            recovery: Attribute {
                weekly_avg: Some(0.0),
                ..Attribute::default()
            },
        }
    }
}

impl Attributes {
    pub fn get(&self, name: AttributeName) -> &Attribute {
        match name {
            AttributeName::Intelligence => &self.intelligence,
            AttributeName::Strength => &self.strength,
            AttributeName::Endurance => &self.endurance,
            AttributeName::Agility => &self.agility,
            AttributeName::Discipline => &self.discipline,
            AttributeName::Recovery => &self.recovery,
        }
    }

    /// Replace one attribute record by name.
    pub fn set(&mut self, name: AttributeName, attribute: Attribute) {
        let slot = match name {
            AttributeName::Intelligence => &mut self.intelligence,
            AttributeName::Strength => &mut self.strength,
            AttributeName::Endurance => &mut self.endurance,
            AttributeName::Agility => &mut self.agility,
            AttributeName::Discipline => &mut self.discipline,
            AttributeName::Recovery => &mut self.recovery,
        };
        *slot = attribute;
    }
}
