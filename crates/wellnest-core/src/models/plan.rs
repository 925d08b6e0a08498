//! Wellness plan and day-completion models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of days covered by every generated plan.
pub const PLAN_HORIZON_DAYS: u8 = 7;

/// The two tracked plan categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Meal,
    Workout,
}

impl PlanType {
    pub const ALL: [PlanType; 2] = [PlanType::Meal, PlanType::Workout];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Meal => "meal",
            PlanType::Workout => "workout",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "meal" => Ok(PlanType::Meal),
            "workout" => Ok(PlanType::Workout),
            other => Err(format!("Unknown plan type: {}", other)),
        }
    }
}

/// A day within the plan horizon (1..=7).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayNumber(u8);

impl DayNumber {
    /// Returns `None` outside the plan horizon.
    pub fn new(day: u8) -> Option<Self> {
        (1..=PLAN_HORIZON_DAYS).contains(&day).then_some(Self(day))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every day of the horizon, in order.
    pub fn all() -> impl Iterator<Item = DayNumber> {
        (1..=PLAN_HORIZON_DAYS).map(DayNumber)
    }
}

impl TryFrom<u8> for DayNumber {
    type Error = String;

    fn try_from(day: u8) -> Result<Self, Self::Error> {
        DayNumber::new(day).ok_or_else(|| format!("Day {} is outside the 1..={} plan horizon", day, PLAN_HORIZON_DAYS))
    }
}

impl From<DayNumber> for u8 {
    fn from(day: DayNumber) -> Self {
        day.0
    }
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A "day done" marker. Absence of an entry means not completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionEntry {
    pub plan_type: PlanType,
    pub day: DayNumber,
    /// When the day was marked complete (RFC 3339)
    pub completed_at: String,
}

impl CompletionEntry {
    /// New entry stamped with the current time.
    pub fn now(plan_type: PlanType, day: DayNumber) -> Self {
        Self {
            plan_type,
            day,
            completed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A generated meal or workout plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellnessPlan {
    pub id: String,
    pub user_id: String,
    pub plan_type: PlanType,
    /// Free-form text from the AI generator, display only
    pub plan_text: String,
    /// At most one active plan per user and type
    pub is_active: bool,
    pub created_at: String,
}

impl WellnessPlan {
    /// Create a new active plan.
    pub fn new(user_id: &str, plan_type: PlanType, plan_text: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            plan_type,
            plan_text,
            is_active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
