/// Core types and enums used throughout the domain layer
///
/// This module defines the habit identifier, the habit type tag and the numeric
/// limits that every mutation and metric calculation agrees on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Upper bound for both daily counts and count goals
pub const MAX_COUNT: u32 = 1_000_000;

/// Goal used when a count habit has no usable goal
pub const DEFAULT_GOAL: u32 = 1;

/// Unique identifier for a habit
///
/// Identifiers are opaque strings supplied by whoever creates the habit.
/// The core never checks uniqueness; that is the creator's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HabitId(pub String);

impl HabitId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier (used by the create tool)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a habit's daily completion is decided
///
/// `Check` habits are done or not done for a day. `Count` habits accumulate
/// progress and count as done once the daily goal is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    #[default]
    Check,
    Count,
}

impl HabitType {
    /// Wire name as stored in the habits document
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitType::Check => "check",
            HabitType::Count => "count",
        }
    }

    /// Lenient parse used when loading records: anything unknown is a check habit
    pub fn from_wire(s: &str) -> Self {
        match s {
            "count" => HabitType::Count,
            _ => HabitType::Check,
        }
    }
}

impl fmt::Display for HabitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitType {
    type Err = DomainError;

    /// Strict parse used for user input
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "check" => Ok(HabitType::Check),
            "count" => Ok(HabitType::Count),
            other => Err(DomainError::InvalidHabitType(other.to_string())),
        }
    }
}

/// Resolve a stored goal to the value used for completion checks
///
/// Missing, zero and negative goals fall back to [`DEFAULT_GOAL`]; anything
/// above [`MAX_COUNT`] is capped.
pub fn effective_goal(goal_count: Option<i64>) -> u32 {
    match goal_count {
        Some(goal) if goal > 0 => goal.min(MAX_COUNT as i64) as u32,
        _ => DEFAULT_GOAL,
    }
}

/// Clamp a raw count into the accepted `[0, MAX_COUNT]` range
pub fn clamp_count(value: i64) -> u32 {
    value.clamp(0, MAX_COUNT as i64) as u32
}
