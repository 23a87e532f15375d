/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Habit, HabitId, HabitType, DEFAULT_COLOR_VALUE, DEFAULT_EMOJI};
use crate::tools::update::{parse_goal_input, DEFAULT_GOAL_INPUT};
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// Emoji shown next to the habit (optional)
    pub emoji: Option<String>,
    /// ARGB color value (optional)
    pub color_value: Option<i64>,
    /// "check" for done/not done, "count" for progress toward a daily goal (default: check)
    #[serde(rename = "type")]
    pub habit_type: Option<String>,
    /// Daily goal for count habits, as text (invalid or non-positive values become 8)
    pub goal: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

/// Create a new habit and append it to the collection
pub fn create_habit(
    habits: &mut Vec<Habit>,
    params: CreateHabitParams,
    now: DateTime<Utc>,
) -> Result<CreateHabitResponse, ToolError> {
    let name = params.name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidHabitName("Habit name cannot be empty".to_string()).into());
    }

    let habit_type = match params.habit_type.as_deref() {
        Some(raw) => raw.parse::<HabitType>()?,
        None => HabitType::Check,
    };

    let goal_count = match (habit_type, params.goal.as_deref()) {
        (_, Some(raw)) => Some(parse_goal_input(raw)),
        (HabitType::Count, None) => Some(DEFAULT_GOAL_INPUT),
        (HabitType::Check, None) => None,
    };

    let emoji = params
        .emoji
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EMOJI.to_string());

    let habit = Habit::new(
        HabitId::generate(),
        name.to_string(),
        emoji,
        params.color_value.unwrap_or(DEFAULT_COLOR_VALUE),
        habit_type,
        goal_count,
        now,
    );
    let habit_id = habit.id.to_string();

    tracing::debug!("Created habit: {} ({})", habit.name, habit_id);
    let message = format!(
        "✅ Created habit '{} {}'! Ready to start your streak!",
        habit.emoji, habit.name
    );
    habits.push(habit);

    Ok(CreateHabitResponse {
        success: true,
        habit_id,
        message,
    })
}
