/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool. It is the editing
/// boundary: bad input here is recovered by keeping the previous value or
/// falling back to a default instead of failing the whole edit.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitType, MAX_COUNT};
use crate::tools::{find_habit_mut, ToolError};

/// Goal used when goal input is missing, unparsable or not positive
pub const DEFAULT_GOAL_INPUT: i64 = 8;

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: String,
    /// New name (blank keeps the current name)
    pub name: Option<String>,
    pub emoji: Option<String>,
    /// New ARGB color value
    pub color_value: Option<i64>,
    /// "check" or "count"; history for both types is kept when switching
    #[serde(rename = "type")]
    pub habit_type: Option<String>,
    /// New daily goal as text (invalid or non-positive values become 8)
    pub goal: Option<String>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Parse a goal typed by the user
///
/// Anything that is not a positive integer becomes [`DEFAULT_GOAL_INPUT`].
pub fn parse_goal_input(raw: &str) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(goal) if goal > 0 => goal.min(MAX_COUNT as i64),
        _ => DEFAULT_GOAL_INPUT,
    }
}

/// Apply an edit to an existing habit
pub fn update_habit(
    habits: &mut [Habit],
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    // Parse before touching the habit so a bad type leaves it unchanged
    let habit_type = params
        .habit_type
        .as_deref()
        .map(str::parse::<HabitType>)
        .transpose()?;

    let habit = find_habit_mut(habits, &params.habit_id)?;

    if let Some(name) = params.name {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            tracing::debug!("Ignoring blank name for habit {}", habit.id);
        } else {
            habit.name = trimmed.to_string();
        }
    }

    if let Some(emoji) = params.emoji {
        let trimmed = emoji.trim();
        if !trimmed.is_empty() {
            habit.emoji = trimmed.to_string();
        }
    }

    if let Some(color_value) = params.color_value {
        habit.color_value = color_value;
    }

    let previous_type = habit.habit_type;
    if let Some(habit_type) = habit_type {
        habit.habit_type = habit_type;
    }

    if let Some(goal) = params.goal {
        habit.goal_count = Some(parse_goal_input(&goal));
    } else if previous_type == HabitType::Check
        && habit.habit_type == HabitType::Count
        && habit.goal_count.is_none()
    {
        habit.goal_count = Some(DEFAULT_GOAL_INPUT);
    }

    tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);

    let message = if previous_type != habit.habit_type {
        format!("🔁 Switched '{}' to a {} habit", habit.name, habit.habit_type)
    } else {
        format!("✅ Updated habit '{}'", habit.name)
    };

    Ok(UpdateHabitResponse { success: true, message })
}
