/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. Deletion removes the
/// habit and its history from the collection for good.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Habit;
use crate::tools::ToolError;

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub habit_id: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Remove a habit from the collection, keeping the order of the rest
pub fn delete_habit(
    habits: &mut Vec<Habit>,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let index = habits
        .iter()
        .position(|h| h.id.as_str() == params.habit_id)
        .ok_or_else(|| ToolError::HabitNotFound {
            habit_id: params.habit_id.clone(),
        })?;

    let removed = habits.remove(index);
    tracing::debug!("Deleted habit: {} ({})", removed.name, removed.id);

    Ok(DeleteHabitResponse {
        success: true,
        message: format!("🗑️ Deleted habit '{}'", removed.name),
    })
}
