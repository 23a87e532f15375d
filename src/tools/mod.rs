/// Habit tools exposed over MCP
///
/// Each tool works on the in-memory collection and returns a response with a
/// user-facing message. Saving afterwards is the server's job.

pub mod create;
pub mod delete;
pub mod list;
pub mod progress;
pub mod status;
pub mod theme;
pub mod update;

// Re-export tool functions for easy access
pub use create::*;
pub use delete::*;
pub use list::*;
pub use progress::*;
pub use status::*;
pub use theme::*;
pub use update::*;

use thiserror::Error;

use crate::domain::{DomainError, Habit};
use crate::storage::StorageError;

/// Errors a tool call can report back to the client
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Look up a habit by id for modification
pub(crate) fn find_habit_mut<'a>(
    habits: &'a mut [Habit],
    habit_id: &str,
) -> Result<&'a mut Habit, ToolError> {
    habits
        .iter_mut()
        .find(|h| h.id.as_str() == habit_id)
        .ok_or_else(|| ToolError::HabitNotFound {
            habit_id: habit_id.to_string(),
        })
}

/// Look up a habit by id
pub(crate) fn find_habit<'a>(habits: &'a [Habit], habit_id: &str) -> Result<&'a Habit, ToolError> {
    habits
        .iter()
        .find(|h| h.id.as_str() == habit_id)
        .ok_or_else(|| ToolError::HabitNotFound {
            habit_id: habit_id.to_string(),
        })
}
