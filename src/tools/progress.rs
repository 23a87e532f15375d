/// Tools for recording today's progress
///
/// This module implements the habit_toggle, habit_increment and
/// habit_decrement MCP tools. All three act on today's key under the
/// configured start-of-day hour.

use chrono::{DateTime, TimeZone};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::MetricsEngine;
use crate::domain::{Habit, HabitMetrics, HabitType};
use crate::tools::{find_habit_mut, ToolError};

/// Which change to apply to today's record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressAction {
    Toggle,
    Increment,
    Decrement,
}

/// Parameters for the progress tools
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProgressParams {
    /// ID of the habit
    pub habit_id: String,
}

/// Response from recording progress
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub success: bool,
    pub message: String,
    pub metrics: HabitMetrics,
}

/// Apply a progress action to today's record of a habit
pub fn record_progress<Tz: TimeZone>(
    habits: &mut [Habit],
    engine: &MetricsEngine,
    action: ProgressAction,
    params: ProgressParams,
    now: &DateTime<Tz>,
) -> Result<ProgressResponse, ToolError> {
    let habit = find_habit_mut(habits, &params.habit_id)?;
    let hour = engine.start_of_day_hour();

    match action {
        ProgressAction::Toggle => habit.toggle_today(now, hour),
        ProgressAction::Increment => habit.increment_today(now, hour),
        ProgressAction::Decrement => habit.decrement_today(now, hour),
    }

    let metrics = engine.habit_metrics(habit, now);
    tracing::debug!("{:?} on habit {} for {}", action, habit.id, metrics.today);

    let progress = match habit.habit_type {
        HabitType::Check if metrics.completed_today => "Done for today".to_string(),
        HabitType::Check => "Not done yet today".to_string(),
        HabitType::Count => format!("{}/{} today", metrics.today_count, metrics.goal),
    };

    let message = format!(
        "{} {}: {} | 🔥 Current streak: {} day{} | 🏆 Best: {}",
        habit.emoji,
        habit.name,
        progress,
        metrics.current_streak,
        if metrics.current_streak == 1 { "" } else { "s" },
        metrics.best_streak
    );

    Ok(ProgressResponse {
        success: true,
        message,
        metrics,
    })
}
