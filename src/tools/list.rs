/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::analytics::{DailySummary, MetricsEngine};
use crate::domain::{Habit, HabitMetrics, HabitType};

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub emoji: String,
    #[serde(rename = "type")]
    pub habit_type: HabitType,
    pub metrics: HabitMetrics,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub summary: DailySummary,
    pub message: String,
}

/// List every habit in display order with today's metrics
pub fn list_habits<Tz: TimeZone>(
    habits: &[Habit],
    engine: &MetricsEngine,
    now: &DateTime<Tz>,
) -> ListHabitsResponse {
    let summaries: Vec<HabitSummary> = habits
        .iter()
        .map(|habit| HabitSummary {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            emoji: habit.emoji.clone(),
            habit_type: habit.habit_type,
            metrics: engine.habit_metrics(habit, now),
        })
        .collect();

    let summary = engine.daily_summary(habits, now);

    let message = if summaries.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let header = format!(
            "📋 **Habits for {}** ({} of {} done)\n\n",
            summary.today, summary.completed_today, summary.total_habits
        );
        let lines = summaries
            .iter()
            .map(|h| {
                let today = match h.habit_type {
                    HabitType::Check if h.metrics.completed_today => "✅ done".to_string(),
                    HabitType::Check => "⬜ not done".to_string(),
                    HabitType::Count => format!("{}/{}", h.metrics.today_count, h.metrics.goal),
                };
                format!(
                    "{} **{}** [{}] ({})\n   Today: {} | 🔥 Streak: {} | 🏆 Best: {}",
                    h.emoji,
                    h.name,
                    h.habit_type,
                    h.habit_id,
                    today,
                    h.metrics.current_streak,
                    h.metrics.best_streak
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("{}{}", header, lines)
    };

    ListHabitsResponse {
        habits: summaries,
        summary,
        message,
    }
}
