/// Tool for checking a single habit's streaks and heatmap
///
/// This module implements the habit_status MCP tool.

use chrono::{DateTime, TimeZone};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{HeatmapWeek, MetricsEngine};
use crate::domain::{Habit, HabitMetrics};
use crate::tools::{find_habit, ToolError};

const DONE_TILE: char = '■';
const MISSED_TILE: char = '□';

/// Parameters for checking habit status
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// ID of the habit
    pub habit_id: String,
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habit_id: String,
    pub name: String,
    pub metrics: HabitMetrics,
    /// Heatmap weeks, oldest first; each week is seven days, oldest first
    pub heatmap: Vec<HeatmapWeek>,
    pub message: String,
}

/// Get streaks and the completion heatmap for one habit
pub fn get_habit_status<Tz: TimeZone>(
    habits: &[Habit],
    engine: &MetricsEngine,
    params: StatusParams,
    now: &DateTime<Tz>,
) -> Result<StatusResponse, ToolError> {
    let habit = find_habit(habits, &params.habit_id)?;
    let metrics = engine.habit_metrics(habit, now);
    let heatmap = engine.heatmap_weeks_grid(habit, now);

    let message = format!(
        "{} {} ({})\n   Current streak: {} | Best: {} | Goal: {}\n\n{}",
        habit.emoji,
        habit.name,
        habit.habit_type,
        days(metrics.current_streak),
        days(metrics.best_streak),
        metrics.goal,
        render_heatmap(&heatmap)
    );

    Ok(StatusResponse {
        habit_id: habit.id.to_string(),
        name: habit.name.clone(),
        metrics,
        heatmap,
        message,
    })
}

fn days(n: u32) -> String {
    format!("{} day{}", n, if n == 1 { "" } else { "s" })
}

/// Draw weeks as columns (oldest on the left) and days as rows (oldest on top)
pub fn render_heatmap(weeks: &[HeatmapWeek]) -> String {
    (0..7)
        .map(|day| {
            weeks
                .iter()
                .map(|week| match week.get(day) {
                    Some(true) => DONE_TILE,
                    _ => MISSED_TILE,
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HabitId, HabitType};
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_render_heatmap_layout() {
        let mut old_week = vec![false; 7];
        old_week[0] = true;
        let mut new_week = vec![false; 7];
        new_week[6] = true;

        let rendered = render_heatmap(&[old_week, new_week]);
        let rows: Vec<&str> = rendered.lines().collect();

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], "■□");
        assert_eq!(rows[6], "□■");
    }

    #[test]
    fn test_status_for_habit() {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 5, 12, 0, 0)
            .unwrap();
        let mut habit = Habit::new(
            HabitId::new("s"),
            "Stretch".to_string(),
            "🧘".to_string(),
            0,
            HabitType::Check,
            None,
            Utc::now(),
        );
        habit.completed_days.insert("2024-05-05".parse().unwrap());

        let params = StatusParams { habit_id: "s".to_string() };
        let response =
            get_habit_status(&[habit], &MetricsEngine::default(), params, &now).unwrap();

        assert_eq!(response.metrics.current_streak, 1);
        assert_eq!(response.heatmap.len(), 8);
        assert!(response.heatmap[7][6]);
        assert!(response.message.contains("Current streak: 1 day |"));
        assert!(response.message.contains("Best: 1 day |"));
        assert!(response.message.ends_with('■'));
    }

    #[test]
    fn test_status_pluralizes_streaks() {
        assert_eq!(days(0), "0 days");
        assert_eq!(days(1), "1 day");
        assert_eq!(days(12), "12 days");
    }

    #[test]
    fn test_status_unknown_habit() {
        let params = StatusParams { habit_id: "x".to_string() };
        let result = get_habit_status(&[], &MetricsEngine::default(), params, &Utc::now());
        assert!(result.is_err());
    }
}
