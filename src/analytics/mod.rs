/// Metrics engine bound to the tracker configuration
///
/// The streak and heatmap functions in `domain::metrics` take the start-of-day
/// hour as an argument. This wrapper carries the configured hour and heatmap
/// width so the driver does not have to thread them through every call.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::config::TrackerConfig;
use crate::domain::{day_key, heatmap_tiles, DayKey, Habit, HabitMetrics};

/// One heatmap column: seven days, oldest first
pub type HeatmapWeek = Vec<bool>;

/// Metrics engine for habit data
///
/// Holds no data of its own; every call recomputes from the habit passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsEngine {
    start_of_day_hour: u32,
    heatmap_weeks: u32,
}

/// Collection-wide progress for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub today: DayKey,
    pub total_habits: usize,
    pub completed_today: usize,
    pub longest_current_streak: u32,
}

impl MetricsEngine {
    pub fn new(start_of_day_hour: u32, heatmap_weeks: u32) -> Self {
        Self {
            start_of_day_hour,
            heatmap_weeks,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.start_of_day_hour, config.heatmap_weeks)
    }

    pub fn start_of_day_hour(&self) -> u32 {
        self.start_of_day_hour
    }

    pub fn heatmap_weeks(&self) -> u32 {
        self.heatmap_weeks
    }

    /// Today's key under the configured start-of-day hour
    pub fn today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DayKey {
        day_key(now, self.start_of_day_hour)
    }

    pub fn habit_metrics<Tz: TimeZone>(&self, habit: &Habit, now: &DateTime<Tz>) -> HabitMetrics {
        HabitMetrics::calculate(habit, now, self.start_of_day_hour)
    }

    /// Flat heatmap of the configured width, most recent day last
    pub fn heatmap<Tz: TimeZone>(&self, habit: &Habit, now: &DateTime<Tz>) -> Vec<bool> {
        heatmap_tiles(habit, self.heatmap_weeks as usize, now, self.start_of_day_hour)
    }

    /// The heatmap split into weeks, oldest week first
    pub fn heatmap_weeks_grid<Tz: TimeZone>(
        &self,
        habit: &Habit,
        now: &DateTime<Tz>,
    ) -> Vec<HeatmapWeek> {
        self.heatmap(habit, now)
            .chunks(7)
            .map(<[bool]>::to_vec)
            .collect()
    }

    /// Summarize today's progress across a whole collection
    pub fn daily_summary<Tz: TimeZone>(
        &self,
        habits: &[Habit],
        now: &DateTime<Tz>,
    ) -> DailySummary {
        let metrics: Vec<HabitMetrics> =
            habits.iter().map(|h| self.habit_metrics(h, now)).collect();
        DailySummary {
            today: self.today(now),
            total_habits: habits.len(),
            completed_today: metrics.iter().filter(|m| m.completed_today).count(),
            longest_current_streak: metrics.iter().map(|m| m.current_streak).max().unwrap_or(0),
        }
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(crate::domain::DEFAULT_START_OF_DAY_HOUR, crate::config::DEFAULT_HEATMAP_WEEKS)
    }
}
