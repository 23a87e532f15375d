/// Streak and heatmap calculations
///
/// Everything here is derived from a habit's raw history on every call.
/// Nothing is cached, so a metric can never drift from the data it came from.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::domain::calendar::{day_key, last_n_days_keys};
use crate::domain::{DayKey, Habit, HabitType};

/// Whether a habit counts as done on a given day
///
/// Check habits look at `completed_days`; count habits compare the day's
/// progress against the effective goal.
pub fn is_completed_on(habit: &Habit, day: &DayKey) -> bool {
    match habit.habit_type {
        HabitType::Check => habit.completed_days.contains(day),
        HabitType::Count => habit.count_on(day) >= habit.effective_goal(),
    }
}

/// Every day on which the habit counts as done
pub fn completed_day_keys_for_metrics(habit: &Habit) -> BTreeSet<DayKey> {
    match habit.habit_type {
        HabitType::Check => habit.completed_days.clone(),
        HabitType::Count => {
            let goal = habit.effective_goal();
            habit
                .day_counts
                .iter()
                .filter(|(_, count)| **count >= goal)
                .map(|(day, _)| *day)
                .collect()
        }
    }
}

/// Consecutive completed days ending today
///
/// Returns 0 when today is not completed. A single missed day ends the walk.
pub fn compute_current_streak(habit: &Habit, today: DayKey) -> u32 {
    let completed = completed_day_keys_for_metrics(habit);
    let mut streak = 0;
    let mut cursor = Some(today);

    while let Some(day) = cursor {
        if !completed.contains(&day) {
            break;
        }
        streak += 1;
        cursor = day.previous();
    }

    streak
}

/// Longest run of consecutive completed days anywhere in the history
pub fn compute_best_streak(habit: &Habit) -> u32 {
    // BTreeSet iterates in calendar order with duplicates already removed
    let completed = completed_day_keys_for_metrics(habit);
    let mut days = completed.iter();

    let Some(mut last) = days.next() else {
        return 0;
    };

    let mut current = 1;
    let mut best = 1;

    for day in days {
        match last.days_until(day) {
            1 => {
                current += 1;
                best = best.max(current);
            }
            gap if gap > 1 => current = 1,
            _ => {}
        }
        last = day;
    }

    best
}

/// Completion flags for the last `weeks * 7` days, oldest first
///
/// Index `w * 7 + d` is day `d` of week `w`; the final entry is today.
pub fn heatmap_tiles<Tz: TimeZone>(
    habit: &Habit,
    weeks: usize,
    now: &DateTime<Tz>,
    start_of_day_hour: u32,
) -> Vec<bool> {
    let completed = completed_day_keys_for_metrics(habit);
    last_n_days_keys(weeks * 7, now, start_of_day_hour)
        .iter()
        .map(|day| completed.contains(day))
        .collect()
}

/// Snapshot of a habit's derived numbers for one moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitMetrics {
    pub today: DayKey,
    pub completed_today: bool,
    /// Progress recorded today (count habits)
    pub today_count: u32,
    pub goal: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl HabitMetrics {
    pub fn calculate<Tz: TimeZone>(
        habit: &Habit,
        now: &DateTime<Tz>,
        start_of_day_hour: u32,
    ) -> Self {
        let today = day_key(now, start_of_day_hour);
        Self {
            today,
            completed_today: is_completed_on(habit, &today),
            today_count: habit.count_on(&today),
            goal: habit.effective_goal(),
            current_streak: compute_current_streak(habit, today),
            best_streak: compute_best_streak(habit),
        }
    }
}
