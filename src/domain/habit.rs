/// Habit entity and related functionality
///
/// This module defines the core Habit struct: identity, display attributes,
/// the type tag, and both history fields. The daily mutations (toggle,
/// increment, decrement) live here too.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::calendar::day_key;
use crate::domain::{clamp_count, effective_goal, DayKey, HabitId, HabitType, MAX_COUNT};

/// Emoji shown for habits that never picked one
pub const DEFAULT_EMOJI: &str = "✅";

/// ARGB color used for habits that never picked one
pub const DEFAULT_COLOR_VALUE: i64 = 0xFF4C_AF50;

/// A habit the user wants to do every day
///
/// Both `completed_days` and `day_counts` are kept no matter which type is
/// active. Only the field matching `habit_type` drives completion, but
/// switching the type back and forth never loses history.
#[derive(Debug, Clone, PartialEq)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Drink water")
    pub name: String,
    pub emoji: String,
    /// ARGB color value, opaque to the core
    pub color_value: i64,
    /// Which history field decides completion
    pub habit_type: HabitType,
    /// Daily goal for count habits, stored as given
    pub goal_count: Option<i64>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Days marked done (check habits)
    pub completed_days: BTreeSet<DayKey>,
    /// Progress per day (count habits)
    pub day_counts: BTreeMap<DayKey, u32>,
}

impl Habit {
    /// Create a new habit with empty history
    ///
    /// The identifier is taken as given. Name validation belongs to the
    /// editing layer, so nothing is rejected here.
    pub fn new(
        id: HabitId,
        name: String,
        emoji: String,
        color_value: i64,
        habit_type: HabitType,
        goal_count: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            emoji,
            color_value,
            habit_type,
            goal_count,
            created_at,
            completed_days: BTreeSet::new(),
            day_counts: BTreeMap::new(),
        }
    }

    /// The goal used for completion checks, always in `[1, MAX_COUNT]`
    pub fn effective_goal(&self) -> u32 {
        effective_goal(self.goal_count)
    }

    /// Progress recorded for a day, zero when absent
    pub fn count_on(&self, day: &DayKey) -> u32 {
        self.day_counts.get(day).copied().unwrap_or(0)
    }

    /// Flip a check habit's completion for a day
    ///
    /// Count habits route this to [`Habit::increment_on`], so a tap on a count
    /// habit adds one unit of progress.
    pub fn toggle_on(&mut self, day: DayKey) {
        match self.habit_type {
            HabitType::Check => {
                if !self.completed_days.remove(&day) {
                    self.completed_days.insert(day);
                }
            }
            HabitType::Count => self.increment_on(day),
        }
    }

    /// Add one unit of progress for a day, capped at [`MAX_COUNT`]
    pub fn increment_on(&mut self, day: DayKey) {
        let count = self.day_counts.entry(day).or_insert(0);
        *count = (*count).saturating_add(1).min(MAX_COUNT);
    }

    /// Remove one unit of progress for a day, never going below zero
    ///
    /// An absent day is materialized with an explicit zero.
    pub fn decrement_on(&mut self, day: DayKey) {
        let count = self.day_counts.entry(day).or_insert(0);
        *count = clamp_count(*count as i64 - 1);
    }

    pub fn toggle_today<Tz: TimeZone>(&mut self, now: &DateTime<Tz>, start_of_day_hour: u32) {
        self.toggle_on(day_key(now, start_of_day_hour));
    }

    pub fn increment_today<Tz: TimeZone>(&mut self, now: &DateTime<Tz>, start_of_day_hour: u32) {
        self.increment_on(day_key(now, start_of_day_hour));
    }

    pub fn decrement_today<Tz: TimeZone>(&mut self, now: &DateTime<Tz>, start_of_day_hour: u32) {
        self.decrement_on(day_key(now, start_of_day_hour));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit(habit_type: HabitType, goal: Option<i64>) -> Habit {
        Habit::new(
            HabitId::new("h1"),
            "Drink water".to_string(),
            "💧".to_string(),
            DEFAULT_COLOR_VALUE,
            habit_type,
            goal,
            Utc::now(),
        )
    }

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_toggle_check_habit() {
        let mut h = habit(HabitType::Check, None);
        let d = day("2024-05-01");

        h.toggle_on(d);
        assert!(h.completed_days.contains(&d));

        h.toggle_on(d);
        assert!(!h.completed_days.contains(&d));
        assert!(h.day_counts.is_empty());
    }

    #[test]
    fn test_toggle_on_count_habit_increments() {
        // toggling a count habit adds progress instead of flipping a flag
        let mut h = habit(HabitType::Count, Some(3));
        let d = day("2024-05-01");

        h.toggle_on(d);
        h.toggle_on(d);
        assert_eq!(h.count_on(&d), 2);
        assert!(h.completed_days.is_empty());
    }

    #[test]
    fn test_decrement_never_goes_negative() {
        let mut h = habit(HabitType::Count, Some(3));
        let d = day("2024-05-01");

        for _ in 0..5 {
            h.decrement_on(d);
        }
        assert_eq!(h.count_on(&d), 0);
        // absent key is materialized at zero
        assert_eq!(h.day_counts.get(&d), Some(&0));
    }

    #[test]
    fn test_increment_then_decrement_restores_count() {
        let mut h = habit(HabitType::Count, Some(3));
        let d = day("2024-05-01");
        h.day_counts.insert(d, 7);

        h.increment_on(d);
        h.decrement_on(d);
        assert_eq!(h.count_on(&d), 7);
    }

    #[test]
    fn test_increment_caps_at_max() {
        let mut h = habit(HabitType::Count, None);
        let d = day("2024-05-01");
        h.day_counts.insert(d, MAX_COUNT);

        h.increment_on(d);
        assert_eq!(h.count_on(&d), MAX_COUNT);
    }

    #[test]
    fn test_type_switch_keeps_both_histories() {
        let mut h = habit(HabitType::Check, Some(2));
        let d = day("2024-05-01");
        h.toggle_on(d);

        h.habit_type = HabitType::Count;
        h.increment_on(d);

        h.habit_type = HabitType::Check;
        assert!(h.completed_days.contains(&d));
        assert_eq!(h.count_on(&d), 1);
    }

    #[test]
    fn test_today_variants_respect_start_of_day() {
        use chrono::FixedOffset;

        let mut h = habit(HabitType::Check, None);
        let early = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 2, 2, 30, 0)
            .unwrap();

        h.toggle_today(&early, 4);
        assert!(h.completed_days.contains(&day("2024-05-01")));

        h.habit_type = HabitType::Count;
        h.increment_today(&early, 0);
        h.increment_today(&early, 0);
        h.decrement_today(&early, 0);
        assert_eq!(h.count_on(&day("2024-05-02")), 1);
    }
}
