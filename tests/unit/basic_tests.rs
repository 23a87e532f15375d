/// Basic unit tests to verify core functionality through the public API
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use habit_tracker::*;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    fn evening(y: i32, m: u32, d: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, 20, 0, 0)
            .unwrap()
    }

    fn new_habit(habit_type: HabitType, goal: Option<i64>) -> Habit {
        Habit::new(
            HabitId::new("test"),
            "Test Habit".to_string(),
            "🔥".to_string(),
            0,
            habit_type,
            goal,
            Utc::now(),
        )
    }

    #[test]
    fn test_current_streak_of_n_trailing_days() {
        let now = evening(2024, 7, 10);
        let mut habit = new_habit(HabitType::Check, None);

        // done for the last 5 days, not the day before
        for offset in 0..5 {
            habit.toggle_today(&(now - Duration::days(offset)), DEFAULT_START_OF_DAY_HOUR);
        }
        habit.toggle_today(&(now - Duration::days(7)), DEFAULT_START_OF_DAY_HOUR);

        let today = day_key(&now, DEFAULT_START_OF_DAY_HOUR);
        assert_eq!(compute_current_streak(&habit, today), 5);
        assert_eq!(compute_best_streak(&habit), 5);
    }

    #[test]
    fn test_count_habit_full_cycle() {
        let now = evening(2024, 7, 10);
        let mut habit = new_habit(HabitType::Count, Some(3));
        let today = day_key(&now, 4);

        habit.increment_today(&now, 4);
        habit.increment_today(&now, 4);
        assert!(!is_completed_on(&habit, &today));

        // toggling a count habit adds progress
        habit.toggle_today(&now, 4);
        assert!(is_completed_on(&habit, &today));
        assert_eq!(compute_current_streak(&habit, today), 1);

        habit.decrement_today(&now, 4);
        assert!(!is_completed_on(&habit, &today));
        assert_eq!(compute_current_streak(&habit, today), 0);
    }

    #[test]
    fn test_heatmap_width_and_order() {
        let now = evening(2024, 7, 10);
        let mut habit = new_habit(HabitType::Check, None);
        habit.toggle_today(&now, 4);

        let tiles = heatmap_tiles(&habit, 8, &now, 4);
        assert_eq!(tiles.len(), 56);
        assert_eq!(tiles.last(), Some(&true));
        assert!(tiles[..55].iter().all(|t| !t));
    }

    #[test]
    fn test_json_round_trip_through_public_api() {
        let mut habit = new_habit(HabitType::Count, Some(-3));
        habit.increment_on("2024-07-01".parse().unwrap());
        habit.completed_days.insert("2024-07-02".parse().unwrap());

        let restored = Habit::from_json(&habit.to_json(), Utc::now()).unwrap();
        assert_eq!(restored.effective_goal(), habit.effective_goal());
        assert_eq!(restored, habit);
    }

    #[test]
    fn test_metrics_engine_creation() {
        let engine = MetricsEngine::from_config(&TrackerConfig::with_data_dir("/tmp"));
        assert_eq!(engine.start_of_day_hour(), 4);
        assert_eq!(engine.heatmap_weeks(), 8);
    }
}
