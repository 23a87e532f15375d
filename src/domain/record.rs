/// JSON wire form of a habit
///
/// Writing is a plain serde derive over [`HabitRecord`]. Reading goes field by
/// field over a `serde_json::Value` so that one bad field falls back to its
/// default instead of throwing away the habit, or the whole collection.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::habit::{DEFAULT_COLOR_VALUE, DEFAULT_EMOJI};
use crate::domain::{clamp_count, DayKey, Habit, HabitId, HabitType};

/// Serialized shape of a habit, field names as stored on disk
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub emoji: &'a str,
    pub color_value: i64,
    #[serde(rename = "type")]
    pub habit_type: HabitType,
    pub goal_count: Option<i64>,
    pub created_at: String,
    pub completed_days: &'a BTreeSet<DayKey>,
    pub day_counts: &'a BTreeMap<DayKey, u32>,
}

impl<'a> From<&'a Habit> for HabitRecord<'a> {
    fn from(habit: &'a Habit) -> Self {
        Self {
            id: habit.id.as_str(),
            name: &habit.name,
            emoji: &habit.emoji,
            color_value: habit.color_value,
            habit_type: habit.habit_type,
            goal_count: habit.goal_count,
            created_at: habit.created_at.to_rfc3339(),
            completed_days: &habit.completed_days,
            day_counts: &habit.day_counts,
        }
    }
}

impl Habit {
    /// Render this habit in its stored JSON form
    pub fn to_json(&self) -> Value {
        // Only strings, integers and string-keyed maps go in, which cannot fail
        serde_json::to_value(HabitRecord::from(self)).unwrap_or(Value::Null)
    }

    /// Rebuild a habit from its stored JSON form, defaulting bad fields
    ///
    /// `now` is used when `createdAt` is missing or unreadable. Returns `None`
    /// only when the value is not an object or has no string `id`.
    pub fn from_json(value: &Value, now: DateTime<Utc>) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("id")?.as_str()?;

        Some(Self {
            id: HabitId::new(id),
            name: string_field(obj, "name").unwrap_or_default(),
            emoji: string_field(obj, "emoji").unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
            color_value: obj
                .get("colorValue")
                .and_then(integer_value)
                .unwrap_or(DEFAULT_COLOR_VALUE),
            habit_type: obj
                .get("type")
                .and_then(Value::as_str)
                .map(HabitType::from_wire)
                .unwrap_or_default(),
            goal_count: obj.get("goalCount").and_then(integer_value),
            created_at: obj
                .get("createdAt")
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
                .unwrap_or(now),
            completed_days: completed_days_field(obj),
            day_counts: day_counts_field(obj),
        })
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Integers pass through, floats are truncated, everything else is absent
fn integer_value(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|n| n.min(i64::MAX as u64) as i64))
        .or_else(|| value.as_f64().map(|f| f as i64))
}

/// Accept RFC 3339 and the zone-less ISO-8601 form (read as local time)
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

fn completed_days_field(obj: &Map<String, Value>) -> BTreeSet<DayKey> {
    let Some(days) = obj.get("completedDays").and_then(Value::as_array) else {
        return BTreeSet::new();
    };
    days.iter()
        .filter_map(Value::as_str)
        .filter_map(|raw| match raw.parse::<DayKey>() {
            Ok(day) => Some(day),
            Err(e) => {
                tracing::warn!("Dropping completed day: {}", e);
                None
            }
        })
        .collect()
}

fn day_counts_field(obj: &Map<String, Value>) -> BTreeMap<DayKey, u32> {
    let Some(counts) = obj.get("dayCounts").and_then(Value::as_object) else {
        return BTreeMap::new();
    };
    counts
        .iter()
        .filter_map(|(raw, value)| match raw.parse::<DayKey>() {
            Ok(day) => Some((day, clamp_count(integer_value(value).unwrap_or(0)))),
            Err(e) => {
                tracing::warn!("Dropping day count: {}", e);
                None
            }
        })
        .collect()
}
