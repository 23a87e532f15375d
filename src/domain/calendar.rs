/// Day-key calendar
///
/// Every piece of habit history is keyed by a local calendar day rendered as
/// `YYYY-MM-DD`. The day does not have to roll over at midnight: with a
/// start-of-day hour of 4, anything logged before 04:00 still belongs to the
/// previous day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::DomainError;

/// Start-of-day hour used when nothing else is configured
pub const DEFAULT_START_OF_DAY_HOUR: u32 = 4;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day identifier
///
/// Wraps a [`NaiveDate`] so that only well-formed keys can exist. Ordering
/// follows the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Build a key from year/month/day, returning `None` for impossible dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The calendar day before this one
    pub fn previous(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Whole days from `self` to `later` (negative if `later` is earlier)
    pub fn days_until(&self, later: &DayKey) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded fields, keys must be exactly YYYY-MM-DD
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(DomainError::InvalidDayKey(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|_| DomainError::InvalidDayKey(s.to_string()))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Map an instant to the day it counts toward
///
/// The instant's own time zone supplies the wall clock. If the local hour is
/// before `start_of_day_hour` the previous calendar day is used. The shift is
/// a calendar-day step rather than a 24 hour subtraction, so a daylight-saving
/// transition never skips or repeats a day.
pub fn day_key<Tz: TimeZone>(instant: &DateTime<Tz>, start_of_day_hour: u32) -> DayKey {
    let local = instant.naive_local();
    let date = local.date();
    if local.hour() < start_of_day_hour {
        // NaiveDate::MIN has no predecessor
        DayKey(date.pred_opt().unwrap_or(date))
    } else {
        DayKey(date)
    }
}

/// The last `n` day keys, oldest first, ending with today's key
pub fn last_n_days_keys<Tz: TimeZone>(
    n: usize,
    now: &DateTime<Tz>,
    start_of_day_hour: u32,
) -> Vec<DayKey> {
    let mut keys = Vec::with_capacity(n);
    let mut cursor = Some(day_key(now, start_of_day_hour));
    for _ in 0..n {
        match cursor {
            Some(day) => {
                keys.push(day);
                cursor = day.previous();
            }
            None => break,
        }
    }
    keys.reverse();
    keys
}
