//! Calendar-day resolution for task timestamps.
//!
//! # Responsibility
//! - Map epoch-millisecond timestamps to canonical day keys.
//! - Render the short time labels shown in day rows.
//! - Supply "now" through the [`Clock`] seam.
//!
//! # Invariants
//! - Day keys carry no time component: `%b %-d, %Y` (`"Jun 1, 2024"`).
//! - Two timestamps are on the same day iff their day keys are equal.

use crate::model::day::DayKey;
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DAY_KEY_FORMAT: &str = "%b %-d, %Y";
const TIME_LABEL_FORMAT: &str = "%-I:%M %p";

/// Calendar conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    /// Timestamp cannot be represented as a calendar date.
    TimestampOutOfRange(i64),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimestampOutOfRange(value) => {
                write!(f, "timestamp {value} is outside the supported calendar range")
            }
        }
    }
}

impl Error for CalendarError {}

/// Time zone used to resolve local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarZone {
    /// Device time zone, including daylight-saving transitions.
    Local,
    /// Fixed offset from UTC.
    Fixed(FixedOffset),
}

/// Resolves day keys and display labels in one time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCalendar {
    zone: CalendarZone,
}

impl DayCalendar {
    pub fn local() -> Self {
        Self {
            zone: CalendarZone::Local,
        }
    }

    pub fn fixed(offset: FixedOffset) -> Self {
        Self {
            zone: CalendarZone::Fixed(offset),
        }
    }

    pub fn utc() -> Self {
        Self::fixed(Utc.fix())
    }

    pub fn zone(&self) -> CalendarZone {
        self.zone
    }

    /// Returns the canonical day key for a timestamp.
    pub fn day_key(&self, epoch_ms: i64) -> Result<DayKey, CalendarError> {
        self.format(epoch_ms, DAY_KEY_FORMAT).map(DayKey::new)
    }

    /// Returns the short wall-clock label for a timestamp, e.g. `"9:00 AM"`.
    pub fn time_label(&self, epoch_ms: i64) -> Result<String, CalendarError> {
        self.format(epoch_ms, TIME_LABEL_FORMAT)
    }

    /// Returns `"<start>-<end>"` labels, e.g. `"9:00 AM-9:30 AM"`.
    pub fn time_range_label(&self, start_ms: i64, end_ms: i64) -> Result<String, CalendarError> {
        Ok(format!(
            "{}-{}",
            self.time_label(start_ms)?,
            self.time_label(end_ms)?
        ))
    }

    fn format(&self, epoch_ms: i64, pattern: &str) -> Result<String, CalendarError> {
        let instant = DateTime::<Utc>::from_timestamp_millis(epoch_ms)
            .ok_or(CalendarError::TimestampOutOfRange(epoch_ms))?;
        let text = match self.zone {
            CalendarZone::Local => instant.with_timezone(&Local).format(pattern).to_string(),
            CalendarZone::Fixed(offset) => {
                instant.with_timezone(&offset).format(pattern).to_string()
            }
        };
        Ok(text)
    }
}

impl Default for DayCalendar {
    fn default() -> Self {
        Self::local()
    }
}

/// Source of the current instant.
pub trait Clock {
    /// Current time as Unix epoch milliseconds.
    fn now_epoch_ms(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_epoch_ms(&self) -> i64 {
        (**self).now_epoch_ms()
    }
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_ms(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarError, Clock, DayCalendar, FixedClock};
    use chrono::{FixedOffset, TimeZone, Utc};

    fn utc_ms(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn day_key_uses_abbreviated_unpadded_format() {
        let calendar = DayCalendar::utc();
        let key = calendar.day_key(utc_ms(2024, 6, 1, 9, 0)).unwrap();
        assert_eq!(key.as_str(), "Jun 1, 2024");
    }

    #[test]
    fn day_key_follows_configured_offset() {
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let calendar = DayCalendar::fixed(minus_five);
        let key = calendar.day_key(utc_ms(2024, 6, 1, 2, 0)).unwrap();
        assert_eq!(key.as_str(), "May 31, 2024");
    }

    #[test]
    fn time_range_label_renders_twelve_hour_clock() {
        let calendar = DayCalendar::utc();
        let label = calendar
            .time_range_label(utc_ms(2024, 6, 1, 9, 0), utc_ms(2024, 6, 1, 13, 30))
            .unwrap();
        assert_eq!(label, "9:00 AM-1:30 PM");
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        let err = DayCalendar::utc().day_key(i64::MAX).unwrap_err();
        assert_eq!(err, CalendarError::TimestampOutOfRange(i64::MAX));
    }

    #[test]
    fn fixed_clock_returns_pinned_instant_through_reference() {
        fn read(clock: impl Clock) -> i64 {
            clock.now_epoch_ms()
        }

        let clock = FixedClock(42);
        assert_eq!(read(&clock), 42);
        assert_eq!(read(clock), 42);
    }
}
