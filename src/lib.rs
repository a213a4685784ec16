//! # Cronline
//!
//! Cronline parses five-field cron expressions and walks their occurrences forward or
//! backward in time.
//!
//! ## Features
//! - Parses the classic `minute hour day-of-month month day-of-week` format, including
//!   lists, ranges, steps, month and weekday names and `@` macros.
//! - Finds the next or previous occurrence relative to any reference instant, one at a
//!   time, `n` at a time, or lazily through an iterator.
//! - Combines day of month and day of week the traditional way (either may match) or
//!   strictly (both must match).
//! - Builds result instants through a pluggable [`TimeSource`], so any chrono time zone
//!   or a custom instant type can be used.
//! - Every search is bounded, an expression that can never fire fails with
//!   [`CronError::NoOccurrenceFound`] instead of looping.
//!
//! ## Example
//! The following example parses an expression and finds the next two occurrences after a
//! given instant:
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use cronline::Schedule;
//!
//! // Every day at 09:30
//! let schedule = Schedule::new("30 9 * * *", Utc).expect("Successful parsing");
//!
//! let from = Utc.with_ymd_and_hms(2011, 8, 31, 10, 15, 0).unwrap();
//! let next = schedule.next(&from).unwrap();
//! assert_eq!(next, Utc.with_ymd_and_hms(2011, 9, 1, 9, 30, 0).unwrap());
//!
//! let upcoming = schedule.next_n(&from, 2).unwrap();
//! assert_eq!(upcoming[1], Utc.with_ymd_and_hms(2011, 9, 2, 9, 30, 0).unwrap());
//! ```
//!
//! Results are whole minutes, strictly after (`next`) or strictly before (`previous`) the
//! reference instant.
//!
//! ## Pattern
//!
//! ```javascript
//! // ┌──────────────── minute (0 - 59)
//! // │ ┌────────────── hour (0 - 23)
//! // │ │ ┌──────────── day of month (1 - 31)
//! // │ │ │ ┌────────── month (1 - 12, JAN-DEC)
//! // │ │ │ │ ┌──────── day of week (0 - 6, SUN-SAT)
//! // │ │ │ │ │         (0 to 6 are Sunday to Saturday; 7 is Sunday, the same as 0)
//! // │ │ │ │ │
//! // * * * * *
//! ```
//!
//! | Field        | Required | Allowed values  | Allowed special characters |
//! |--------------|----------|-----------------|----------------------------|
//! | Minutes      | Yes      | 0-59            | * , - /                    |
//! | Hours        | Yes      | 0-23            | * , - /                    |
//! | Day of Month | Yes      | 1-31            | * , - /                    |
//! | Month        | Yes      | 1-12 or JAN-DEC | * , - /                    |
//! | Day of Week  | Yes      | 0-7 or SUN-SAT  | * , - /                    |
//!
//! Names are case-insensitive. The macros `@yearly`, `@annually`, `@monthly`, `@weekly`,
//! `@daily`, `@midnight` and `@hourly` expand to their usual five-field equivalents.
//!
//! When both day fields are restricted, a day matches if it matches either of them, so
//! `0 1 13 * FRI` fires on every 13th and on every Friday. Build the parser with
//! [`CronParserBuilder::dom_and_dow`](parser::CronParserBuilder::dom_and_dow) to require
//! both instead, which makes the same expression fire only on Friday the 13th.

mod component;
mod cursor;
pub mod errors;
mod iterator;
pub mod parser;
mod pattern;
mod schedule;
mod time_source;

pub use component::{FieldKind, FieldSet};
pub use errors::CronError;
pub use iterator::CronIterator;
pub use pattern::CronPattern;
pub use schedule::Schedule;
pub use time_source::{Naive, TimeSource};

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use strum::EnumIs;

use cursor::Cursor;
use parser::CronParser;

/// Default bound on outer iterations of one occurrence search.
///
/// Roughly one iteration is spent per skipped day, so this covers a couple of centuries of
/// day-by-day scanning, far more than any satisfiable expression needs.
pub const DEFAULT_SEARCH_LIMIT: u32 = 100_000;

/// Which way an occurrence search walks through time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum Direction {
    Forward,
    Backward,
}

// The Cron struct represents a parsed cron expression and provides the occurrence search
// over local wall-clock times.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cron {
    pub pattern: CronPattern, // Parsed cron pattern
    search_limit: u32,
}

impl Cron {
    /// The iteration bound this expression was parsed with.
    pub fn search_limit(&self) -> u32 {
        self.search_limit
    }

    /// Evaluates if a local wall-clock time matches the expression.
    ///
    /// Seconds are ignored. The day fields are combined the way the expression was
    /// parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use cronline::Cron;
    ///
    /// let cron: Cron = "0 9 1 1 *".parse().expect("Couldn't parse cron string");
    /// let time = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// assert!(cron.is_time_matching(&time));
    /// ```
    pub fn is_time_matching(&self, time: &NaiveDateTime) -> bool {
        self.pattern.minute_match(time.minute())
            && self.pattern.hour_match(time.hour())
            && self.pattern.month_match(time.month())
            && self
                .pattern
                .day_match(time.day(), time.weekday().num_days_from_sunday())
    }

    /// Finds the first matching minute strictly after `start_time`.
    pub fn find_next_occurrence(
        &self,
        start_time: &NaiveDateTime,
    ) -> Result<NaiveDateTime, CronError> {
        self.find_occurrence(start_time, Direction::Forward, self.pattern.dom_and_dow)
    }

    /// Finds the last matching minute strictly before `start_time`.
    pub fn find_previous_occurrence(
        &self,
        start_time: &NaiveDateTime,
    ) -> Result<NaiveDateTime, CronError> {
        self.find_occurrence(start_time, Direction::Backward, self.pattern.dom_and_dow)
    }

    /// Searches for the nearest matching minute in `direction`, combining the day fields
    /// with AND when `dom_and_dow` is set and with OR otherwise.
    ///
    /// The search starts one minute after (or before) `start_time` truncated to the
    /// minute, and moves field by field: month, day, hour, minute. Whenever a field does
    /// not match, the candidate jumps to the next allowed value of that field, carries
    /// into the higher fields if needed, and the checks start over.
    ///
    /// # Errors
    ///
    /// - `CronError::NoOccurrenceFound`: the search used up [`Cron::search_limit`]
    ///   iterations, or walked out of the representable calendar range.
    pub fn find_occurrence(
        &self,
        start_time: &NaiveDateTime,
        direction: Direction,
        dom_and_dow: bool,
    ) -> Result<NaiveDateTime, CronError> {
        let step = match direction {
            Direction::Forward => Duration::minutes(1),
            Direction::Backward => Duration::minutes(-1),
        };
        let seed = start_time
            .with_second(0)
            .and_then(|time| time.with_nanosecond(0))
            .and_then(|time| time.checked_add_signed(step))
            .ok_or(CronError::NoOccurrenceFound)?;

        let mut cursor = Cursor::from_naive(&seed);
        let found = match direction {
            Direction::Forward => self.walk_forward(&mut cursor, dom_and_dow)?,
            Direction::Backward => self.walk_backward(&mut cursor, dom_and_dow)?,
        };

        if !found {
            tracing::debug!(
                pattern = %self.pattern,
                limit = self.search_limit,
                ?direction,
                ?start_time,
                "occurrence search exhausted its limit"
            );
            return Err(CronError::NoOccurrenceFound);
        }

        cursor.to_naive().ok_or(CronError::NoOccurrenceFound)
    }

    // Returns Ok(false) when the iteration limit runs out.
    fn walk_forward(&self, cursor: &mut Cursor, dom_and_dow: bool) -> Result<bool, CronError> {
        let pattern = &self.pattern;
        let (hours, minutes) = (&pattern.hours, &pattern.minutes);

        for _ in 0..self.search_limit {
            if !pattern.month_match(cursor.month) {
                cursor.next_month(&pattern.months, hours, minutes);
                continue;
            }

            let weekday = cursor.weekday().ok_or(CronError::NoOccurrenceFound)?;
            if !pattern.day_match_with(cursor.day, weekday, dom_and_dow) {
                cursor.next_day(hours, minutes);
                continue;
            }

            match hours.next_from(cursor.hour) {
                Some(hour) if hour == cursor.hour => {}
                Some(hour) => {
                    cursor.hour = hour;
                    cursor.minute = minutes.first();
                }
                None => {
                    cursor.next_day(hours, minutes);
                    continue;
                }
            }

            match minutes.next_from(cursor.minute) {
                Some(minute) => cursor.minute = minute,
                None => {
                    cursor.next_hour(hours, minutes);
                    continue;
                }
            }

            return Ok(true);
        }
        Ok(false)
    }

    fn walk_backward(&self, cursor: &mut Cursor, dom_and_dow: bool) -> Result<bool, CronError> {
        let pattern = &self.pattern;
        let (hours, minutes) = (&pattern.hours, &pattern.minutes);

        for _ in 0..self.search_limit {
            if !pattern.month_match(cursor.month) {
                cursor.prev_month(&pattern.months, hours, minutes);
                continue;
            }

            let weekday = cursor.weekday().ok_or(CronError::NoOccurrenceFound)?;
            if !pattern.day_match_with(cursor.day, weekday, dom_and_dow) {
                cursor.prev_day(hours, minutes);
                continue;
            }

            match hours.prev_from(cursor.hour) {
                Some(hour) if hour == cursor.hour => {}
                Some(hour) => {
                    cursor.hour = hour;
                    cursor.minute = minutes.last();
                }
                None => {
                    cursor.prev_day(hours, minutes);
                    continue;
                }
            }

            match minutes.prev_from(cursor.minute) {
                Some(minute) => cursor.minute = minute,
                None => {
                    cursor.prev_hour(hours, minutes);
                    continue;
                }
            }

            return Ok(true);
        }
        Ok(false)
    }
}

// Enables creating a Cron instance from a string slice with the default parser.
impl FromStr for Cron {
    type Err = CronError;

    fn from_str(cron_string: &str) -> Result<Cron, CronError> {
        CronParser::new().parse(cron_string)
    }
}

impl fmt::Display for Cron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.pattern, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Cron {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.pattern.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Cron {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct CronVisitor;

        impl serde::de::Visitor<'_> for CronVisitor {
            type Value = Cron;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid cron expression")
            }

            fn visit_str<E>(self, value: &str) -> Result<Cron, E>
            where
                E: serde::de::Error,
            {
                Cron::from_str(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(CronVisitor)
    }
}
