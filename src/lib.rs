//! Serial console for a real-time clock.
//!
//! Operators type dates as `HH MM SS dd mm yyyy` over a serial line. The
//! crate validates them against the Gregorian calendar, derives the weekday
//! with Zeller's congruence, and programs the clock's time and its two-rule
//! daylight-saving schedule. The hardware sits behind [`ByteSource`] and
//! [`ClockStore`].

mod consts;
mod prelude;
mod types;

pub mod console;
pub mod dst;
pub mod line;
pub mod store;

#[cfg(test)]
mod testing;

pub use console::{
    ConsoleConfig, DstReport, Error, Session, TimeSetOutcome, configure_dst, set_new_time,
};
pub use consts::*;
pub use dst::{DstConfigState, DstEvent, DstFormat, DstOutcome, DstRule, DstSetup};
pub use line::{ByteSource, InputLine, LineReader};
pub use store::{ClockStore, StoreError};
pub use types::{Weekday, day_of_week, days_in_month, is_leap_year, week_of_month};

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A wall-clock date and time that has passed calendar validation.
///
/// Values only exist transiently: parsed from operator input or read back
/// from the clock store, then handed off or displayed. The clock store is the
/// system of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")]
#[serde(try_from = "DateTimeFields", into = "DateTimeFields")]
pub struct CalendarDate {
    year:   u32,
    month:  u8,
    day:    u8,
    hour:   u8,
    minute: u8,
    second: u8,
}

/// Operator input that could not be turned into numbers.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Empty input line")]
    EmptyInput,
    #[display(fmt = "Expected {} fields, found {found}", DATE_TIME_FIELDS)]
    FieldCount { found: usize },
    #[display(fmt = "Not a number: {_0:?}")]
    InvalidNumber(String),
}

impl std::error::Error for ParseError {}

/// A parsed value outside its calendar range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("Invalid second: {0} (must be 0-{max})", max = MAX_SECOND)]
    InvalidSecond(i32),
    #[error("Invalid minute: {0} (must be 0-{max})", max = MAX_MINUTE)]
    InvalidMinute(i32),
    #[error("Invalid hour: {0} (must be 0-{max})", max = MAX_HOUR)]
    InvalidHour(i32),
    #[error("Invalid month: {0} (must be 1-{max})", max = MAX_MONTH)]
    InvalidMonth(i32),
    #[error("Invalid year: {0} (must be positive)")]
    InvalidYear(i64),
    #[error("Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { day: i32, month: u8, year: u32 },
}

/// Recoverable input failures.
///
/// Workflows resolve these at their own boundary: the operator is told and
/// the workflow returns without touching the clock.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Timed out waiting for input")]
    Timeout,

    #[error("Invalid format: {0}")]
    Format(#[from] ParseError),

    #[error(transparent)]
    Range(#[from] RangeError),

    /// The DST format keystroke was neither fixed nor relative.
    #[error("Unknown DST format choice: {0:?}")]
    UnknownFormat(char),
}

/// Checks a candidate date/time against field ranges and the real length of
/// the month, leap years included.
///
/// Seconds and minutes are accepted up to and including 60.
pub fn validate(second: i32, minute: i32, hour: i32, day: i32, month: i32, year: i32) -> bool {
    CalendarDate::from_fields(second, minute, hour, day, month, year).is_ok()
}

impl CalendarDate {
    /// Creates a validated date/time from typed components
    ///
    /// # Errors
    /// Returns `RangeError` naming the first field that is out of range.
    pub fn new(
        year: u32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, RangeError> {
        Self::check(
            second.into(),
            minute.into(),
            hour.into(),
            day.into(),
            month.into(),
            year,
        )
    }

    /// Validates raw parsed integers, in the order the validator receives them.
    ///
    /// Negative values can never be a clock field and are rejected with the
    /// field's range error.
    ///
    /// # Errors
    /// Returns `RangeError` naming the first field that is out of range.
    pub fn from_fields(
        second: i32,
        minute: i32,
        hour: i32,
        day: i32,
        month: i32,
        year: i32,
    ) -> Result<Self, RangeError> {
        let year = u32::try_from(year).map_err(|_| RangeError::InvalidYear(year.into()))?;
        Self::check(second, minute, hour, day, month, year)
    }

    fn check(
        second: i32,
        minute: i32,
        hour: i32,
        day: i32,
        month: i32,
        year: u32,
    ) -> Result<Self, RangeError> {
        let second = bounded(second, MAX_SECOND).ok_or(RangeError::InvalidSecond(second))?;
        let minute = bounded(minute, MAX_MINUTE).ok_or(RangeError::InvalidMinute(minute))?;
        let hour = bounded(hour, MAX_HOUR).ok_or(RangeError::InvalidHour(hour))?;
        let month = bounded(month, MAX_MONTH)
            .filter(|&m| m >= JANUARY)
            .ok_or(RangeError::InvalidMonth(month))?;
        if year == 0 {
            return Err(RangeError::InvalidYear(0));
        }

        let max_day = days_in_month(month, year);
        let day = bounded(day, max_day)
            .filter(|&d| d >= MIN_DAY)
            .ok_or(RangeError::InvalidDay { day, month, year })?;

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Midnight on 1 January 2000, written when no initial time is entered
    pub const fn default_epoch() -> Self {
        Self {
            year:   DEFAULT_YEAR,
            month:  JANUARY,
            day:    MIN_DAY,
            hour:   0,
            minute: 0,
            second: 0,
        }
    }

    pub const fn year(&self) -> u32 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Day of the week, recomputed from the date on every call
    pub fn weekday(&self) -> Weekday {
        day_of_week(self.day, self.month, self.year)
    }

    /// Week of the month under the DST rule convention, see [`week_of_month`]
    pub fn week_of_month(&self) -> u8 {
        week_of_month(self.day, self.month, self.year)
    }
}

fn bounded(value: i32, max: u8) -> Option<u8> {
    u8::try_from(value).ok().filter(|&v| v <= max)
}

impl FromStr for CalendarDate {
    type Err = InputError;

    /// Parses the operator format `HH MM SS dd mm yyyy`.
    ///
    /// Fields are separated by exactly one space each; leading zeros are
    /// optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::EmptyInput.into());
        }

        let parts: Vec<&str> = s.split(FIELD_DELIMITER).collect();
        if parts.len() != DATE_TIME_FIELDS {
            return Err(ParseError::FieldCount { found: parts.len() }.into());
        }

        let mut values = [0_i32; DATE_TIME_FIELDS];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse::<i32>()
                .map_err(|_| ParseError::InvalidNumber((*part).to_owned()))?;
        }
        let [hour, minute, second, day, month, year] = values;

        Ok(Self::from_fields(second, minute, hour, day, month, year)?)
    }
}

/// Plain field layout used for serde; validated on the way in
#[derive(Serialize, Deserialize)]
struct DateTimeFields {
    year:   u32,
    month:  u8,
    day:    u8,
    hour:   u8,
    minute: u8,
    second: u8,
}

impl TryFrom<DateTimeFields> for CalendarDate {
    type Error = RangeError;

    fn try_from(f: DateTimeFields) -> Result<Self, Self::Error> {
        Self::new(f.year, f.month, f.day, f.hour, f.minute, f.second)
    }
}

impl From<CalendarDate> for DateTimeFields {
    fn from(date: CalendarDate) -> Self {
        Self {
            year:   date.year,
            month:  date.month,
            day:    date.day,
            hour:   date.hour,
            minute: date.minute,
            second: date.second,
        }
    }
}
