//! Interface to the real-time clock hardware.

use crate::{CalendarDate, DstRule, Weekday};

/// Failure reported by the clock hardware.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The clock is not running or not initialised.
    #[error("Clock is not enabled")]
    NotEnabled,

    /// The clock cannot represent the value it was given.
    #[error("Clock rejected the value: {0}")]
    Rejected(String),

    /// Bus or driver failure.
    #[error("Clock access failed: {0}")]
    Io(String),
}

/// The real-time clock as seen by the console: the system of record for the
/// current time and the daylight-saving schedule.
pub trait ClockStore {
    /// Current date and time.
    ///
    /// # Errors
    /// Returns `StoreError` if the clock cannot be read.
    fn read(&mut self) -> Result<CalendarDate, StoreError>;

    /// Sets the date and time. `weekday` is always derived from `date`.
    ///
    /// # Errors
    /// Returns `StoreError` if the clock refuses the write.
    fn write(&mut self, date: &CalendarDate, weekday: Weekday) -> Result<(), StoreError>;

    /// Whether daylight saving is in effect right now.
    fn is_dst_active(&mut self) -> bool;

    /// Programs both DST transitions in one call.
    ///
    /// # Errors
    /// Returns `StoreError` if the clock refuses the schedule.
    fn set_dst(&mut self, start: &DstRule, end: &DstRule) -> Result<(), StoreError>;

    /// Whether the clock is already running, e.g. kept alive by a backup battery.
    fn is_enabled(&mut self) -> bool;
}

impl<T: ClockStore + ?Sized> ClockStore for &mut T {
    fn read(&mut self) -> Result<CalendarDate, StoreError> {
        (**self).read()
    }

    fn write(&mut self, date: &CalendarDate, weekday: Weekday) -> Result<(), StoreError> {
        (**self).write(date, weekday)
    }

    fn is_dst_active(&mut self) -> bool {
        (**self).is_dst_active()
    }

    fn set_dst(&mut self, start: &DstRule, end: &DstRule) -> Result<(), StoreError> {
        (**self).set_dst(start, end)
    }

    fn is_enabled(&mut self) -> bool {
        (**self).is_enabled()
    }
}
