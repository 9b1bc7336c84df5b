//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use crate::{ByteSource, CalendarDate, ClockStore, DstRule, StoreError, Weekday};

/// Byte source replaying a script of bytes and idle polls.
/// Once the script runs out every poll is idle.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<Option<u8>>,
    polls:  usize,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, s: &str) -> Self {
        self.script.extend(s.bytes().map(Some));
        self
    }

    pub fn idle(mut self, polls: usize) -> Self {
        self.script.extend(std::iter::repeat_n(None, polls));
        self
    }

    /// Entries not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Calls to `get_byte` so far
    pub const fn polls(&self) -> usize {
        self.polls
    }
}

impl ByteSource for ScriptedInput {
    fn get_byte(&mut self, _timeout: Duration) -> Option<u8> {
        self.polls += 1;
        self.script.pop_front().flatten()
    }
}

/// Clock that records every write and can be told to fail.
#[derive(Debug, Default)]
pub struct MockClock {
    pub now:        Option<CalendarDate>,
    pub enabled:    bool,
    pub dst_active: bool,
    pub fail:       bool,
    pub writes:     Vec<(CalendarDate, Weekday)>,
    pub dst_calls:  Vec<(DstRule, DstRule)>,
}

impl MockClock {
    pub fn running(now: CalendarDate) -> Self {
        Self {
            now: Some(now),
            enabled: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            enabled: true,
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            Err(StoreError::Io("bus fault".to_owned()))
        } else {
            Ok(())
        }
    }
}

impl ClockStore for MockClock {
    fn read(&mut self) -> Result<CalendarDate, StoreError> {
        self.check()?;
        self.now.ok_or(StoreError::NotEnabled)
    }

    fn write(&mut self, date: &CalendarDate, weekday: Weekday) -> Result<(), StoreError> {
        self.writes.push((*date, weekday));
        self.check()?;
        self.now = Some(*date);
        self.enabled = true;
        Ok(())
    }

    fn is_dst_active(&mut self) -> bool {
        self.dst_active
    }

    fn set_dst(&mut self, start: &DstRule, end: &DstRule) -> Result<(), StoreError> {
        self.dst_calls.push((*start, *end));
        self.check()
    }

    fn is_enabled(&mut self) -> bool {
        self.enabled
    }
}
