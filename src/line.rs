//! Timeout-bounded line input from a serial byte source.

use std::time::Duration;

use log::debug;

use crate::{
    CalendarDate, DATE_TIME_DELIMITERS, FIELD_DELIMITER, InputError, LINE_CAPACITY, ParseError,
    prelude::*,
};

/// Source of single bytes from the operator, typically a UART receiver.
pub trait ByteSource {
    /// Waits up to `timeout` for one byte; `None` means nothing arrived in time.
    fn get_byte(&mut self, timeout: Duration) -> Option<u8>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn get_byte(&mut self, timeout: Duration) -> Option<u8> {
        (**self).get_byte(timeout)
    }
}

/// One line of operator input, without its terminator.
///
/// Holds at most [`LINE_CAPACITY`] characters and counts the field delimiters
/// seen, which callers use to check the field count before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Display)]
#[display(fmt = "{text}")]
pub struct InputLine {
    text:       String,
    delimiters: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self {
            text:       String::with_capacity(LINE_CAPACITY),
            delimiters: 0,
        }
    }

    /// Appends a character; returns `false` and leaves the line untouched
    /// once it is full.
    pub fn push(&mut self, ch: char) -> bool {
        if self.is_full() {
            return false;
        }
        if ch == FIELD_DELIMITER {
            self.delimiters += 1;
        }
        self.text.push(ch);
        true
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of [`FIELD_DELIMITER`] characters in the line
    pub const fn delimiter_count(&self) -> usize {
        self.delimiters
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the line reached capacity before any terminator arrived
    pub fn is_full(&self) -> bool {
        self.len() >= LINE_CAPACITY
    }

    /// Parses an `HH MM SS dd mm yyyy` line.
    ///
    /// The delimiter count is checked first so a line with the wrong number
    /// of fields is rejected before any number is parsed.
    ///
    /// # Errors
    /// Returns `InputError::Format` for a malformed line and
    /// `InputError::Range` for a date that does not exist.
    pub fn parse_date_time(&self) -> Result<CalendarDate, InputError> {
        if self.delimiters != DATE_TIME_DELIMITERS {
            return Err(ParseError::FieldCount {
                found: self.delimiters + 1,
            }
            .into());
        }
        self.text.parse()
    }
}

impl From<&str> for InputLine {
    fn from(s: &str) -> Self {
        let mut line = Self::new();
        for ch in s.chars() {
            if !line.push(ch) {
                break;
            }
        }
        line
    }
}

/// Remaining wait for one read, drawn down one slice per idle poll.
#[derive(Debug, Clone, Copy)]
struct Budget {
    remaining: Duration,
    slice:     Duration,
}

impl Budget {
    /// Accounts for one poll that returned nothing.
    fn spend(&mut self) -> Result<(), InputError> {
        if self.remaining <= self.slice {
            return Err(InputError::Timeout);
        }
        self.remaining -= self.slice;
        Ok(())
    }
}

/// Reads lines and single keystrokes from a [`ByteSource`], never waiting
/// longer than the budget the caller passes in.
#[derive(Debug)]
pub struct LineReader<S> {
    source:          S,
    byte_timeout:    Duration,
    /// Last byte consumed was a carriage return
    after_cr:        bool,
    /// The last keystroke or full line may still be followed by its own
    /// terminator, which the next read swallows
    skip_terminator: bool,
}

impl<S: ByteSource> LineReader<S> {
    /// Creates a reader polling `source` in slices of `byte_timeout`.
    /// A zero slice is raised to one millisecond so budgets always drain.
    pub fn new(source: S, byte_timeout: Duration) -> Self {
        Self {
            source,
            byte_timeout: byte_timeout.max(Duration::from_millis(1)),
            after_cr: false,
            skip_terminator: false,
        }
    }

    pub const fn byte_timeout(&self) -> Duration {
        self.byte_timeout
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn budget(&self, total: Duration) -> Budget {
        Budget {
            remaining: total,
            slice:     self.byte_timeout,
        }
    }

    /// Collects characters up to a carriage return or newline.
    ///
    /// The terminator is consumed but not stored. A newline directly after
    /// the carriage return that ended the previous read is skipped, so CR LF
    /// terminals do not produce empty lines. The same goes for the Enter
    /// typed after a command keystroke or after a line that filled up. A
    /// line that fills up before any terminator arrives is returned as is;
    /// check [`InputLine::is_full`] to tell the two apart.
    ///
    /// # Errors
    /// Returns `InputError::Timeout` once `budget` is used up by idle polls.
    pub fn read_line(&mut self, budget: Duration) -> Result<InputLine, InputError> {
        let mut budget = self.budget(budget);
        let mut line = InputLine::new();

        loop {
            if line.is_full() {
                debug!("input line reached {LINE_CAPACITY} characters without a terminator");
                self.skip_terminator = true;
                return Ok(line);
            }

            let Some(byte) = self.source.get_byte(self.byte_timeout) else {
                budget.spend().inspect_err(|_| {
                    debug!("line read timed out after {} characters", line.len());
                })?;
                continue;
            };

            let after_cr = std::mem::replace(&mut self.after_cr, byte == b'\r');
            match byte {
                b'\n' if after_cr => {}
                b'\r' | b'\n' if self.skip_terminator => self.skip_terminator = false,
                b'\r' | b'\n' => return Ok(line),
                _ => {
                    self.skip_terminator = false;
                    line.push(char::from(byte));
                }
            }
        }
    }

    /// Waits for a single command keystroke.
    ///
    /// Carriage returns and newlines are skipped, so a terminator left over
    /// from a previous line is never taken as a command. Each skipped
    /// terminator costs a slice of the budget like an idle poll.
    ///
    /// # Errors
    /// Returns `InputError::Timeout` once `budget` is used up by idle polls
    /// and skipped terminators.
    pub fn read_byte(&mut self, budget: Duration) -> Result<u8, InputError> {
        let mut budget = self.budget(budget);

        loop {
            match self.source.get_byte(self.byte_timeout) {
                None => budget.spend()?,
                Some(byte @ (b'\r' | b'\n')) => {
                    self.after_cr = byte == b'\r';
                    self.skip_terminator = false;
                    budget.spend()?;
                }
                Some(byte) => {
                    self.after_cr = false;
                    self.skip_terminator = true;
                    return Ok(byte);
                }
            }
        }
    }
}
