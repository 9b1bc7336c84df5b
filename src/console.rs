//! Operator console: the time-set and DST workflows, and the session that
//! routes command keystrokes to them.
//!
//! Recoverable input problems (timeouts, malformed lines, impossible dates)
//! are reported to the operator and returned inside the outcome value. Only
//! a clock failure or a broken console sink comes back as [`Error`]. The
//! caller then chooses whether to halt; these functions never retry.

use std::fmt::{self, Write};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::dst::{DstConfigState, DstEvent, DstOutcome, DstRule, DstSetup};
use crate::line::{ByteSource, LineReader};
use crate::store::{ClockStore, StoreError};
use crate::{
    BYTE_TIMEOUT_MS, CMD_CONFIGURE_DST, CMD_DST_DISABLE, CMD_DST_ENABLE, CMD_DST_QUIT,
    CMD_SET_TIME, COMMAND_TIMEOUT_MS, CalendarDate, DATE_TIME_PATTERN, INPUT_TIMEOUT_MS,
    InputError,
};

/// Writes one console line with the CR LF ending serial terminals expect.
macro_rules! say {
    ($out:expr, $($arg:tt)*) => {{
        $out.write_fmt(format_args!($($arg)*))?;
        $out.write_str("\r\n")?;
    }};
}

/// Console timing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Wait per poll of the serial line
    pub byte_timeout_ms:    u64,
    /// Budget for typing a full date/time line
    pub input_timeout_ms:   u64,
    /// Budget for a single menu keystroke
    pub command_timeout_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            byte_timeout_ms:    BYTE_TIMEOUT_MS,
            input_timeout_ms:   INPUT_TIMEOUT_MS,
            command_timeout_ms: COMMAND_TIMEOUT_MS,
        }
    }
}

impl ConsoleConfig {
    pub const fn byte_timeout(&self) -> Duration {
        Duration::from_millis(self.byte_timeout_ms)
    }

    pub const fn input_timeout(&self) -> Duration {
        Duration::from_millis(self.input_timeout_ms)
    }

    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// Failures that end a workflow without a report to the operator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The clock refused a write or a DST schedule.
    #[error("Clock store failure: {0}")]
    Store(#[from] StoreError),

    /// The console sink could not be written.
    #[error("Console output failed")]
    Console(#[from] fmt::Error),
}

/// Result of one time-set run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSetOutcome {
    Committed(CalendarDate),
    Rejected(InputError),
}

/// Result of one DST run, with the configuration state to keep for the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DstReport {
    pub state:   DstConfigState,
    pub outcome: DstOutcome,
}

fn report_rejection<W: Write>(out: &mut W, error: &InputError) -> Result<(), Error> {
    warn!("operator input rejected: {error}");
    match error {
        InputError::Timeout => say!(out, "Timeout waiting for input, nothing changed."),
        _ => say!(out, "Invalid format ({error}), nothing changed."),
    }
    Ok(())
}

fn commit_time<C, W>(clock: &mut C, out: &mut W, date: &CalendarDate) -> Result<(), Error>
where
    C: ClockStore,
    W: Write,
{
    let weekday = date.weekday();
    clock
        .write(date, weekday)
        .inspect_err(|e| warn!("clock write of {date} failed: {e}"))?;
    info!("clock set to {date} ({weekday})");
    say!(out, "RTC set to: {date} ({weekday})");
    Ok(())
}

/// Prompts for a new wall-clock time and writes it to the clock.
///
/// Nothing is written unless the line has exactly six fields and names a
/// real date. The weekday stored with it is computed from the date.
///
/// # Errors
/// Returns `Error::Store` if the clock refuses the write and
/// `Error::Console` if `out` fails.
pub fn set_new_time<S, C, W>(
    reader: &mut LineReader<S>,
    clock: &mut C,
    out: &mut W,
    budget: Duration,
) -> Result<TimeSetOutcome, Error>
where
    S: ByteSource,
    C: ClockStore,
    W: Write,
{
    say!(out, "Enter time as \"{DATE_TIME_PATTERN}\":");

    match reader.read_line(budget).and_then(|line| line.parse_date_time()) {
        Ok(date) => {
            commit_time(clock, out, &date)?;
            Ok(TimeSetOutcome::Committed(date))
        }
        Err(error) => {
            report_rejection(out, &error)?;
            Ok(TimeSetOutcome::Rejected(error))
        }
    }
}

/// Runs the DST menu: enable with a start and end rule, disable, or quit.
///
/// `state` is the configuration state kept by the caller; the returned
/// report carries the state to keep afterwards. Rejected input never lowers
/// it, so an enabled schedule stays enabled when a new attempt is abandoned.
///
/// # Errors
/// Returns `Error::Store` if the clock refuses the schedule and
/// `Error::Console` if `out` fails.
pub fn configure_dst<S, C, W>(
    reader: &mut LineReader<S>,
    clock: &mut C,
    out: &mut W,
    config: &ConsoleConfig,
    state: DstConfigState,
) -> Result<DstReport, Error>
where
    S: ByteSource,
    C: ClockStore,
    W: Write,
{
    if state == DstConfigState::Enabled {
        let status = if clock.is_dst_active() { "Active" } else { "Inactive" };
        say!(out, "DST status: {status}");
    } else {
        say!(out, "DST status: Disabled");
    }
    say!(out, "1: Enable DST  2: Disable DST  3: Quit");

    let outcome = match reader.read_byte(config.command_timeout()) {
        Ok(CMD_DST_ENABLE) => enable_dst(reader, clock, out, config)?,
        Ok(CMD_DST_DISABLE) => {
            let rule = DstRule::neutral();
            clock
                .set_dst(&rule, &rule)
                .inspect_err(|e| warn!("clearing DST schedule failed: {e}"))?;
            info!("DST schedule cleared");
            say!(out, "DST disabled.");
            DstOutcome::Disabled
        }
        Ok(CMD_DST_QUIT) => {
            say!(out, "Leaving DST configuration.");
            DstOutcome::Quit
        }
        Ok(other) => {
            let other = char::from(other);
            say!(out, "Unknown option {other:?}.");
            DstOutcome::UnknownCommand(other)
        }
        Err(error) => {
            report_rejection(out, &error)?;
            DstOutcome::Rejected {
                error,
                reached: DstConfigState::Disabled,
            }
        }
    };

    let state = match outcome {
        DstOutcome::Enabled { .. } => DstConfigState::Enabled,
        DstOutcome::Disabled => DstConfigState::Disabled,
        _ => state,
    };
    Ok(DstReport { state, outcome })
}

fn enable_dst<S, C, W>(
    reader: &mut LineReader<S>,
    clock: &mut C,
    out: &mut W,
    config: &ConsoleConfig,
) -> Result<DstOutcome, Error>
where
    S: ByteSource,
    C: ClockStore,
    W: Write,
{
    let mut setup = DstSetup::new();

    loop {
        let event = match &setup {
            DstSetup::AwaitFormat => {
                say!(out, "Format: 1: Fixed (day of month)  2: Relative (weekday of month)");
                DstEvent::from(reader.read_byte(config.command_timeout()))
            }
            DstSetup::AwaitStart { .. } => {
                say!(out, "Enter DST start as \"{DATE_TIME_PATTERN}\":");
                DstEvent::from(reader.read_line(config.input_timeout()))
            }
            DstSetup::AwaitEnd { start, .. } => {
                debug!("DST start accepted: {start}");
                say!(out, "Enter DST end as \"{DATE_TIME_PATTERN}\":");
                DstEvent::from(reader.read_line(config.input_timeout()))
            }
            DstSetup::Committed { start, end } => {
                clock
                    .set_dst(start, end)
                    .inspect_err(|e| warn!("DST schedule rejected by clock: {e}"))?;
                info!("DST schedule set: start {start}, end {end}");
                say!(out, "DST enabled.");
                return Ok(DstOutcome::Enabled {
                    start: *start,
                    end:   *end,
                });
            }
            DstSetup::Aborted { error, reached } => {
                report_rejection(out, error)?;
                return Ok(DstOutcome::Rejected {
                    error:   error.clone(),
                    reached: *reached,
                });
            }
        };
        setup = setup.advance(event);
    }
}

/// One operator session on a serial console.
///
/// Owns the collaborators and the DST configuration state between
/// commands. A firmware main loop typically calls [`Session::start`] once,
/// then alternates [`Session::show_time`] and [`Session::poll`].
#[derive(Debug)]
pub struct Session<S, C, W> {
    reader:    LineReader<S>,
    clock:     C,
    out:       W,
    config:    ConsoleConfig,
    dst_state: DstConfigState,
}

impl<S, C, W> Session<S, C, W>
where
    S: ByteSource,
    C: ClockStore,
    W: Write,
{
    pub fn new(source: S, clock: C, out: W, config: ConsoleConfig) -> Self {
        Self {
            reader: LineReader::new(source, config.byte_timeout()),
            clock,
            out,
            config,
            dst_state: DstConfigState::Disabled,
        }
    }

    /// Prints the banner and, if the clock is not running yet, asks for the
    /// initial time.
    ///
    /// When the prompt times out the clock is started at
    /// `2000-01-01 00:00:00`. A rejected line leaves the clock alone.
    ///
    /// # Errors
    /// Returns `Error::Store` if the clock refuses the write and
    /// `Error::Console` if the output fails.
    pub fn start(&mut self) -> Result<(), Error> {
        say!(self.out, "=== RTC console ===");

        if self.clock.is_enabled() {
            debug!("clock already running, skipping initial time prompt");
            return Ok(());
        }

        say!(self.out, "RTC not initialized. Enter time as \"{DATE_TIME_PATTERN}\":");
        let parsed = self
            .reader
            .read_line(self.config.input_timeout())
            .and_then(|line| line.parse_date_time());

        match parsed {
            Ok(date) => commit_time(&mut self.clock, &mut self.out, &date)?,
            Err(InputError::Timeout) => {
                let date = CalendarDate::default_epoch();
                say!(self.out, "Timeout waiting for time input. Using default {date}");
                commit_time(&mut self.clock, &mut self.out, &date)?;
            }
            Err(error) => report_rejection(&mut self.out, &error)?,
        }
        Ok(())
    }

    /// Prints the current clock reading. A failed read is skipped.
    ///
    /// # Errors
    /// Returns `Error::Console` if the output fails.
    pub fn show_time(&mut self) -> Result<Option<CalendarDate>, Error> {
        match self.clock.read() {
            Ok(now) => {
                say!(self.out, "{now}");
                Ok(Some(now))
            }
            Err(e) => {
                debug!("clock read skipped: {e}");
                Ok(None)
            }
        }
    }

    /// # Errors
    /// Returns `Error::Console` if the output fails.
    pub fn show_menu(&mut self) -> Result<(), Error> {
        say!(self.out, "Press 1 to set time, 2 to configure DST");
        Ok(())
    }

    /// Waits up to `budget` for a command keystroke and runs it.
    /// Returns the command byte, or `None` if nothing was typed.
    ///
    /// # Errors
    /// Propagates errors from the workflow that ran.
    pub fn poll(&mut self, budget: Duration) -> Result<Option<u8>, Error> {
        match self.reader.read_byte(budget) {
            Ok(command) => {
                self.handle_command(command)?;
                Ok(Some(command))
            }
            Err(_) => Ok(None),
        }
    }

    /// Routes one command keystroke.
    ///
    /// # Errors
    /// Propagates errors from the workflow that ran.
    pub fn handle_command(&mut self, command: u8) -> Result<(), Error> {
        match command {
            CMD_SET_TIME => {
                set_new_time(
                    &mut self.reader,
                    &mut self.clock,
                    &mut self.out,
                    self.config.input_timeout(),
                )?;
            }
            CMD_CONFIGURE_DST => {
                let report = configure_dst(
                    &mut self.reader,
                    &mut self.clock,
                    &mut self.out,
                    &self.config,
                    self.dst_state,
                )?;
                self.dst_state = report.state;
            }
            other => say!(self.out, "Unknown command {:?}.", char::from(other)),
        }
        Ok(())
    }

    pub const fn dst_state(&self) -> DstConfigState {
        self.dst_state
    }

    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub const fn output(&self) -> &W {
        &self.out
    }
}
