//! Daylight-saving schedule: rule encoding and the interactive setup steps.
//!
//! [`DstSetup`] is a pure state machine. Each operator event moves it one
//! step; none of the transitions touch the clock. The console driver reads
//! input, feeds it in, and commits the two rules once the machine reaches
//! [`DstSetup::Committed`].

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, DST_SENTINEL, FORMAT_FIXED, FORMAT_RELATIVE, InputError, InputLine, JANUARY,
    Weekday, prelude::*,
};

/// How a DST transition day is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum DstFormat {
    /// A specific day of the month
    Fixed,
    /// The Nth occurrence of a weekday within the month
    Relative,
}

impl DstFormat {
    /// Maps the operator's format keystroke
    pub const fn from_choice(choice: u8) -> Option<Self> {
        match choice {
            FORMAT_FIXED => Some(Self::Fixed),
            FORMAT_RELATIVE => Some(Self::Relative),
            _ => None,
        }
    }
}

/// One DST transition in the layout the clock hardware takes.
///
/// Every field is always populated. The fields the format does not use hold
/// [`DST_SENTINEL`] (1):
/// - `Fixed` uses `day_of_month`; `weekday` and `week_of_month` are sentinels.
/// - `Relative` uses `weekday` (0 = Sunday) and `week_of_month` (0..=5);
///   `day_of_month` is the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(
    fmt = "{format} {hour:02}h month {month} day {day_of_month} weekday {weekday} week {week_of_month}"
)]
pub struct DstRule {
    pub format:        DstFormat,
    pub hour:          u8,
    pub month:         u8,
    pub day_of_month:  u8,
    pub weekday:       u8,
    pub week_of_month: u8,
}

impl DstRule {
    pub const fn fixed(hour: u8, month: u8, day_of_month: u8) -> Self {
        Self {
            format: DstFormat::Fixed,
            hour,
            month,
            day_of_month,
            weekday: DST_SENTINEL,
            week_of_month: DST_SENTINEL,
        }
    }

    pub const fn relative(hour: u8, month: u8, weekday: Weekday, week_of_month: u8) -> Self {
        Self {
            format: DstFormat::Relative,
            hour,
            month,
            day_of_month: DST_SENTINEL,
            weekday: weekday.index(),
            week_of_month,
        }
    }

    /// Builds a rule anchored on a concrete date.
    ///
    /// For `Relative` the weekday and week of month are derived from the
    /// anchor, so the rule recurs on the same Nth weekday in later years.
    pub fn from_date(format: DstFormat, date: &CalendarDate) -> Self {
        match format {
            DstFormat::Fixed => Self::fixed(date.hour(), date.month(), date.day()),
            DstFormat::Relative => Self::relative(
                date.hour(),
                date.month(),
                date.weekday(),
                date.week_of_month(),
            ),
        }
    }

    /// The rule written to both ends of the schedule when DST is switched off:
    /// fixed, midnight, 1 January.
    pub const fn neutral() -> Self {
        Self::fixed(0, JANUARY, DST_SENTINEL)
    }
}

/// Progress of DST configuration held between console invocations.
///
/// This tracks what the console has configured, not the clock's own
/// DST-active flag, which is queried separately for display.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
pub enum DstConfigState {
    #[default]
    Disabled,
    StartAccepted,
    EndAccepted,
    Enabled,
}

/// Operator input fed to [`DstSetup::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DstEvent {
    Keystroke(u8),
    Line(InputLine),
    Failed(InputError),
}

impl From<Result<u8, InputError>> for DstEvent {
    fn from(result: Result<u8, InputError>) -> Self {
        result.map_or_else(Self::Failed, Self::Keystroke)
    }
}

impl From<Result<InputLine, InputError>> for DstEvent {
    fn from(result: Result<InputLine, InputError>) -> Self {
        result.map_or_else(Self::Failed, Self::Line)
    }
}

/// Steps of enabling DST.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DstSetup {
    /// Waiting for the fixed/relative keystroke
    #[default]
    AwaitFormat,
    /// Waiting for the start line; the keystroke is checked along with it
    AwaitStart { choice: u8 },
    /// Start rule built, waiting for the end line
    AwaitEnd { format: DstFormat, start: DstRule },
    /// Both rules accepted and ready to hand to the clock
    Committed { start: DstRule, end: DstRule },
    /// Input rejected; `reached` is how far configuration got
    Aborted {
        error:   InputError,
        reached: DstConfigState,
    },
}

impl DstSetup {
    pub const fn new() -> Self {
        Self::AwaitFormat
    }

    /// Moves one step.
    ///
    /// Events that do not fit the current step, and any event after
    /// `Committed` or `Aborted`, leave the machine where it is.
    pub fn advance(self, event: DstEvent) -> Self {
        match (self, event) {
            (Self::AwaitFormat, DstEvent::Keystroke(choice)) => Self::AwaitStart { choice },
            (Self::AwaitStart { choice }, DstEvent::Line(line)) => {
                match accept_start(choice, &line) {
                    Ok((format, start)) => Self::AwaitEnd { format, start },
                    Err(error) => Self::Aborted {
                        error,
                        reached: DstConfigState::Disabled,
                    },
                }
            }
            (Self::AwaitEnd { format, start }, DstEvent::Line(line)) => {
                match line.parse_date_time() {
                    Ok(date) => Self::Committed {
                        start,
                        end: DstRule::from_date(format, &date),
                    },
                    Err(error) => Self::Aborted {
                        error,
                        reached: DstConfigState::StartAccepted,
                    },
                }
            }
            (
                step @ (Self::AwaitFormat | Self::AwaitStart { .. } | Self::AwaitEnd { .. }),
                DstEvent::Failed(error),
            ) => Self::Aborted {
                error,
                reached: step.progress(),
            },
            (step, _) => step,
        }
    }

    /// Configuration progress this step represents
    pub const fn progress(&self) -> DstConfigState {
        match self {
            Self::AwaitFormat | Self::AwaitStart { .. } => DstConfigState::Disabled,
            Self::AwaitEnd { .. } => DstConfigState::StartAccepted,
            Self::Committed { .. } => DstConfigState::EndAccepted,
            Self::Aborted { reached, .. } => *reached,
        }
    }
}

fn accept_start(choice: u8, line: &InputLine) -> Result<(DstFormat, DstRule), InputError> {
    let date = line.parse_date_time()?;
    let format =
        DstFormat::from_choice(choice).ok_or(InputError::UnknownFormat(char::from(choice)))?;
    Ok((format, DstRule::from_date(format, &date)))
}

/// How a DST console run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DstOutcome {
    /// Both rules were committed to the clock
    Enabled { start: DstRule, end: DstRule },
    /// The neutral rule pair was committed
    Disabled,
    /// The operator left the menu
    Quit,
    /// The menu keystroke was not one of the offered choices
    UnknownCommand(char),
    /// Input was rejected before anything was committed
    Rejected {
        error:   InputError,
        reached: DstConfigState,
    },
}
