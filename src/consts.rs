/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Upper bound (inclusive) accepted for seconds, one past the usual 59
pub const MAX_SECOND: u8 = 60;
/// Upper bound (inclusive) accepted for minutes, same quirk as `MAX_SECOND`.
pub const MAX_MINUTE: u8 = 60;
/// Upper bound (inclusive) for hours
pub const MAX_HOUR: u8 = 23;

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u32 = 400;

/// Days per week
pub(crate) const DAYS_PER_WEEK: u8 = 7;

/// Size of the operator input buffer, including the slot reserved for the terminator
pub const LINE_BUFFER_SIZE: usize = 80;
/// Characters an input line can actually hold
pub const LINE_CAPACITY: usize = LINE_BUFFER_SIZE - 1;

/// Field separator on operator input lines
pub const FIELD_DELIMITER: char = ' ';
/// Fields in an `HH MM SS dd mm yyyy` line
pub const DATE_TIME_FIELDS: usize = 6;
/// Delimiters a well-formed `HH MM SS dd mm yyyy` line carries
pub const DATE_TIME_DELIMITERS: usize = DATE_TIME_FIELDS - 1;

/// Prompt shape shown to the operator whenever a date/time is requested
pub const DATE_TIME_PATTERN: &str = "HH MM SS dd mm yyyy";

/// Per-byte wait on the serial line, in milliseconds
pub const BYTE_TIMEOUT_MS: u64 = 50;
/// Budget for a full typed line, in milliseconds
pub const INPUT_TIMEOUT_MS: u64 = 60_000;
/// Budget for a single command keystroke, in milliseconds
pub const COMMAND_TIMEOUT_MS: u64 = 10_000;

/// Dispatcher command: set the wall-clock time
pub const CMD_SET_TIME: u8 = b'1';
/// Dispatcher command: configure daylight saving
pub const CMD_CONFIGURE_DST: u8 = b'2';

/// DST menu: enable
pub const CMD_DST_ENABLE: u8 = b'1';
/// DST menu: disable
pub const CMD_DST_DISABLE: u8 = b'2';
/// DST menu: quit
pub const CMD_DST_QUIT: u8 = b'3';

/// DST format choice: fixed day-of-month
pub const FORMAT_FIXED: u8 = b'1';
/// DST format choice: Nth weekday of month
pub const FORMAT_RELATIVE: u8 = b'2';

/// Placeholder stored in DST rule fields the chosen format ignores
pub const DST_SENTINEL: u8 = 1;

/// Date written when the operator lets the initial time prompt expire
pub const DEFAULT_YEAR: u32 = 2000;
