use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DAYS_PER_WEEK, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    LEAP_YEAR_CYCLE, MAX_MONTH, MIN_DAY,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Day of the week, numbered from Sunday = 0 to Saturday = 6.
///
/// Always derived from a date through [`day_of_week`]; nothing in the crate
/// stores one as an independent source of truth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

const WEEKDAYS: [Weekday; DAYS_PER_WEEK as usize] = [
    Weekday::Sunday,
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
];

impl Weekday {
    /// Returns the weekday for `0..=6` (Sunday first), `None` otherwise
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < DAYS_PER_WEEK {
            Some(WEEKDAYS[index as usize])
        } else {
            None
        }
    }

    /// Numeric value with Sunday = 0
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl From<Weekday> for u8 {
    fn from(weekday: Weekday) -> Self {
        weekday.index()
    }
}

// Calendar arithmetic

pub const fn is_leap_year(year: u32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Length of `month` in `year`. Months outside 1-12 have no days and
/// yield 0, so no day validates against them.
pub const fn days_in_month(month: u8, year: u32) -> u8 {
    if month == 0 || month > MAX_MONTH {
        0
    } else if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Day of the week by Zeller's congruence.
///
/// January and February count as months 13 and 14 of the previous year.
/// Zeller yields 0 for Saturday; the result is shifted so Sunday is 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn day_of_week(day: u8, month: u8, year: u32) -> Weekday {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    let (month, year) = if month < 3 {
        (i64::from(month) + 12, i64::from(year) - 1)
    } else {
        (i64::from(month), i64::from(year))
    };
    let k = year.rem_euclid(100);
    let j = year.div_euclid(100);
    let h = (i64::from(day) + (13 * (month + 1)) / 5 + k + k / 4 + j / 4 + 5 * j).rem_euclid(7);

    // h is in 0..7 after rem_euclid
    WEEKDAYS[((h + 6) % 7) as usize]
}

/// Which week of the month `day` falls in, counting from 0.
///
/// The first week ends on day `8 - w` where `w` is the weekday of the 1st,
/// or on day 7 when the month starts on a Sunday. Every later week is seven
/// days long, so the result ranges over `0..=5`.
pub fn week_of_month(day: u8, month: u8, year: u32) -> u8 {
    let first = day_of_week(MIN_DAY, month, year).index();
    let mut boundary = if first >= 1 {
        (DAYS_PER_WEEK + 1) - first
    } else {
        DAYS_PER_WEEK
    };

    let mut week = 0;
    while day > boundary {
        week += 1;
        boundary += DAYS_PER_WEEK;
    }
    week
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_from_index() {
        assert_eq!(Weekday::from_index(0), Some(Weekday::Sunday));
        assert_eq!(Weekday::from_index(6), Some(Weekday::Saturday));
        assert_eq!(Weekday::from_index(7), None);
    }

    #[test]
    fn test_weekday_index_and_into_u8() {
        assert_eq!(Weekday::Thursday.index(), 4);
        let value: u8 = Weekday::Saturday.into();
        assert_eq!(value, 6);
    }

    #[test]
    fn test_weekday_display() {
        assert_eq!(Weekday::Sunday.to_string(), "Sunday");
        assert_eq!(Weekday::Wednesday.to_string(), "Wednesday");
    }

    #[test]
    fn test_weekday_serde() {
        let json = serde_json::to_string(&Weekday::Friday).unwrap();
        assert_eq!(json, "\"Friday\"");

        let parsed: Weekday = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Weekday::Friday);
    }

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year: u32,
            is_leap: bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year: 2024,
                is_leap: true,
                description: "divisible by 4",
            },
            TestCase {
                year: 2023,
                is_leap: false,
                description: "not divisible by 4",
            },
            TestCase {
                year: 1900,
                is_leap: false,
                description: "century not divisible by 400",
            },
            TestCase {
                year: 2100,
                is_leap: false,
                description: "century not divisible by 400",
            },
            TestCase {
                year: 2000,
                is_leap: true,
                description: "divisible by 400",
            },
            TestCase {
                year: 2400,
                is_leap: true,
                description: "divisible by 400",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description,
            );
        }
    }

    #[test]
    fn test_days_in_month_february() {
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(2, 2023), 28);
        assert_eq!(days_in_month(2, 1900), 28, "Century year not divisible by 400");
        assert_eq!(days_in_month(2, 2000), 29, "Century year divisible by 400");
    }

    #[test]
    fn test_days_in_month_regular_months() {
        assert_eq!(days_in_month(4, 2024), 30);
        for month in [1, 3, 5, 7, 8, 10, 12] {
            assert_eq!(days_in_month(month, 2024), 31, "Month {month} should have 31 days");
        }
        for month in [4, 6, 9, 11] {
            assert_eq!(days_in_month(month, 2023), 30, "Month {month} should have 30 days");
        }
    }

    #[test]
    fn test_days_in_month_outside_calendar() {
        assert_eq!(days_in_month(0, 2024), 0);
        assert_eq!(days_in_month(13, 2024), 0);
        assert_eq!(days_in_month(u8::MAX, 2023), 0);
    }

    #[test]
    fn test_day_of_week_reference_dates() {
        assert_eq!(day_of_week(1, 1, 2000), Weekday::Saturday);
        assert_eq!(day_of_week(1, 1, 2000).index(), 6);
        assert_eq!(day_of_week(4, 7, 1776), Weekday::Thursday);
        assert_eq!(day_of_week(29, 2, 2024), Weekday::Thursday);
        assert_eq!(day_of_week(1, 3, 2024), Weekday::Friday);
        assert_eq!(day_of_week(31, 12, 1999), Weekday::Friday);
        assert_eq!(day_of_week(19, 10, 2026), Weekday::Monday);
    }

    #[test]
    fn test_day_of_week_january_and_february_use_previous_year() {
        // 2000 is a century year, so the shift into 1999 crosses j
        assert_eq!(day_of_week(29, 2, 2000), Weekday::Tuesday);
        assert_eq!(day_of_week(1, 3, 2000), Weekday::Wednesday);
        assert_eq!(day_of_week(1, 1, 2001), Weekday::Monday);
    }

    #[test]
    fn test_day_of_week_advances_daily() {
        let mut expected = day_of_week(1, 1, 2024).index();
        for month in 1..=12 {
            for day in 1..=days_in_month(month, 2024) {
                assert_eq!(day_of_week(day, month, 2024).index(), expected, "{day}/{month}");
                expected = (expected + 1) % 7;
            }
        }
    }

    #[test]
    fn test_week_of_month_month_starting_saturday() {
        // March 2025 starts on a Saturday: first week ends on the 2nd
        assert_eq!(day_of_week(1, 3, 2025), Weekday::Saturday);
        assert_eq!(week_of_month(1, 3, 2025), 0);
        assert_eq!(week_of_month(2, 3, 2025), 0);
        assert_eq!(week_of_month(3, 3, 2025), 1);
        assert_eq!(week_of_month(9, 3, 2025), 1);
        assert_eq!(week_of_month(10, 3, 2025), 2);
        assert_eq!(week_of_month(31, 3, 2025), 5);
    }

    #[test]
    fn test_week_of_month_month_starting_sunday() {
        // June 2025 starts on a Sunday: first week runs to the 7th
        assert_eq!(day_of_week(1, 6, 2025), Weekday::Sunday);
        assert_eq!(week_of_month(7, 6, 2025), 0);
        assert_eq!(week_of_month(8, 6, 2025), 1);
        assert_eq!(week_of_month(30, 6, 2025), 4);
    }

    #[test]
    fn test_week_of_month_month_starting_monday() {
        // September 2025 starts on a Monday
        assert_eq!(day_of_week(1, 9, 2025), Weekday::Monday);
        assert_eq!(week_of_month(7, 9, 2025), 0);
        assert_eq!(week_of_month(8, 9, 2025), 1);
    }

    #[test]
    fn test_week_of_month_stays_in_range() {
        for year in [2023, 2024, 2025] {
            for month in 1..=12 {
                for day in 1..=days_in_month(month, year) {
                    assert!(week_of_month(day, month, year) <= 5, "{day}/{month}/{year}");
                }
            }
        }
    }
}
