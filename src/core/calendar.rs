//! Calendar helpers: day-first date handling, injectable clock and calendar-aware differences

use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day-first date format used in every persisted file (`DD.MM.YYYY`)
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Source of "now" for all time-dependent metrics
pub trait Clock {
    /// The current local date and time
    fn now(&self) -> NaiveDateTime;

    /// The current calendar date
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall-clock time in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant, for tests and reproducible reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Frozen at midnight of `date`
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self(start_of_day(date))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Midnight at the start of `date`
#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Parse a day-first date (`DD.MM.YYYY`), falling back to ISO `YYYY-MM-DD`.
///
/// Returns `None` for blank or unparseable input.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

/// Format a date as `DD.MM.YYYY`
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A calendar difference split into whole years, months and days.
///
/// Components share the sign of the difference; a deadline in the past yields
/// non-positive components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeLeft {
    /// Whole years
    pub years: i32,
    /// Whole months after the years
    pub months: i32,
    /// Remaining days after the months
    pub days: i32,
}

impl TimeLeft {
    /// Difference `to - from` between two calendar dates, both taken at midnight
    #[must_use]
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self::between_instants(start_of_day(from), start_of_day(to))
    }

    /// Time left from `now` until the start of the day `end`.
    ///
    /// A day already under way does not count as a remaining day.
    #[must_use]
    pub fn until(now: NaiveDateTime, end: NaiveDate) -> Self {
        Self::between_instants(now, start_of_day(end))
    }

    /// Difference `to - from` with Gregorian month rollover.
    ///
    /// Months are counted by stepping `from` forward (or backward) a month at a time,
    /// clamping to the last day of shorter months, so 31.01 + 1 month is 28.02 or 29.02.
    /// The days component is the whole days remaining after the last whole month; a
    /// leftover fraction of a day is dropped.
    #[must_use]
    pub fn between_instants(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        let mut months = (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
        let mut anchor = shift_months(from, months);

        if to < from {
            while to > anchor {
                months += 1;
                anchor = shift_months(from, months);
            }
        } else {
            while to < anchor {
                months -= 1;
                anchor = shift_months(from, months);
            }
        }

        let days = i32::try_from((to - anchor).num_days()).unwrap_or(i32::MAX);
        let sign = months.signum();
        let magnitude = months.abs();

        Self {
            years: magnitude / 12 * sign,
            months: magnitude % 12 * sign,
            days,
        }
    }

    /// Whole months (`years * 12 + months`), ignoring the day remainder
    #[must_use]
    pub const fn whole_months(&self) -> i32 {
        self.years * 12 + self.months
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y {}m {}d", self.years, self.months, self.days)
    }
}

fn shift_months(date: NaiveDateTime, months: i32) -> NaiveDateTime {
    let step = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(step)
    } else {
        date.checked_sub_months(step)
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_day_first() {
        assert_eq!(parse_date("15.03.2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date(" 01.10.2023 "), Some(date(2023, 10, 1)));
    }

    #[test]
    fn test_parse_iso_fallback() {
        assert_eq!(parse_date("2024-03-15"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("31.02.2024"), None);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_format_date_pads() {
        assert_eq!(format_date(date(2024, 3, 5)), "05.03.2024");
    }

    #[test]
    fn test_between_simple() {
        let left = TimeLeft::between(date(2024, 1, 10), date(2025, 3, 25));
        assert_eq!(
            left,
            TimeLeft {
                years: 1,
                months: 2,
                days: 15
            }
        );
        assert_eq!(left.whole_months(), 14);
    }

    #[test]
    fn test_between_day_underflow_borrows_month() {
        // 20.01 -> 05.03 is one month (20.02) plus 14 days in a leap year
        let left = TimeLeft::between(date(2024, 1, 20), date(2024, 3, 5));
        assert_eq!(
            left,
            TimeLeft {
                years: 0,
                months: 1,
                days: 14
            }
        );
    }

    #[test]
    fn test_between_clamps_month_end() {
        // 31.01 + 1 month = 29.02 in 2024, leaving 1 day to 01.03
        let left = TimeLeft::between(date(2024, 1, 31), date(2024, 3, 1));
        assert_eq!(
            left,
            TimeLeft {
                years: 0,
                months: 1,
                days: 1
            }
        );
    }

    #[test]
    fn test_between_same_day_is_zero() {
        let left = TimeLeft::between(date(2024, 6, 1), date(2024, 6, 1));
        assert_eq!(left, TimeLeft::default());
    }

    #[test]
    fn test_between_past_is_negative() {
        let left = TimeLeft::between(date(2025, 3, 25), date(2024, 1, 10));
        assert_eq!(
            left,
            TimeLeft {
                years: -1,
                months: -2,
                days: -15
            }
        );
    }

    #[test]
    fn test_until_drops_partial_day() {
        let now = date(2025, 6, 18).and_hms_opt(14, 0, 0).unwrap();
        assert_eq!(
            TimeLeft::until(now, date(2026, 9, 30)),
            TimeLeft {
                years: 1,
                months: 3,
                days: 11
            }
        );
        assert_eq!(
            TimeLeft::until(start_of_day(date(2025, 6, 18)), date(2026, 9, 30)),
            TimeLeft::between(date(2025, 6, 18), date(2026, 9, 30))
        );
    }

    #[test]
    fn test_until_day_before_end_is_zero() {
        let now = date(2025, 9, 29).and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(TimeLeft::until(now, date(2025, 9, 30)), TimeLeft::default());
    }

    #[test]
    fn test_until_borrows_month_when_day_is_under_way() {
        // 18.06 14:00 + 3 months passes 18.09 00:00, so only 2 months and 30 days remain
        let now = date(2025, 6, 18).and_hms_opt(14, 0, 0).unwrap();
        assert_eq!(
            TimeLeft::until(now, date(2025, 9, 18)),
            TimeLeft {
                years: 0,
                months: 2,
                days: 30
            }
        );
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::on(date(2024, 2, 29));
        assert_eq!(clock.today(), date(2024, 2, 29));
        assert_eq!(clock.now(), start_of_day(date(2024, 2, 29)));

        let afternoon = FixedClock(date(2024, 2, 29).and_hms_opt(15, 0, 0).unwrap());
        assert_eq!(afternoon.today(), date(2024, 2, 29));
    }
}
