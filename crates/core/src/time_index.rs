// SPDX-License-Identifier: MIT

//!
//! Mapping calendar blocks to ages, calendar years and months, and working out
//! where "now" is on the calendar
//!

use crate::{Anchor, AnchorError, MONTHS_PER_YEAR, WEEKS_PER_YEAR};
use chrono::{Datelike, Local, NaiveDate};
use std::ops::Range;

/// Short month names, indexed from 0 (January)
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The age (in years) at the anchor
pub fn age_year_of(anchor: &Anchor) -> u32 {
    anchor.year()
}

/// The calendar year in which the anchor falls
pub fn calendar_year_of(anchor: &Anchor, birth_year: i32) -> i64 {
    i64::from(birth_year) + i64::from(anchor.year())
}

/// The month a week block falls in.
///
/// This is approximate: the 52 week blocks are spread evenly over 12 months
/// (`week / 52 * 12`, floored) rather than mapped onto real calendar dates.
pub fn month_index_of(week: u32) -> usize {
    let month = (week * MONTHS_PER_YEAR) / WEEKS_PER_YEAR;
    month.min(MONTHS_PER_YEAR - 1) as usize
}

/// The short name of the month a week block falls in (see [`month_index_of`])
pub fn month_name_of(week: u32) -> &'static str {
    MONTH_NAMES[month_index_of(week)]
}

/// The week blocks that make up a month (0 is January).  Months are 4 or 5
/// week blocks long.
pub fn month_weeks(month: u32) -> Range<u32> {
    let start = (month * WEEKS_PER_YEAR) / MONTHS_PER_YEAR;
    let end = ((month + 1) * WEEKS_PER_YEAR) / MONTHS_PER_YEAR;
    start.min(WEEKS_PER_YEAR)..end.min(WEEKS_PER_YEAR)
}

/// The month block a week falls in (the inverse of [`month_weeks`]).  This can
/// differ from [`month_index_of`], which names the month for a week's tooltip.
pub fn month_of_week(week: u32) -> u32 {
    let month = (week * MONTHS_PER_YEAR + MONTHS_PER_YEAR - 1) / WEEKS_PER_YEAR;
    month.min(MONTHS_PER_YEAR - 1)
}

/// The anchor a month block stands for: the first week of the month
pub fn month_representative(year: u32, month: u32) -> Result<Anchor, AnchorError> {
    Anchor::new(year, month_weeks(month).start)
}

/// The anchor a year block stands for
pub fn year_representative(year: u32) -> Result<Anchor, AnchorError> {
    Anchor::new(year, 0)
}

/// Where "now" is on a life calendar.  This is never stored: it's derived from
/// the birth year and today's date every time the calendar is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeCursor {
    /// The current age-year (negative if the birth year is in the future)
    pub age_year: i64,

    /// Whole weeks elapsed since 1st January
    pub week_of_year: u32,

    /// The current month (0 is January)
    pub month_of_year: u32,
}

impl TimeCursor {
    /// Whether the week block is entirely in the past
    pub fn is_week_past(&self, anchor: &Anchor) -> bool {
        let year = i64::from(anchor.year());
        year < self.age_year || (year == self.age_year && anchor.week() < self.week_of_year)
    }

    /// Whether the month block is entirely in the past
    pub fn is_month_past(&self, year: u32, month: u32) -> bool {
        let year = i64::from(year);
        year < self.age_year || (year == self.age_year && month < self.month_of_year)
    }

    /// Whether the year block is entirely in the past
    pub fn is_year_past(&self, year: u32) -> bool {
        i64::from(year) < self.age_year
    }
}

/// Work out where `today` falls on the calendar of someone born in
/// `birth_year`
pub fn current_cursor(birth_year: i32, today: NaiveDate) -> TimeCursor {
    TimeCursor {
        age_year: i64::from(today.year()) - i64::from(birth_year),
        week_of_year: today.ordinal0() / 7,
        month_of_year: today.month0(),
    }
}

/// Today's date (local time)
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::anchor;

    #[test]
    fn ages_and_years() {
        assert_eq!(age_year_of(&anchor(18, 35)), 18);
        assert_eq!(calendar_year_of(&anchor(18, 35), 1990), 2008);
        assert_eq!(calendar_year_of(&anchor(0, 0), 1990), 1990);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name_of(0), "Jan");
        assert_eq!(month_name_of(4), "Jan");
        assert_eq!(month_name_of(5), "Feb");
        assert_eq!(month_name_of(26), "Jul");
        assert_eq!(month_name_of(51), "Dec");
    }

    #[test]
    fn month_buckets_cover_the_year() {
        let mut next = 0;
        for month in 0..MONTHS_PER_YEAR {
            let weeks = month_weeks(month);
            assert_eq!(weeks.start, next);
            assert!(weeks.len() == 4 || weeks.len() == 5);
            next = weeks.end;
        }
        assert_eq!(next, WEEKS_PER_YEAR);
        assert_eq!(month_weeks(3), 13..17);
        assert_eq!(month_weeks(11), 47..52);
    }

    #[test]
    fn month_of_week_inverts_the_buckets() {
        for week in 0..WEEKS_PER_YEAR {
            let month = month_of_week(week);
            assert!(month_weeks(month).contains(&week), "week {week} month {month}");
        }
        assert_eq!(month_of_week(3), 0);
        assert_eq!(month_of_week(4), 1);
        // The tooltip's month name is approximate, the blocks are not
        assert_eq!(month_index_of(4), 0);
    }

    #[test]
    fn representatives() {
        assert_eq!(month_representative(30, 0), Ok(anchor(30, 0)));
        assert_eq!(month_representative(30, 3), Ok(anchor(30, 13)));
        assert_eq!(year_representative(94), Ok(anchor(94, 0)));
        assert!(year_representative(95).is_err());
    }

    #[test]
    fn cursor() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let cursor = current_cursor(1990, today);
        assert_eq!(cursor.age_year, 36);
        // 19th Oct 2026 is day 291 (0-indexed) of the year
        assert_eq!(cursor.week_of_year, 41);
        assert_eq!(cursor.month_of_year, 9);

        assert!(cursor.is_week_past(&anchor(35, 51)));
        assert!(cursor.is_week_past(&anchor(36, 40)));
        assert!(!cursor.is_week_past(&anchor(36, 41)));
        assert!(cursor.is_month_past(36, 8));
        assert!(!cursor.is_month_past(36, 9));
        assert!(cursor.is_year_past(35));
        assert!(!cursor.is_year_past(36));
    }

    #[test]
    fn cursor_before_birth() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let cursor = current_cursor(2030, today);
        assert_eq!(cursor.age_year, -4);
        assert!(!cursor.is_week_past(&anchor(0, 0)));
        assert!(!cursor.is_year_past(0));
    }
}
