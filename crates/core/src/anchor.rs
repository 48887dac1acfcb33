// SPDX-License-Identifier: MIT

//!
//! The anchor type (the week in which an era starts)
//!

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The number of years shown on a life calendar
pub const TOTAL_YEARS: u32 = 95;

/// The number of week blocks in one year of a life calendar
pub const WEEKS_PER_YEAR: u32 = 52;

/// The number of months in a year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Errors that can arise in relation to an [`Anchor`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnchorError {
    /// The year is not allowed (must be 0 <= year < [`TOTAL_YEARS`])
    #[error("Year `{0}` is not allowed")]
    InvalidYear(i64),

    /// The week is not allowed (must be 0 <= week < [`WEEKS_PER_YEAR`])
    #[error("Week `{0}` is not allowed")]
    InvalidWeek(i64),

    /// The key isn't of the form `year-week`
    #[error("`{0}` is not a valid anchor key")]
    InvalidKey(String),
}

/// A (year, week) coordinate on the life calendar.  The year is the age-year
/// (0 is the year of birth) and the week is the week block within that year.
///
/// Anchors are totally ordered by year, then week, which is the canonical
/// order in which blocks are laid out.  The `year-week` string form is only
/// used when persisting and when reading/writing CSV.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Anchor {
    year: u32,
    week: u32,
}

impl Anchor {
    /// Create a new [`Anchor`] if it lies on the calendar
    pub fn new(year: u32, week: u32) -> Result<Self, AnchorError> {
        if year >= TOTAL_YEARS {
            return Err(AnchorError::InvalidYear(year.into()));
        }
        if week >= WEEKS_PER_YEAR {
            return Err(AnchorError::InvalidWeek(week.into()));
        }
        Ok(Anchor { year, week })
    }

    /// The first anchor on the calendar (week 0 of year 0)
    pub fn first() -> Self {
        Anchor { year: 0, week: 0 }
    }

    /// The age-year
    pub fn year(&self) -> u32 {
        self.year
    }

    /// The week block within the year
    pub fn week(&self) -> u32 {
        self.week
    }

    /// Every anchor on the calendar, in canonical order
    pub fn all() -> impl Iterator<Item = Anchor> {
        (0..TOTAL_YEARS)
            .flat_map(|year| (0..WEEKS_PER_YEAR).map(move |week| Anchor { year, week }))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.week)
    }
}

impl FromStr for Anchor {
    type Err = AnchorError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let invalid_key = || AnchorError::InvalidKey(key.to_string());
        let (year, week) = key.trim().split_once('-').ok_or_else(invalid_key)?;
        let year: i64 = year.parse().map_err(|_| invalid_key())?;
        let week: i64 = week.parse().map_err(|_| invalid_key())?;
        let year = u32::try_from(year).map_err(|_| AnchorError::InvalidYear(year))?;
        let week = u32::try_from(week).map_err(|_| AnchorError::InvalidWeek(week))?;
        Anchor::new(year, week)
    }
}

impl From<Anchor> for String {
    fn from(value: Anchor) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Anchor {
    type Error = AnchorError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new() {
        // Should return error
        assert_eq!(Anchor::new(95, 0), Err(AnchorError::InvalidYear(95)));
        assert_eq!(Anchor::new(0, 52), Err(AnchorError::InvalidWeek(52)));

        // Should be ok
        assert!(Anchor::new(0, 0).is_ok());
        assert!(Anchor::new(94, 51).is_ok());
    }

    #[test]
    fn parse_and_format() {
        let anchor: Anchor = "5-35".parse().unwrap();
        assert_eq!(anchor, Anchor::new(5, 35).unwrap());
        assert_eq!(anchor.to_string(), "5-35");

        assert!("5".parse::<Anchor>().is_err());
        assert!("a-b".parse::<Anchor>().is_err());
        assert!("-1-3".parse::<Anchor>().is_err());
        assert_eq!("3-60".parse::<Anchor>(), Err(AnchorError::InvalidWeek(60)));
    }

    #[test]
    fn cmp() {
        let a = Anchor::new(3, 51).unwrap();
        let b = Anchor::new(4, 0).unwrap();
        let c = Anchor::new(4, 1).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn all_is_canonical() {
        let all: Vec<Anchor> = Anchor::all().collect();
        assert_eq!(all.len(), (TOTAL_YEARS * WEEKS_PER_YEAR) as usize);
        assert!(all.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(all[52], Anchor::new(1, 0).unwrap());
    }

    #[test]
    fn serde_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Anchor::new(18, 35).unwrap(), 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"18-35":1}"#);
        let back: std::collections::BTreeMap<Anchor, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
