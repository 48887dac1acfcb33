// SPDX-License-Identifier: MIT

//!
//! Fill-forward resolution: working out which era covers each block of the
//! calendar
//!
//! An era that starts at some anchor covers every later block until another
//! era starts.  The week view is the base case; months and years are
//! aggregations of the same week sequence:
//!
//! - A month block starts an era if any of its weeks does.  The *first* era
//!   starting in the month is shown and carried forward.
//! - A year block starts an era if any of its weeks does.  The *first* era
//!   starting in the year is shown (labelled with a trailing `+` if more
//!   than one starts), but the *last* one is carried forward into the
//!   following years.
//!

use crate::{
    Anchor, Era, EraStore, MONTHS_PER_YEAR, TOTAL_YEARS, TimeCursor, WEEKS_PER_YEAR,
    month_representative, month_weeks, year_representative,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The marker appended to a year's label when more than one era starts in it
pub const MORE_ERAS_MARKER: &str = " +";

/// How much time each block of the calendar represents
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    Weeks,
    Months,
    Years,
}

impl Granularity {
    /// Every granularity, finest first
    pub fn all() -> [Granularity; 3] {
        [Granularity::Weeks, Granularity::Months, Granularity::Years]
    }

    /// The number of blocks per year of life
    pub fn blocks_per_year(&self) -> u32 {
        match self {
            Granularity::Weeks => WEEKS_PER_YEAR,
            Granularity::Months => MONTHS_PER_YEAR,
            Granularity::Years => 1,
        }
    }

    /// e.g. "Weeks"
    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Weeks => "Weeks",
            Granularity::Months => "Months",
            Granularity::Years => "Years",
        }
    }

    /// e.g. "Life in Weeks"
    pub fn title(&self) -> String {
        format!("Life in {}", self.name())
    }

    /// A one line description of the view
    pub fn description(&self) -> String {
        let unit = match self {
            Granularity::Weeks => "week",
            Granularity::Months => "month",
            Granularity::Years => "year",
        };
        format!("Each block represents one {unit} of your life. Mark your significant events.")
    }
}

/// One block of the calendar after fill-forward resolution.  Borrows the eras
/// from the [`EraStore`] it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBlock<'a> {
    /// The granularity the block was resolved at
    pub granularity: Granularity,

    /// The age-year the block is in
    pub year: u32,

    /// The week (weeks), month (months), or 0 (years) within the year
    pub index_in_year: u32,

    /// The block's representative anchor: the week itself, or the first week
    /// of the month/year.  Activating or dropping onto the block targets this
    /// anchor.
    pub anchor: Anchor,

    /// The eras starting within the block, in canonical order
    pub starts: Vec<(Anchor, &'a Era)>,

    /// The era the block is painted with
    pub era: Option<&'a Era>,

    /// The era carried forward into the following blocks
    pub carried: Option<&'a Era>,

    /// Whether the block is entirely in the past
    pub is_past: bool,
}

impl<'a> ResolvedBlock<'a> {
    /// Whether at least one era starts in this block
    pub fn is_era_start(&self) -> bool {
        !self.starts.is_empty()
    }

    /// The label drawn on an era-start block (`None` if no era starts here)
    pub fn start_label(&self) -> Option<String> {
        let (_, first) = self.starts.first()?;
        let mut label = first.label().to_string();
        if self.granularity == Granularity::Years && self.starts.len() > 1 {
            label.push_str(MORE_ERAS_MARKER);
        }
        Some(label)
    }

    /// The anchor of the era that is shown as starting in this block.  Year
    /// blocks may hold several eras, so they never offer one up.
    pub fn drag_source(&self) -> Option<Anchor> {
        match self.granularity {
            Granularity::Years => None,
            Granularity::Weeks | Granularity::Months => {
                self.starts.first().map(|(anchor, _)| *anchor)
            }
        }
    }
}

/// Resolve every block of the calendar at the given granularity, in canonical
/// order (year by year, earliest block first)
pub fn resolve<'a>(
    store: &'a EraStore,
    granularity: Granularity,
    cursor: &TimeCursor,
) -> Vec<ResolvedBlock<'a>> {
    match granularity {
        Granularity::Weeks => resolve_weeks(store, cursor),
        Granularity::Months => resolve_months(store, cursor),
        Granularity::Years => resolve_years(store, cursor),
    }
}

/// The era covering the week at `anchor` (the nearest era starting at or
/// before it)
pub fn era_at<'a>(store: &'a EraStore, anchor: &Anchor) -> Option<&'a Era> {
    store.range(..=*anchor).next_back().map(|(_, era)| era)
}

fn resolve_weeks<'a>(store: &'a EraStore, cursor: &TimeCursor) -> Vec<ResolvedBlock<'a>> {
    let mut blocks = Vec::with_capacity((TOTAL_YEARS * WEEKS_PER_YEAR) as usize);
    let mut current_era: Option<&Era> = None;
    for anchor in Anchor::all() {
        let starts: Vec<(Anchor, &Era)> =
            store.get(&anchor).map(|era| (anchor, era)).into_iter().collect();
        if let Some((_, era)) = starts.first() {
            current_era = Some(*era);
        }
        blocks.push(ResolvedBlock {
            granularity: Granularity::Weeks,
            year: anchor.year(),
            index_in_year: anchor.week(),
            anchor,
            starts,
            era: current_era,
            carried: current_era,
            is_past: cursor.is_week_past(&anchor),
        });
    }
    blocks
}

fn resolve_months<'a>(store: &'a EraStore, cursor: &TimeCursor) -> Vec<ResolvedBlock<'a>> {
    let mut blocks = Vec::with_capacity((TOTAL_YEARS * MONTHS_PER_YEAR) as usize);
    let mut current_era: Option<&Era> = None;
    for year in 0..TOTAL_YEARS {
        for month in 0..MONTHS_PER_YEAR {
            let Ok(anchor) = month_representative(year, month) else {
                continue;
            };
            let weeks = month_weeks(month);
            let starts = starts_within(store, year, weeks);
            if let Some((_, first)) = starts.first() {
                current_era = Some(*first);
            }
            blocks.push(ResolvedBlock {
                granularity: Granularity::Months,
                year,
                index_in_year: month,
                anchor,
                starts,
                era: current_era,
                carried: current_era,
                is_past: cursor.is_month_past(year, month),
            });
        }
    }
    blocks
}

fn resolve_years<'a>(store: &'a EraStore, cursor: &TimeCursor) -> Vec<ResolvedBlock<'a>> {
    let mut blocks = Vec::with_capacity(TOTAL_YEARS as usize);
    let mut current_era: Option<&Era> = None;
    for year in 0..TOTAL_YEARS {
        let Ok(anchor) = year_representative(year) else {
            continue;
        };
        let starts = starts_within(store, year, 0..WEEKS_PER_YEAR);
        let era = match starts.first() {
            Some((_, first)) => Some(*first),
            None => current_era,
        };
        if let Some((_, last)) = starts.last() {
            current_era = Some(*last);
        }
        blocks.push(ResolvedBlock {
            granularity: Granularity::Years,
            year,
            index_in_year: 0,
            anchor,
            starts,
            era,
            carried: current_era,
            is_past: cursor.is_year_past(year),
        });
    }
    blocks
}

/// The eras starting in the given weeks of the year, in canonical order.
/// Weeks beyond the end of the year are never read.
fn starts_within(
    store: &EraStore,
    year: u32,
    weeks: Range<u32>,
) -> Vec<(Anchor, &Era)> {
    let end = weeks.end.min(WEEKS_PER_YEAR);
    let Ok(first) = Anchor::new(year, weeks.start) else {
        return Vec::new();
    };
    store
        .range(first..)
        .take_while(|(anchor, _)| anchor.year() == year && anchor.week() < end)
        .map(|(anchor, era)| (*anchor, era))
        .collect()
}
