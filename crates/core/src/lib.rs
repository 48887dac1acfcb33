// SPDX-License-Identifier: MIT

//!
//! *Part of the wider Life Calendar project*
//!
//! This crate defines the basic datatypes and algorithms used across the Life
//! Calendar project (renderer, desktop application, command line tool).
//!
//! A life calendar is a grid of 95 years of 52 weeks.  The user marks the week
//! in which an "era" (e.g. "Elementary School") begins, and that era covers
//! every later block until the next era begins.  This crate provides:
//!
//! - [`Anchor`], the (year, week) coordinate at which an era starts
//! - [`Era`] and the [`EraStore`] that owns every era
//! - The fill-forward [`resolve`] algorithm at week, month, and year
//!   granularity
//! - Time helpers (ages, calendar years, month names, the current
//!   [`TimeCursor`])
//! - Persistence through an injected [`KeyValueStore`], including the
//!   normalisation of older persisted shapes
//! - CSV import and export
//! - [`LifeCalendar`], the session that ties the above together and persists
//!   after every mutation
//!
//! This crate aims to provide APIs for each type so that if a type is
//! instantiated, the developer can be sure it's valid.
//!

mod anchor;
mod calendar;
mod colour;
mod csv;
mod era;
mod era_store;
mod label;
mod persist;
mod resolver;
mod time_index;

pub use anchor::*;
pub use calendar::*;
pub use colour::*;
pub use csv::*;
pub use era::*;
pub use era_store::*;
pub use label::*;
pub use persist::*;
pub use resolver::*;
pub use time_index::*;

#[cfg(test)]
pub(crate) mod test {
    use crate::{Anchor, Colour, ColourPolicy, EraStore};
    use std::path::PathBuf;

    pub fn path_to_test_data() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data")
    }

    pub fn anchor(year: u32, week: u32) -> Anchor {
        Anchor::new(year, week).unwrap()
    }

    /// Hands out palette colours in order, wrapping around
    pub struct CyclingColours {
        next: usize,
    }

    impl CyclingColours {
        pub fn new() -> Self {
            Self { next: 0 }
        }
    }

    impl ColourPolicy for CyclingColours {
        fn next_colour(&mut self) -> Colour {
            let colour = crate::PALETTE[self.next % crate::PALETTE.len()];
            self.next += 1;
            colour
        }
    }

    /// A store holding the given (year, week, label) entries
    pub fn store_with(entries: &[(u32, u32, &str)]) -> EraStore {
        let mut colours = CyclingColours::new();
        let mut store = EraStore::new();
        for (year, week, label) in entries {
            store.upsert(anchor(*year, *week), label, &mut colours);
        }
        store
    }
}
