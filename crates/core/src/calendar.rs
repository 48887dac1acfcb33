// SPDX-License-Identifier: MIT

//!
//! The life calendar session: the eras, the birth year, and where they're
//! persisted
//!

use crate::{
    Anchor, ColourPolicy, Era, EraStore, Granularity, KeyValueStore, MoveOutcome, PaletteColours,
    PersistError, ResolvedBlock, TimeCursor, UpsertOutcome, current_cursor, default_eras,
    export_csv, import_csv, load_birth_year, load_eras, resolve, save_birth_year, save_eras,
};
use chrono::{Datelike, NaiveDate};
use log::info;

/// A life calendar loaded from a [`KeyValueStore`].  Every mutating method
/// persists the calendar before returning.
pub struct LifeCalendar<S: KeyValueStore> {
    kv_store: S,
    eras: EraStore,
    birth_year: i32,
    colour_policy: Box<dyn ColourPolicy>,
}

impl<S: KeyValueStore> LifeCalendar<S> {
    /// Load the calendar, picking new colours at random and assuming a birth
    /// year of this year if none has been saved
    pub fn load(kv_store: S) -> Result<Self, PersistError> {
        let this_year = crate::today().year();
        Self::load_with(kv_store, Box::new(PaletteColours::new()), this_year)
    }

    /// Load the calendar.
    ///
    /// Older persisted shapes are normalised, and an empty calendar is seeded
    /// with the default eras.  Either way the result is persisted straight
    /// away.
    pub fn load_with(
        kv_store: S,
        mut colour_policy: Box<dyn ColourPolicy>,
        fallback_birth_year: i32,
    ) -> Result<Self, PersistError> {
        let mut eras = load_eras(&kv_store, colour_policy.as_mut())?;
        if eras.is_empty() {
            info!("Seeding the default eras");
            eras = default_eras(colour_policy.as_mut());
        }
        let birth_year = load_birth_year(&kv_store, fallback_birth_year)?;
        let mut calendar = Self {
            kv_store,
            eras,
            birth_year,
            colour_policy,
        };
        calendar.persist()?;
        Ok(calendar)
    }

    /// The eras
    pub fn eras(&self) -> &EraStore {
        &self.eras
    }

    /// The era starting at the anchor (if any)
    pub fn era_at(&self, anchor: &Anchor) -> Option<&Era> {
        self.eras.get(anchor)
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_year
    }

    /// The key-value store the calendar is persisted in
    pub fn kv_store(&self) -> &S {
        &self.kv_store
    }

    /// Where `today` falls on the calendar
    pub fn cursor(&self, today: NaiveDate) -> TimeCursor {
        current_cursor(self.birth_year, today)
    }

    /// Resolve every block at the given granularity
    pub fn resolve(&self, granularity: Granularity, cursor: &TimeCursor) -> Vec<ResolvedBlock<'_>> {
        resolve(&self.eras, granularity, cursor)
    }

    /// Set (or, with an empty label, clear) the era at the anchor
    pub fn upsert(&mut self, anchor: Anchor, label: &str) -> Result<UpsertOutcome, PersistError> {
        let outcome = self.eras.upsert(anchor, label, self.colour_policy.as_mut());
        if outcome != UpsertOutcome::Unchanged {
            self.persist_eras()?;
        }
        Ok(outcome)
    }

    /// Remove the era at the anchor (if there is one)
    pub fn remove(&mut self, anchor: &Anchor) -> Result<Option<Era>, PersistError> {
        let removed = self.eras.remove(anchor);
        if removed.is_some() {
            self.persist_eras()?;
        }
        Ok(removed)
    }

    /// Move the era at `source` to `target`, asking `confirm_overwrite` first
    /// if that would replace an existing era
    pub fn move_era<F>(
        &mut self,
        source: Anchor,
        target: Anchor,
        confirm_overwrite: F,
    ) -> Result<MoveOutcome, PersistError>
    where
        F: FnOnce(&Era) -> bool,
    {
        let outcome = self.eras.move_era(source, target, confirm_overwrite);
        if outcome == MoveOutcome::Moved {
            self.persist_eras()?;
        }
        Ok(outcome)
    }

    pub fn set_birth_year(&mut self, birth_year: i32) -> Result<(), PersistError> {
        info!("Birth year set to {birth_year}");
        self.birth_year = birth_year;
        save_birth_year(&mut self.kv_store, birth_year)
    }

    /// Remove every era, if `confirm` agrees.  Returns whether the calendar
    /// was reset.
    pub fn reset<F>(&mut self, confirm: F) -> Result<bool, PersistError>
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            return Ok(false);
        }
        info!("Clearing all {} era(s)", self.eras.len());
        self.eras.clear();
        self.persist_eras()?;
        Ok(true)
    }

    /// Replace the eras (and the birth year, if the file has one) with those
    /// read from a CSV export.  `confirm` is given the number of eras read
    /// and nothing changes unless it agrees.
    ///
    /// Returns the number of eras imported, or `None` if declined.
    pub fn import_csv<F>(&mut self, text: &str, confirm: F) -> Result<Option<usize>, PersistError>
    where
        F: FnOnce(usize) -> bool,
    {
        let import = import_csv(text);
        let count = import.count();
        if !confirm(count) {
            info!("CSV import of {count} era(s) declined");
            return Ok(None);
        }
        self.eras.replace_all(import.eras);
        if let Some(birth_year) = import.birth_year {
            self.birth_year = birth_year;
        }
        self.persist()?;
        info!("Imported {count} era(s) from CSV");
        Ok(Some(count))
    }

    /// The calendar as CSV
    pub fn export_csv(&self) -> String {
        export_csv(&self.eras, self.birth_year)
    }

    /// Persist the eras and the birth year
    pub fn persist(&mut self) -> Result<(), PersistError> {
        self.persist_eras()?;
        save_birth_year(&mut self.kv_store, self.birth_year)
    }

    fn persist_eras(&mut self) -> Result<(), PersistError> {
        save_eras(&mut self.kv_store, &self.eras)
    }
}

/// The message shown before a move replaces an existing era
pub fn overwrite_message(existing: &Era) -> String {
    format!("Overwrite existing event \"{}\"?", existing.label())
}

/// The message shown before every era is removed
pub const RESET_MESSAGE: &str = "Are you sure you want to clear all marked events?";

/// The message shown before an import replaces the calendar
pub fn import_message(count: usize) -> String {
    format!("Importing will overwrite current data. Found {count} events. Proceed?")
}
