// SPDX-License-Identifier: MIT

//!
//! The era store: the single source of truth for which eras start where
//!

use crate::{Anchor, ColourPolicy, Era, Label};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeBounds;

/// What an [`EraStore::upsert`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new era was created (with a freshly assigned colour)
    Created,

    /// An existing era's label was replaced (the colour was kept)
    Updated,

    /// The label was empty and the era at the anchor was removed
    Removed,

    /// The label was empty and there was no era at the anchor
    Unchanged,
}

/// What an [`EraStore::move_era`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The era now starts at the target anchor
    Moved,

    /// The target held an era and overwriting it was declined
    Declined,

    /// Nothing to do (source and target are the same, or there's no era at
    /// the source)
    Ignored,
}

/// The sparse map from [`Anchor`] to [`Era`].
///
/// Entries are kept in canonical (year, then week) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EraStore(BTreeMap<Anchor, Era>);

impl EraStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Get the era starting at the anchor (if any)
    pub fn get(&self, anchor: &Anchor) -> Option<&Era> {
        self.0.get(anchor)
    }

    /// Whether an era starts at the anchor
    pub fn contains(&self, anchor: &Anchor) -> bool {
        self.0.contains_key(anchor)
    }

    /// The number of eras
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no eras
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All eras, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&Anchor, &Era)> {
        self.0.iter()
    }

    /// The eras starting within the range of anchors, in canonical order
    pub fn range<R: RangeBounds<Anchor>>(
        &self,
        range: R,
    ) -> impl DoubleEndedIterator<Item = (&Anchor, &Era)> {
        self.0.range(range)
    }

    /// Insert an era as is (used when loading and importing)
    pub fn insert(&mut self, anchor: Anchor, era: Era) -> Option<Era> {
        self.0.insert(anchor, era)
    }

    /// Set the label of the era at the anchor.
    ///
    /// - An empty (or whitespace only) label removes the era
    /// - An existing era keeps its colour
    /// - A new era gets its colour from the `colour_policy`
    pub fn upsert(
        &mut self,
        anchor: Anchor,
        label: &str,
        colour_policy: &mut dyn ColourPolicy,
    ) -> UpsertOutcome {
        let Ok(label) = Label::from(label) else {
            return match self.remove(&anchor) {
                Some(_) => UpsertOutcome::Removed,
                None => UpsertOutcome::Unchanged,
            };
        };
        match self.0.get_mut(&anchor) {
            Some(era) => {
                debug!("relabel era at {anchor} to '{label}'");
                era.set_label(label);
                UpsertOutcome::Updated
            }
            None => {
                let colour = colour_policy.next_colour();
                debug!("new era '{label}' at {anchor} ({colour})");
                self.0.insert(anchor, Era::new(label, colour));
                UpsertOutcome::Created
            }
        }
    }

    /// Remove the era at the anchor (if there is one)
    pub fn remove(&mut self, anchor: &Anchor) -> Option<Era> {
        let removed = self.0.remove(anchor);
        if removed.is_some() {
            debug!("removed era at {anchor}");
        }
        removed
    }

    /// Move the era at `source` so that it starts at `target` instead.  The
    /// era itself (label & colour) is moved, not copied.
    ///
    /// If the target already holds an era, `confirm_overwrite` is asked
    /// (passed the era that would be lost) and the move is abandoned, without
    /// any change, if it returns `false`.
    pub fn move_era<F>(
        &mut self,
        source: Anchor,
        target: Anchor,
        confirm_overwrite: F,
    ) -> MoveOutcome
    where
        F: FnOnce(&Era) -> bool,
    {
        if source == target || !self.contains(&source) {
            return MoveOutcome::Ignored;
        }
        if let Some(existing) = self.get(&target) {
            if !confirm_overwrite(existing) {
                debug!("declined overwriting era at {target}");
                return MoveOutcome::Declined;
            }
        }
        let Some(era) = self.0.remove(&source) else {
            return MoveOutcome::Ignored;
        };
        debug!("moved era '{}' from {source} to {target}", era.label());
        self.0.insert(target, era);
        MoveOutcome::Moved
    }

    /// Remove every era
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Swap the whole store for another (e.g. after an import)
    pub fn replace_all(&mut self, other: EraStore) {
        *self = other;
    }
}

impl FromIterator<(Anchor, Era)> for EraStore {
    fn from_iter<T: IntoIterator<Item = (Anchor, Era)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::{CyclingColours, anchor, store_with};
    use crate::PALETTE;

    #[test]
    fn upsert_creates_with_fresh_colour() {
        let mut store = EraStore::new();
        let mut colours = CyclingColours::new();
        let outcome = store.upsert(anchor(0, 0), "  Born ", &mut colours);
        assert_eq!(outcome, UpsertOutcome::Created);
        let era = store.get(&anchor(0, 0)).unwrap();
        assert_eq!(era.label().as_str(), "Born");
        assert_eq!(era.colour(), PALETTE[0]);
    }

    #[test]
    fn upsert_keeps_colour_when_relabelling() {
        let mut store = EraStore::new();
        let mut colours = CyclingColours::new();
        store.upsert(anchor(0, 0), "Born", &mut colours);
        store.upsert(anchor(1, 0), "Toddler", &mut colours);
        let outcome = store.upsert(anchor(0, 0), "Arrived", &mut colours);
        assert_eq!(outcome, UpsertOutcome::Updated);
        let era = store.get(&anchor(0, 0)).unwrap();
        assert_eq!(era.label().as_str(), "Arrived");
        assert_eq!(era.colour(), PALETTE[0]);
    }

    #[test]
    fn upsert_with_empty_label_removes() {
        let mut store = store_with(&[(0, 0, "Born"), (2, 0, "Nursery")]);
        let mut colours = CyclingColours::new();
        assert_eq!(
            store.upsert(anchor(2, 0), "   ", &mut colours),
            UpsertOutcome::Removed
        );
        assert!(!store.contains(&anchor(2, 0)));
        assert_eq!(
            store.upsert(anchor(2, 0), "", &mut colours),
            UpsertOutcome::Unchanged
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_is_a_no_op_when_absent() {
        let mut store = store_with(&[(0, 0, "Born")]);
        assert!(store.remove(&anchor(3, 3)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn move_relocates_the_same_era() {
        let mut store = store_with(&[(5, 35, "School")]);
        let before = store.get(&anchor(5, 35)).cloned().unwrap();
        let outcome = store.move_era(anchor(5, 35), anchor(6, 0), |_| panic!("no conflict"));
        assert_eq!(outcome, MoveOutcome::Moved);
        assert!(!store.contains(&anchor(5, 35)));
        assert_eq!(store.get(&anchor(6, 0)), Some(&before));
    }

    #[test]
    fn move_ignores_same_or_empty_source() {
        let mut store = store_with(&[(5, 35, "School")]);
        let snapshot = store.clone();
        assert_eq!(
            store.move_era(anchor(5, 35), anchor(5, 35), |_| true),
            MoveOutcome::Ignored
        );
        assert_eq!(
            store.move_era(anchor(1, 1), anchor(5, 35), |_| true),
            MoveOutcome::Ignored
        );
        assert_eq!(store, snapshot);
    }

    #[test]
    fn move_onto_occupied_target_asks_first() {
        let mut store = store_with(&[(5, 35, "School"), (18, 35, "College")]);
        let snapshot = store.clone();

        // Declined: nothing changes
        let mut asked_about = None;
        let outcome = store.move_era(anchor(5, 35), anchor(18, 35), |existing| {
            asked_about = Some(existing.label().to_string());
            false
        });
        assert_eq!(outcome, MoveOutcome::Declined);
        assert_eq!(asked_about.as_deref(), Some("College"));
        assert_eq!(store, snapshot);

        // Accepted: the target is overwritten
        let school = store.get(&anchor(5, 35)).cloned().unwrap();
        let outcome = store.move_era(anchor(5, 35), anchor(18, 35), |_| true);
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&anchor(18, 35)), Some(&school));
    }

    #[test]
    fn clear_and_replace_all() {
        let mut store = store_with(&[(0, 0, "Born"), (5, 35, "School")]);
        let other = store_with(&[(22, 20, "Graduated")]);
        store.replace_all(other.clone());
        assert_eq!(store, other);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn iterates_in_canonical_order() {
        let store = store_with(&[(18, 35, "C"), (0, 0, "A"), (5, 35, "B"), (5, 2, "B0")]);
        let order: Vec<String> = store.iter().map(|(a, _)| a.to_string()).collect();
        assert_eq!(order, vec!["0-0", "5-2", "5-35", "18-35"]);
    }

    #[test]
    fn range_walks_both_ways() {
        let store = store_with(&[(18, 35, "C"), (0, 0, "A"), (5, 35, "B"), (5, 2, "B0")]);
        let (latest, era) = store.range(..=anchor(6, 0)).next_back().unwrap();
        assert_eq!(latest, &anchor(5, 35));
        assert_eq!(era.label().as_str(), "B");
        let (earliest, _) = store.range(anchor(5, 0)..).next().unwrap();
        assert_eq!(earliest, &anchor(5, 2));
        assert!(store.range(..anchor(0, 0)).next_back().is_none());
    }
}
