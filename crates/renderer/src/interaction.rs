// SPDX-License-Identifier: MIT

//!
//! Applying interaction events to a life calendar
//!

use crate::GridInteractionEvent;
use life_calendar_core::{
    KeyValueStore, LifeCalendar, MoveOutcome, PersistError, UpsertOutcome, overwrite_message,
};
use log::debug;

/// The message shown when asking for an era's label
pub const EDIT_LABEL_MESSAGE: &str = "Enter event description (leave empty to unmark):";

/// Implementing types ask the user things
pub trait Prompt {
    /// Ask for a label, seeded with `current`.  `None` means cancelled.
    fn edit_label(&mut self, message: &str, current: &str) -> Option<String>;

    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;
}

/// What applying an interaction event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Upserted(UpsertOutcome),
    Moved(MoveOutcome),

    /// The user cancelled, or the event doesn't change anything
    Nothing,
}

impl Applied {
    /// Whether the calendar changed (and so needs re-rendering)
    pub fn changed_calendar(&self) -> bool {
        matches!(
            self,
            Applied::Upserted(
                UpsertOutcome::Created | UpsertOutcome::Updated | UpsertOutcome::Removed
            ) | Applied::Moved(MoveOutcome::Moved)
        )
    }
}

/// Apply an interaction event to the calendar, asking the user through the
/// prompt where needed:
///
/// - Activating a block asks for a label (an empty one removes the era)
/// - Moving onto a block that starts an era asks before overwriting it
pub fn apply_interaction<S: KeyValueStore>(
    calendar: &mut LifeCalendar<S>,
    event: GridInteractionEvent,
    prompt: &mut dyn Prompt,
) -> Result<Applied, PersistError> {
    match event {
        GridInteractionEvent::Activate {
            anchor,
            current_label,
        } => match prompt.edit_label(EDIT_LABEL_MESSAGE, &current_label) {
            Some(label) => Ok(Applied::Upserted(calendar.upsert(anchor, &label)?)),
            None => {
                debug!("editing {anchor} cancelled");
                Ok(Applied::Nothing)
            }
        },
        GridInteractionEvent::Move { source, target } => {
            let outcome = calendar.move_era(source, target, |existing| {
                prompt.confirm(&overwrite_message(existing))
            })?;
            Ok(Applied::Moved(outcome))
        }
        GridInteractionEvent::Hover(_) => Ok(Applied::Nothing),
    }
}
