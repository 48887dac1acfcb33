// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Non-blocking dialogs
//!
//! A question that needs the user's answer is shown in a window drawn every
//! frame.  The change waiting on it is only carried out once the user answers.
//!

use crate::consts::DIALOG_WIDTH;
use eframe::egui::{Align2, Context, Key, Vec2, Window};
use life_calendar_core::{
    KeyValueStore, LifeCalendar, PersistError, RESET_MESSAGE, import_csv, import_message,
};
use life_calendar_renderer::{Applied, GridInteractionEvent, Prompt, apply_interaction};

/// What the user is being asked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    /// Edit some text, seeded with the current label
    EditLabel { message: String, text: String },

    /// Yes or no
    Confirm { message: String },
}

/// The user's answer to a [`Question`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Label(String),
    Yes,
    Cancel,
}

/// What's carried out once the question is answered
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingAction {
    Interaction(GridInteractionEvent),
    Reset,
    Import(String),
}

/// What answering a dialog did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOutcome {
    /// Whether the calendar changed (and so needs re-rendering)
    pub changed_calendar: bool,

    /// Something to tell the user
    pub status: Option<String>,
}

/// A question waiting on the user, and the change waiting on the answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    question: Question,
    action: PendingAction,
    focus_requested: bool,
}

/// Declines everything, remembering the first question asked
#[derive(Default)]
struct DeferringPrompt {
    question: Option<Question>,
}

impl Prompt for DeferringPrompt {
    fn edit_label(&mut self, message: &str, current: &str) -> Option<String> {
        self.question.get_or_insert_with(|| Question::EditLabel {
            message: message.to_string(),
            text: current.to_string(),
        });
        None
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.question.get_or_insert_with(|| Question::Confirm {
            message: message.to_string(),
        });
        false
    }
}

/// Gives the answer the user has already given
struct AnsweredPrompt(Answer);

impl Prompt for AnsweredPrompt {
    fn edit_label(&mut self, _message: &str, _current: &str) -> Option<String> {
        match &self.0 {
            Answer::Label(text) => Some(text.clone()),
            Answer::Yes | Answer::Cancel => None,
        }
    }

    fn confirm(&mut self, _message: &str) -> bool {
        self.0 == Answer::Yes
    }
}

/// Apply an interaction event to the calendar.  Anything that doesn't need
/// asking about (e.g. moving an era onto an empty block) is applied straight
/// away, otherwise a dialog is returned and nothing changes until it's
/// answered.
pub fn handle_interaction<S: KeyValueStore>(
    calendar: &mut LifeCalendar<S>,
    event: GridInteractionEvent,
) -> Result<(Applied, Option<Dialog>), PersistError> {
    let mut prompt = DeferringPrompt::default();
    let applied = apply_interaction(calendar, event.clone(), &mut prompt)?;
    let dialog = prompt
        .question
        .map(|question| Dialog::new(question, PendingAction::Interaction(event)));
    Ok((applied, dialog))
}

impl Dialog {
    fn new(question: Question, action: PendingAction) -> Self {
        Dialog {
            question,
            action,
            focus_requested: false,
        }
    }

    /// Ask before clearing the calendar
    pub fn reset() -> Self {
        let question = Question::Confirm {
            message: RESET_MESSAGE.to_string(),
        };
        Dialog::new(question, PendingAction::Reset)
    }

    /// Ask before replacing the calendar with the CSV `text`
    pub fn import(text: String) -> Self {
        let question = Question::Confirm {
            message: import_message(import_csv(&text).count()),
        };
        Dialog::new(question, PendingAction::Import(text))
    }

    pub fn title(&self) -> &'static str {
        match &self.action {
            PendingAction::Interaction(GridInteractionEvent::Move { .. }) => "Move Event",
            PendingAction::Interaction(_) => "Edit Event",
            PendingAction::Reset => "Reset",
            PendingAction::Import(_) => "Import CSV",
        }
    }

    /// Carry out the waiting change now that the user has answered
    pub fn answer<S: KeyValueStore>(
        self,
        calendar: &mut LifeCalendar<S>,
        answer: Answer,
    ) -> Result<DialogOutcome, PersistError> {
        debug!("{} answered with {answer:?}", self.title());
        let confirmed = answer == Answer::Yes;
        let outcome = match self.action {
            PendingAction::Interaction(event) => {
                let applied = apply_interaction(calendar, event, &mut AnsweredPrompt(answer))?;
                DialogOutcome {
                    changed_calendar: applied.changed_calendar(),
                    status: None,
                }
            }
            PendingAction::Reset => DialogOutcome {
                changed_calendar: calendar.reset(|| confirmed)?,
                status: None,
            },
            PendingAction::Import(text) => match calendar.import_csv(&text, |_| confirmed)? {
                Some(count) => DialogOutcome {
                    changed_calendar: true,
                    status: Some(format!("Import successful! ({count} events)")),
                },
                None => DialogOutcome::default(),
            },
        };
        Ok(outcome)
    }

    /// Draw the dialog.  Returns the user's answer once there is one.
    pub fn draw(&mut self, ctx: &Context) -> Option<Answer> {
        let mut answer = None;
        let title = self.title();
        let focus_requested = &mut self.focus_requested;
        Window::new(title)
            .collapsible(false)
            .resizable(false)
            .default_width(DIALOG_WIDTH)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| match &mut self.question {
                Question::EditLabel { message, text } => {
                    ui.label(message.as_str());
                    let response = ui.text_edit_singleline(text);
                    if !*focus_requested {
                        response.request_focus();
                        *focus_requested = true;
                    }
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() || submitted {
                            answer = Some(Answer::Label(text.clone()));
                        }
                        if ui.button("Cancel").clicked() {
                            answer = Some(Answer::Cancel);
                        }
                    });
                }
                Question::Confirm { message } => {
                    ui.label(message.as_str());
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            answer = Some(Answer::Yes);
                        }
                        if ui.button("Cancel").clicked() {
                            answer = Some(Answer::Cancel);
                        }
                    });
                }
            });
        if answer.is_none() && ctx.input(|i| i.key_pressed(Key::Escape)) {
            answer = Some(Answer::Cancel);
        }
        answer
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use life_calendar_core::{Anchor, MemoryKeyValueStore, MoveOutcome, PaletteColours};

    fn anchor(year: u32, week: u32) -> Anchor {
        Anchor::new(year, week).unwrap()
    }

    fn calendar() -> LifeCalendar<MemoryKeyValueStore> {
        LifeCalendar::load_with(MemoryKeyValueStore::new(), Box::new(PaletteColours::new()), 1990)
            .unwrap()
    }

    fn label_at(
        calendar: &LifeCalendar<MemoryKeyValueStore>,
        year: u32,
        week: u32,
    ) -> Option<String> {
        calendar
            .era_at(&anchor(year, week))
            .map(|era| era.label().to_string())
    }

    #[test]
    fn activation_waits_for_label() {
        let mut calendar = calendar();
        let event = GridInteractionEvent::Activate {
            anchor: anchor(30, 0),
            current_label: String::new(),
        };
        let (applied, dialog) = handle_interaction(&mut calendar, event).unwrap();
        assert_eq!(applied, Applied::Nothing);
        let dialog = dialog.unwrap();
        assert_eq!(dialog.title(), "Edit Event");
        assert_eq!(
            &dialog.question,
            &Question::EditLabel {
                message: "Enter event description (leave empty to unmark):".to_string(),
                text: String::new(),
            }
        );
        assert_eq!(label_at(&calendar, 30, 0), None);

        let outcome = dialog
            .answer(&mut calendar, Answer::Label("First Job".to_string()))
            .unwrap();
        assert!(outcome.changed_calendar);
        assert_eq!(label_at(&calendar, 30, 0).as_deref(), Some("First Job"));
    }

    #[test]
    fn cancelled_activation() {
        let mut calendar = calendar();
        let before = calendar.eras().clone();
        let event = GridInteractionEvent::Activate {
            anchor: anchor(5, 35),
            current_label: "Elementary School".to_string(),
        };
        let (_, dialog) = handle_interaction(&mut calendar, event).unwrap();
        let outcome = dialog.unwrap().answer(&mut calendar, Answer::Cancel).unwrap();
        assert_eq!(outcome, DialogOutcome::default());
        assert_eq!(calendar.eras(), &before);
    }

    #[test]
    fn move_onto_empty_block_needs_no_dialog() {
        let mut calendar = calendar();
        let event = GridInteractionEvent::Move {
            source: anchor(5, 35),
            target: anchor(6, 0),
        };
        let (applied, dialog) = handle_interaction(&mut calendar, event).unwrap();
        assert_eq!(applied, Applied::Moved(MoveOutcome::Moved));
        assert!(dialog.is_none());
        assert_eq!(label_at(&calendar, 6, 0).as_deref(), Some("Elementary School"));
    }

    #[test]
    fn move_onto_era_waits_for_confirmation() {
        let mut calendar = calendar();
        let before = calendar.eras().clone();
        let event = GridInteractionEvent::Move {
            source: anchor(5, 35),
            target: anchor(18, 35),
        };
        let (applied, dialog) = handle_interaction(&mut calendar, event).unwrap();
        assert_eq!(applied, Applied::Moved(MoveOutcome::Declined));
        assert_eq!(calendar.eras(), &before);
        let dialog = dialog.unwrap();
        assert_eq!(dialog.title(), "Move Event");
        assert_eq!(
            &dialog.question,
            &Question::Confirm {
                message: "Overwrite existing event \"Starting College\"?".to_string()
            }
        );
        let outcome = dialog.answer(&mut calendar, Answer::Yes).unwrap();
        assert!(outcome.changed_calendar);
        assert_eq!(label_at(&calendar, 18, 35).as_deref(), Some("Elementary School"));
        assert_eq!(label_at(&calendar, 5, 35), None);
    }

    #[test]
    fn reset() {
        let mut calendar = calendar();
        let outcome = Dialog::reset().answer(&mut calendar, Answer::Cancel).unwrap();
        assert!(!outcome.changed_calendar);
        assert_eq!(calendar.eras().len(), 4);

        let outcome = Dialog::reset().answer(&mut calendar, Answer::Yes).unwrap();
        assert!(outcome.changed_calendar);
        assert!(calendar.eras().is_empty());
    }

    #[test]
    fn import() {
        let mut calendar = calendar();
        let text = "# BirthYear: 1985\nYear,Week,Description,Color\n0,0,\"Born\",#ff6b6b\n";
        let dialog = Dialog::import(text.to_string());
        assert_eq!(
            &dialog.question,
            &Question::Confirm {
                message: "Importing will overwrite current data. Found 1 events. Proceed?"
                    .to_string()
            }
        );
        let outcome = dialog.answer(&mut calendar, Answer::Yes).unwrap();
        assert_eq!(
            outcome.status.as_deref(),
            Some("Import successful! (1 events)")
        );
        assert_eq!(calendar.eras().len(), 1);
        assert_eq!(calendar.birth_year(), 1985);
    }
}
