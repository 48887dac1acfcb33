// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Life Calendar egui desktop app
//!

use crate::Config;
use crate::config::ConfigError;
use crate::consts::{BIRTH_YEAR_RANGE, CSV_FILE_NAME, png_file_name};
use crate::dialogs::{Dialog, handle_interaction};
use eframe::App;
use eframe::egui::{
    Button, CentralPanel, Color32, Context, DragValue, ScrollArea, TopBottomPanel, Ui,
};
use life_calendar_core::{
    Granularity, JsonFileKeyValueStore, LifeCalendar, PersistError, TimeCursor, today,
};
use life_calendar_renderer::{
    EXPORT_SCALE, GridInteractionEvent, ImageRasteriser, LifeCalendarRendererEgui, export_png,
};
use std::fs;
use std::time::Duration;
use thiserror::Error;

/// How often the app wakes up to check whether "now" has moved on
const CURSOR_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Errors that stop the app from starting
#[derive(Error, Debug)]
pub enum GuiError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// A message shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Info(String),
    Error(String),
}

/// All data needed for the Life Calendar (egui) desktop app
pub struct LifeCalendarApp {
    /// The config saved to disk
    config: Config,

    /// The calendar, saved to the data file named in the config
    calendar: LifeCalendar<JsonFileKeyValueStore>,

    /// Draws the calendar and reports clicks and drags
    renderer: LifeCalendarRendererEgui,

    /// Whether the calendar has changed since it was last rendered
    render_required: bool,

    /// Where "now" was when the calendar was last rendered
    rendered_cursor: Option<TimeCursor>,

    /// The question waiting on the user, if any
    dialog: Option<Dialog>,

    /// The last thing the user was told
    status: Option<Status>,
}

impl LifeCalendarApp {
    /// Create a new `LifeCalendarApp`, loading the config and the calendar
    pub fn new(ctx: &Context) -> Result<Self, GuiError> {
        let config = Config::load()?;
        info!("Opening calendar at {}", config.data_path().display());
        let kv_store = JsonFileKeyValueStore::open(config.data_path())?;
        let calendar = LifeCalendar::load(kv_store)?;
        let mut renderer = LifeCalendarRendererEgui::new(ctx);
        renderer.set_granularity(config.granularity());
        Ok(Self {
            config,
            calendar,
            renderer,
            render_required: true,
            rendered_cursor: None,
            dialog: None,
            status: None,
        })
    }

    /// Re-resolve the whole calendar for the current view
    fn render(&mut self, cursor: TimeCursor) {
        debug!("Rendering the calendar");
        self.renderer
            .render(self.calendar.eras(), self.calendar.birth_year(), &cursor);
        self.render_required = false;
        self.rendered_cursor = Some(cursor);
    }

    fn set_status_error(&mut self, message: String) {
        error!("{message}");
        self.status = Some(Status::Error(message));
    }

    /// Note the outcome of something that saved the calendar
    fn after_persisting(&mut self, result: Result<bool, PersistError>) {
        match result {
            Ok(changed) => self.render_required |= changed,
            Err(error) => {
                self.render_required = true;
                self.set_status_error(format!("Failed to save: {error}"));
            }
        }
    }

    fn set_granularity(&mut self, granularity: Granularity) {
        if granularity == self.renderer.granularity() {
            return;
        }
        info!("Showing {}", granularity.title());
        self.renderer.set_granularity(granularity);
        self.render_required = true;
        self.config.set_granularity(granularity);
        if let Err(error) = self.config.save() {
            self.set_status_error(format!("Failed to save config: {error}"));
        }
    }

    fn set_birth_year(&mut self, birth_year: i32) {
        let result = self.calendar.set_birth_year(birth_year).map(|_| true);
        self.after_persisting(result);
    }

    fn export_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(CSV_FILE_NAME)
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        match fs::write(&path, self.calendar.export_csv()) {
            Ok(()) => {
                info!("Exported CSV to {}", path.display());
                self.status = Some(Status::Info(format!("Exported to {}", path.display())));
            }
            Err(error) => self.set_status_error(format!("Failed to export CSV: {error}")),
        }
    }

    fn import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        else {
            return;
        };
        match fs::read_to_string(&path) {
            Ok(text) => self.dialog = Some(Dialog::import(text)),
            Err(error) => self.set_status_error(format!("Failed to read CSV: {error}")),
        }
    }

    fn export_png(&mut self) {
        let file_name = png_file_name(&self.renderer.granularity().title());
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(file_name)
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return;
        };
        let scene = self.renderer.scene(EXPORT_SCALE);
        match export_png(&scene, Some(&ImageRasteriser), &path) {
            Ok(()) => {
                self.status = Some(Status::Info(format!("Exported to {}", path.display())))
            }
            Err(error) => {
                warn!("Image export failed: {error}");
                self.set_status_error(String::from("Failed to export image."));
            }
        }
    }

    fn draw_toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let current = self.renderer.granularity();
            for granularity in Granularity::all() {
                let tab = Button::selectable(current == granularity, granularity.name());
                if ui.add(tab).clicked() {
                    self.set_granularity(granularity);
                }
            }
            ui.separator();

            ui.label("Birth year:");
            let mut birth_year = self.calendar.birth_year();
            let birth_year_input = DragValue::new(&mut birth_year).range(BIRTH_YEAR_RANGE);
            if ui.add(birth_year_input).changed() {
                self.set_birth_year(birth_year);
            }
            ui.separator();

            if ui.button("Reset").clicked() {
                self.dialog = Some(Dialog::reset());
            }
            if ui.button("Export CSV").clicked() {
                self.export_csv();
            }
            if ui.button("Import CSV").clicked() {
                self.import_csv();
            }
            if ui.button("Export PNG").clicked() {
                self.export_png();
            }
        });
    }

    fn draw_status(&self, ui: &mut Ui) {
        match &self.status {
            Some(Status::Info(message)) => {
                ui.label(message);
            }
            Some(Status::Error(message)) => {
                ui.colored_label(Color32::RED, message);
            }
            None => {
                ui.label("Click a block to mark an event.  Drag an event to move it.");
            }
        }
    }

    /// Act on the clicks and drags the renderer has seen
    fn handle_interaction_events(&mut self) {
        let events: Vec<_> = self.renderer.drain_interaction_events().collect();
        for event in events {
            if matches!(event, GridInteractionEvent::Hover(_)) {
                continue;
            }
            if self.dialog.is_some() {
                debug!("Ignoring {event:?} while a dialog is open");
                continue;
            }
            match handle_interaction(&mut self.calendar, event) {
                Ok((applied, dialog)) => {
                    self.render_required |= applied.changed_calendar();
                    self.dialog = dialog;
                }
                Err(error) => self.after_persisting(Err(error)),
            }
        }
    }

    fn draw_dialog(&mut self, ctx: &Context) {
        let Some(answer) = self.dialog.as_mut().and_then(|dialog| dialog.draw(ctx)) else {
            return;
        };
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        match dialog.answer(&mut self.calendar, answer) {
            Ok(outcome) => {
                self.render_required |= outcome.changed_calendar;
                if let Some(message) = outcome.status {
                    self.status = Some(Status::Info(message));
                }
            }
            Err(error) => self.after_persisting(Err(error)),
        }
    }
}

impl App for LifeCalendarApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.draw_status(ui);
        });

        // Rendering is only done when something has changed, or when "now"
        // has moved on to a new block
        let cursor = self.calendar.cursor(today());
        if render_due(self.render_required, self.rendered_cursor.as_ref(), &cursor) {
            self.render(cursor);
        }
        ctx.request_repaint_after(CURSOR_CHECK_INTERVAL);

        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::both().show(ui, |ui| {
                self.renderer.draw(ui);
            });
        });

        self.handle_interaction_events();
        self.draw_dialog(ctx);
    }
}

/// Whether the calendar needs rendering again
fn render_due(render_required: bool, rendered: Option<&TimeCursor>, now: &TimeCursor) -> bool {
    render_required || rendered != Some(now)
}
