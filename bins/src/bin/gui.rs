// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! The Life Calendar desktop app
//!

use eframe::egui::ViewportBuilder;
use life_calendar_gui::{DEFAULT_WINDOW_SIZE, LifeCalendarApp};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};

#[macro_use]
extern crate log;
extern crate simplelog;

/// Entry point for the native GUI desktop application
fn main() -> Result<(), eframe::Error> {
    // Setup logging
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("life_calendar")
        .build();

    if let Err(error) = CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Debug,
        config_log,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]) {
        eprintln!("Unable to set up logging: {error}");
    }

    // Setup the main window's default options
    let main_viewport_options = ViewportBuilder::default()
        .with_inner_size([DEFAULT_WINDOW_SIZE.width, DEFAULT_WINDOW_SIZE.height])
        .with_title("Life Calendar");

    // Setup the eframe options for a native application
    let options = eframe::NativeOptions {
        viewport: main_viewport_options,
        ..Default::default()
    };

    info!("Launching application");

    // Run the application
    eframe::run_native(
        "Life Calendar",
        options,
        Box::new(|cc| Ok(Box::new(LifeCalendarApp::new(&cc.egui_ctx)?))),
    )
}
