// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider Life Calendar project*
//!
//! This library crate provides the GUI parts of the GUI application.  It is
//! used to build the Life Calendar native GUI application.
//!

mod app;
mod config;
mod consts;
mod dialogs;

pub use app::{GuiError, LifeCalendarApp};
pub use config::{Config, ConfigError, default_data_file_path};
pub use consts::DEFAULT_WINDOW_SIZE;

#[macro_use]
extern crate log;
