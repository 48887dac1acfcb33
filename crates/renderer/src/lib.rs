// SPDX-License-Identifier: MIT

//!
//! *Part of the wider Life Calendar project*
//!
//! This crate facilitates the drawing of life calendars.
//!
//! The core of the crate is a platform independent engine responsible for:
//!
//! - Laying out the blocks of a calendar at week, month, or year granularity
//! - Placing era labels (alternately above and below the blocks they start)
//! - Working out tooltips and which blocks are in the past
//! - Turning pointer input (clicks, drags, drops) into interaction events
//! - Providing a simple API for frontends
//!
//! The rest of the crate holds:
//!
//! - The `egui` frontend for native desktop rendering
//! - Applying interaction events to a [`LifeCalendar`] through a [`Prompt`]
//! - Exporting the calendar as a PNG image through a [`Rasteriser`]
//!
//! [`LifeCalendar`]: life_calendar_core::LifeCalendar
//!

pub mod engine;
pub mod frontends;
pub mod interaction;
pub mod raster;

pub use engine::*;
pub use frontends::desktop_egui::LifeCalendarRendererEgui;
pub use interaction::*;
pub use raster::*;
