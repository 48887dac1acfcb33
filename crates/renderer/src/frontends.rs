// SPDX-License-Identifier: MIT

//!
//! Frontends that draw the calendar laid out by the [`Engine`]
//!
//! [`Engine`]: crate::Engine
//!

pub mod desktop_egui;
