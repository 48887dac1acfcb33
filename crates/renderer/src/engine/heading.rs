// SPDX-License-Identifier: MIT

//!
//! Headings
//!

use crate::TextOut;
use serde::Serialize;
use std::fmt::Debug;

/// Information needed to draw the calendar's heading (e.g. "Life in Weeks"
/// and the line describing the view)
#[derive(Debug, Clone, Serialize)]
pub struct Heading {
    pub title: TextOut,
    pub description: TextOut,
}
