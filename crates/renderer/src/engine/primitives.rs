// SPDX-License-Identifier: MIT

//!
//! Primitives
//!

use crate::{LineStyle, Point, PositionAndSize};
use life_calendar_core::{Anchor, Colour};
use serde::Serialize;
use std::fmt::Debug;

/// Information needed to draw text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextOut {
    pub top_left: Point,
    pub text: String,
    pub colour: Colour,
    pub font_size: f64,
}

/// Information needed to draw a filled box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilledBox {
    pub position_and_size: PositionAndSize,
    pub fill_colour: Colour,
    pub border_style: Option<LineStyle>,
}

/// Whether an era label sits above or below the block it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelPlacement {
    Above,
    Below,
}

/// Information needed to draw an era label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellLabel {
    pub placement: LabelPlacement,
    pub text: TextOut,
    pub text_box: FilledBox,
}

/// Information needed to draw a block, and to interact with it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellOut {
    /// The block's representative anchor (what activating or dropping onto
    /// the block targets)
    pub anchor: Anchor,

    /// The age-year the block is in
    pub year: u32,

    /// The week, month, or 0 (years) within the year
    pub index_in_year: u32,

    pub cell_box: FilledBox,
    pub is_past: bool,
    pub is_era_start: bool,
    pub is_hovered_over: bool,

    /// The anchor of the era that can be dragged from this block (if any)
    pub drag_source: Option<Anchor>,

    /// The label of the era starting at the representative anchor (empty if
    /// none)
    pub current_label: String,

    pub label: Option<CellLabel>,
    pub tooltip: String,
}

/// Everything needed to paint the whole calendar onto an image, already
/// scaled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Colour,
    pub boxes: Vec<FilledBox>,
    pub texts: Vec<TextOut>,
}
