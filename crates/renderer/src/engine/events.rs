// SPDX-License-Identifier: MIT

//!
//! Events
//!

use life_calendar_core::Anchor;
use serde::Serialize;
use std::fmt::Debug;

/// Interaction events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GridInteractionEvent {
    /// A block was activated (clicked).  Carries the block's representative
    /// anchor and the label of the era starting there (empty if none).
    Activate { anchor: Anchor, current_label: String },

    /// An era was dragged from `source` and dropped on the block represented
    /// by `target`
    Move { source: Anchor, target: Anchor },

    /// The pointer moved onto a block
    Hover(Anchor),
}
