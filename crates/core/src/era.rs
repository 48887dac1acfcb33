// SPDX-License-Identifier: MIT

//!
//! The era type
//!

use crate::{Colour, Label};
use serde::{Deserialize, Serialize};

/// A labelled, coloured span of a life.  An era starts at an [`Anchor`] and
/// lasts until the next era starts.
///
/// Persisted as `{"text": "...", "color": "#rrggbb"}`.
///
/// [`Anchor`]: crate::Anchor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Era {
    #[serde(rename = "text")]
    label: Label,

    #[serde(rename = "color")]
    colour: Colour,
}

impl Era {
    /// Create a new era
    pub fn new(label: Label, colour: Colour) -> Self {
        Self { label, colour }
    }

    /// Get the era's label
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Replace the era's label (the colour is kept)
    pub fn set_label(&mut self, label: Label) {
        self.label = label;
    }

    /// Get the era's colour
    pub fn colour(&self) -> Colour {
        self.colour
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn persisted_shape() {
        let era = Era::new(
            Label::from("Born").unwrap(),
            Colour::from_hex("#ff6b6b").unwrap(),
        );
        let json = serde_json::to_string(&era).unwrap();
        assert_eq!(json, r##"{"text":"Born","color":"#ff6b6b"}"##);

        let back: Era = serde_json::from_str(&json).unwrap();
        assert_eq!(back, era);

        assert!(serde_json::from_str::<Era>(r##"{"text":"  ","color":"#ff6b6b"}"##).is_err());
    }
}
