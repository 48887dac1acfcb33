// SPDX-License-Identifier: MIT

//!
//! Colours
//!

use life_calendar_core::Colour;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellColourModifier {
    Lighten,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub colour: Colour,
    pub thickness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    pub fill_colour: Colour,
    pub border: Option<LineStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    /// The fill of a block no era covers
    pub empty_fill_colour: Colour,

    /// The fill of a past block no era covers
    pub past_empty_fill_colour: Colour,

    /// The border drawn around past blocks
    pub past_border: Option<LineStyle>,

    /// The border drawn around blocks that start an era
    pub era_start_border: Option<LineStyle>,

    pub hover_colour: CellColourModifier,

    /// The border drawn around the block an era is being dragged over
    pub drop_target_border: LineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub text_box: BoxStyle,
    pub text_colour: Colour,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridColours {
    /// Behind the whole grid (also the background of exported images)
    pub background: Colour,
    pub cell: CellStyle,
    pub label: LabelStyle,
    pub row_label_text_colour: Colour,
    pub heading_text_colour: Colour,
}

impl Default for GridColours {
    fn default() -> Self {
        Self {
            background: Colour::from_rgb(0xff, 0xff, 0xff),
            cell: CellStyle {
                empty_fill_colour: Colour::from_rgb(0xeb, 0xed, 0xf0),
                past_empty_fill_colour: Colour::from_rgb(0xc8, 0xcc, 0xd2),
                past_border: Some(LineStyle {
                    colour: Colour::from_rgb(0x55, 0x5b, 0x66),
                    thickness: 1.0,
                }),
                era_start_border: Some(LineStyle {
                    colour: Colour::from_rgb(0x22, 0x22, 0x22),
                    thickness: 1.5,
                }),
                hover_colour: CellColourModifier::Lighten,
                drop_target_border: LineStyle {
                    colour: Colour::from_rgb(0x00, 0x00, 0xaa),
                    thickness: 2.0,
                },
            },
            label: LabelStyle {
                text_box: BoxStyle {
                    fill_colour: Colour::from_rgb(0xff, 0xff, 0xff),
                    border: Some(LineStyle {
                        colour: Colour::from_rgb(0x33, 0x33, 0x33),
                        thickness: 0.5,
                    }),
                },
                text_colour: Colour::from_rgb(0x22, 0x22, 0x22),
            },
            row_label_text_colour: Colour::from_rgb(0x66, 0x66, 0x66),
            heading_text_colour: Colour::from_rgb(0x22, 0x22, 0x22),
        }
    }
}
