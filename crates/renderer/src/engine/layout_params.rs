// SPDX-License-Identifier: MIT

//!
//! Layout params
//!

use crate::{Point, Position};
use life_calendar_core::{Granularity, TOTAL_YEARS};
use serde::Serialize;
use std::fmt::Debug;

/// Layout parameters that are derived from the size of measured text
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MeasuredLayoutParams {
    /// The height of a line of label text
    pub label_height: f64,

    /// The width of the widest row label
    pub row_label_width: f64,
}

/// Layout parameters that users can adjust
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayoutParams {
    /// The width & height of a block
    pub cell_size: f64,

    /// The space between blocks in a row
    pub cell_gap: f64,

    /// The space between rows (room for the labels above and below blocks)
    pub row_gap: f64,

    /// The space around the whole grid
    pub padding: f64,

    /// The space between the row labels and the first block of each row
    pub row_label_margin: f64,

    /// The padding inside an era label's box
    pub label_padding: f64,

    pub font_size_px: f64,
}

impl GridLayoutParams {
    /// The default layout for the granularity (coarser views get bigger
    /// blocks)
    pub fn for_granularity(granularity: Granularity) -> Self {
        let cell_size = match granularity {
            Granularity::Weeks => 12.0,
            Granularity::Months => 16.0,
            Granularity::Years => 40.0,
        };
        Self {
            cell_size,
            ..Self::default()
        }
    }
}

impl Default for GridLayoutParams {
    fn default() -> Self {
        GridLayoutParams {
            cell_size: 12.0,
            cell_gap: 2.0,
            row_gap: 4.0,
            padding: 24.0,
            row_label_margin: 8.0,
            label_padding: 2.0,
            font_size_px: 10.0,
        }
    }
}

/// How the blocks of a granularity are arranged into rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowShape {
    /// The number of age-years in each row
    pub years_per_row: u32,

    /// The number of blocks in each (full) row
    pub cells_per_row: u32,
}

impl RowShape {
    /// - Weeks: one row per year
    /// - Months: 5 years per row
    /// - Years: 10 years per row
    pub fn of(granularity: Granularity) -> Self {
        let years_per_row = match granularity {
            Granularity::Weeks => 1,
            Granularity::Months => 5,
            Granularity::Years => 10,
        };
        RowShape {
            years_per_row,
            cells_per_row: years_per_row * granularity.blocks_per_year(),
        }
    }

    /// The number of rows needed for the whole calendar
    pub fn row_count(&self) -> u32 {
        TOTAL_YEARS.div_ceil(self.years_per_row)
    }

    /// The row and column of a block
    pub fn row_and_column(
        &self,
        year: u32,
        index_in_year: u32,
        blocks_per_year: u32,
    ) -> (u32, u32) {
        let row = year / self.years_per_row;
        let column = (year % self.years_per_row) * blocks_per_year + index_in_year;
        (row, column)
    }

    /// The text labelling a row (if any).  Weeks rows are labelled every 5
    /// years, other rows with the range of years they hold.
    pub fn row_label(&self, granularity: Granularity, row: u32) -> Option<String> {
        let start = row * self.years_per_row;
        match granularity {
            Granularity::Weeks => (start % 5 == 0).then(|| start.to_string()),
            Granularity::Months | Granularity::Years => {
                let end = (start + self.years_per_row - 1).min(TOTAL_YEARS - 1);
                Some(format!("{start}-{end}"))
            }
        }
    }
}

/// A box that specifies the location and size of something (e.g. the location
/// and size of a block)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PositionAndSize {
    /// The smallest x/y values (boxes grow down and to the right from here)
    pub position: Position,

    /// The width of the box (from which the largest x value can be derived)
    pub width: f64,

    /// The height of the box (from which the largest y value can be derived)
    pub height: f64,
}

impl PositionAndSize {
    /// Calculate the largest x value of the box
    pub fn max_x(&self) -> f64 {
        self.position.x + self.width
    }

    /// Calculate the largest y value of the box (i.e. how far the box grows
    /// downwards)
    pub fn max_y(&self) -> f64 {
        self.position.y + self.height
    }

    /// Whether the point is inside the box (edges included)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.x <= self.max_x()
            && point.y >= self.position.y
            && point.y <= self.max_y()
    }

    /// The box with every coordinate and length scaled by the factor
    pub fn scaled(&self, factor: f64) -> Self {
        PositionAndSize {
            position: self.position.scaled(factor),
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}
