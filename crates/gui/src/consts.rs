// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Some configuration consts
//!

use std::ops::RangeInclusive;

pub struct WindowSize {
    pub width: f32,
    pub height: f32,
}

pub const DEFAULT_WINDOW_SIZE: WindowSize = WindowSize {
    width: 1200.0,
    height: 800.0,
};

pub const DIALOG_WIDTH: f32 = 320.0;

pub const BIRTH_YEAR_RANGE: RangeInclusive<i32> = 1900..=2100;

pub static CSV_FILE_NAME: &str = "life_events.csv";

/// e.g. "life-in-weeks.png"
pub fn png_file_name(view_title: &str) -> String {
    format!("{}.png", view_title.to_lowercase().replace(' ', "-"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn png_file_names() {
        assert_eq!(png_file_name("Life in Weeks"), "life-in-weeks.png");
        assert_eq!(png_file_name("Life in Years"), "life-in-years.png");
    }
}
