// SPDX-License-Identifier: MIT

//!
//! Exporting eras to, and importing them from, CSV
//!
//! The format is:
//!
//! ```text
//! # BirthYear: 1990
//! Year,Week,Description,Color
//! 0,0,"Born",#ff6b6b
//! 5,35,"Elementary ""Big"" School",#54a0ff
//! ```
//!

use crate::{Anchor, Colour, Era, EraStore, Label};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// The column header line
pub const CSV_HEADER: &str = "Year,Week,Description,Color";

/// The prefix of the line holding the birth year
pub const BIRTH_YEAR_PREFIX: &str = "# BirthYear:";

/// Year, week, quoted description (quotes doubled), hex colour
static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(\d+),(\d+),"(.*)",(#\w+)$"#).expect("valid CSV row regex"));

/// The result of reading a CSV export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvImport {
    /// Every era read from a well formed row
    pub eras: EraStore,

    /// The birth year, if the file held a readable `# BirthYear:` line
    pub birth_year: Option<i32>,
}

impl CsvImport {
    /// The number of eras read
    pub fn count(&self) -> usize {
        self.eras.len()
    }
}

/// Write every era (in canonical order), preceded by the birth year and the
/// column header
pub fn export_csv(store: &EraStore, birth_year: i32) -> String {
    let mut csv = format!("{BIRTH_YEAR_PREFIX} {birth_year}\n{CSV_HEADER}\n");
    for (anchor, era) in store.iter() {
        let description = era.label().as_str().replace('"', "\"\"");
        csv.push_str(&format!(
            "{},{},\"{description}\",{}\n",
            anchor.year(),
            anchor.week(),
            era.colour().to_hex()
        ));
    }
    csv
}

/// Read a CSV export.  Each line is read on its own (after trimming); blank
/// lines, the header, and lines that aren't well formed rows are skipped.
///
/// Nothing is changed by reading: applying the result (after confirmation) is
/// up to the caller.
pub fn import_csv(text: &str) -> CsvImport {
    let mut eras = EraStore::new();
    let mut birth_year = None;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("Year,Week") {
            continue;
        }
        if let Some(year) = line.strip_prefix(BIRTH_YEAR_PREFIX) {
            match year.trim().parse::<i32>() {
                Ok(year) => birth_year = Some(year),
                Err(_) => debug!("Skipping unreadable birth year line '{line}'"),
            }
            continue;
        }
        match parse_row(line) {
            Some((anchor, era)) => {
                eras.insert(anchor, era);
            }
            None => debug!("Skipping CSV line '{line}'"),
        }
    }
    CsvImport { eras, birth_year }
}

fn parse_row(line: &str) -> Option<(Anchor, Era)> {
    let captures = ROW_RE.captures(line)?;
    let year = captures[1].parse().ok()?;
    let week = captures[2].parse().ok()?;
    let anchor = Anchor::new(year, week).ok()?;
    let label = Label::from(captures[3].replace("\"\"", "\"")).ok()?;
    let colour = Colour::from_hex(&captures[4]).ok()?;
    Some((anchor, Era::new(label, colour)))
}
