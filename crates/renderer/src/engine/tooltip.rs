// SPDX-License-Identifier: MIT

//!
//! Tooltips
//!

use life_calendar_core::{Granularity, MONTH_NAMES, ResolvedBlock, month_name_of};

/// The tooltip shown when hovering over a block.
///
/// Weeks & months show the block's era (its own if one starts there,
/// otherwise the one carried into it), the age, the calendar year and the
/// month.  Years list every era starting in the year, or show the era carried
/// into it.
pub fn tooltip_text(block: &ResolvedBlock<'_>, birth_year: i32) -> String {
    let age = block.year;
    let calendar_year = i64::from(birth_year) + i64::from(block.year);
    let age_and_year = format!("Age: {age} | Year: {calendar_year}");

    let era_name = block
        .starts
        .first()
        .map(|(_, era)| *era)
        .or(block.era)
        .map(|era| era.label().as_str());

    let mut lines = Vec::new();
    match block.granularity {
        Granularity::Weeks | Granularity::Months => {
            let month = match block.granularity {
                Granularity::Weeks => month_name_of(block.index_in_year),
                _ => MONTH_NAMES[block.index_in_year.min(11) as usize],
            };
            lines.extend(era_name.map(str::to_string));
            lines.push(age_and_year);
            lines.push(format!("Month: {month}"));
        }
        Granularity::Years => {
            if block.is_era_start() {
                lines.push("Events:".to_string());
                for (_, era) in &block.starts {
                    lines.push(format!("• {}", era.label()));
                }
                lines.push(String::new());
            } else {
                lines.extend(era_name.map(str::to_string));
            }
            lines.push(age_and_year);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use life_calendar_core::{Anchor, EraStore, PaletteColours, current_cursor, resolve};

    fn store() -> EraStore {
        let mut colours = PaletteColours::new();
        let mut store = EraStore::new();
        for (year, week, label) in [(0, 0, "Born"), (5, 10, "A"), (5, 40, "B")] {
            store.upsert(Anchor::new(year, week).unwrap(), label, &mut colours);
        }
        store
    }

    fn tooltips(store: &EraStore, granularity: Granularity) -> Vec<String> {
        let cursor = current_cursor(1990, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        resolve(store, granularity, &cursor)
            .iter()
            .map(|block| tooltip_text(block, 1990))
            .collect()
    }

    #[test]
    fn weeks() {
        let store = store();
        let tooltips = tooltips(&store, Granularity::Weeks);
        assert_eq!(tooltips[0], "Born\nAge: 0 | Year: 1990\nMonth: Jan");
        assert_eq!(tooltips[3 * 52 + 26], "Born\nAge: 3 | Year: 1993\nMonth: Jul");
        assert_eq!(tooltips[5 * 52 + 40], "B\nAge: 5 | Year: 1995\nMonth: Oct");
    }

    #[test]
    fn weeks_without_era() {
        let store = EraStore::new();
        let tooltips = tooltips(&store, Granularity::Weeks);
        assert_eq!(tooltips[51], "Age: 0 | Year: 1990\nMonth: Dec");
    }

    #[test]
    fn months() {
        let store = store();
        let tooltips = tooltips(&store, Granularity::Months);
        assert_eq!(tooltips[5 * 12 + 2], "A\nAge: 5 | Year: 1995\nMonth: Mar");
        assert_eq!(tooltips[5 * 12 + 3], "A\nAge: 5 | Year: 1995\nMonth: Apr");
    }

    #[test]
    fn years() {
        let store = store();
        let tooltips = tooltips(&store, Granularity::Years);
        assert_eq!(tooltips[5], "Events:\n• A\n• B\n\nAge: 5 | Year: 1995");
        assert_eq!(tooltips[6], "B\nAge: 6 | Year: 1996");
        assert_eq!(tooltips[0], "Events:\n• Born\n\nAge: 0 | Year: 1990");
    }
}
