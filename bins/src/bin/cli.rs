// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider Life Calendar project*
//!
//! The Life Calendar command line tool.  It works on the same data file as the
//! desktop app.
//!

use clap::{Parser, Subcommand, ValueEnum, builder::PossibleValue};
use life_calendar_core::{
    Anchor, Granularity, JsonFileKeyValueStore, LifeCalendar, RESET_MESSAGE, ResolvedBlock,
    import_message, month_of_week, today,
};
use life_calendar_gui::default_data_file_path;
use life_calendar_renderer::{
    EXPORT_SCALE, Engine, GridInteractionEvent, ImageRasteriser, Prompt, RowShape,
    apply_interaction, export_png, tooltip_text,
};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[macro_use]
extern crate log;

/// Life Calendar entry point
fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // Setup logging
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("life_calendar")
        .build();
    TermLogger::init(level, config_log, TerminalMode::Stderr, ColorChoice::Auto)?;

    // Open the calendar
    let data_path = match args.data {
        Some(path) => path,
        None => default_data_file_path()?,
    };
    info!("Opening calendar at {}", data_path.display());
    let mut calendar = LifeCalendar::load(JsonFileKeyValueStore::open(&data_path)?)?;
    let mut prompt = StdinPrompt {
        input: io::stdin().lock(),
        output: io::stdout(),
        assume_yes: args.yes,
    };

    match args.command {
        Command::Show { view } => {
            let granularity = Granularity::from(view);
            let cursor = calendar.cursor(today());
            let blocks = calendar.resolve(granularity, &cursor);
            println!("{}", granularity.title());
            println!("{}", granularity.description());
            println!();
            print!("{}", text_grid(&blocks, granularity));
        }
        Command::List => {
            for (anchor, era) in calendar.eras().iter() {
                println!("{anchor}\t{}\t{}", era.colour(), era.label());
            }
        }
        Command::Info { anchor, view } => {
            let granularity = Granularity::from(view);
            let cursor = calendar.cursor(today());
            let blocks = calendar.resolve(granularity, &cursor);
            if let Some(block) = block_containing(&blocks, &anchor) {
                println!("{}", tooltip_text(block, calendar.birth_year()));
            }
        }
        Command::Edit { anchor } => {
            let current_label = calendar
                .era_at(&anchor)
                .map(|era| era.label().to_string())
                .unwrap_or_default();
            let event = GridInteractionEvent::Activate {
                anchor,
                current_label,
            };
            let applied = apply_interaction(&mut calendar, event, &mut prompt)?;
            println!("{applied:?}");
        }
        Command::Mark { anchor, label } => {
            let outcome = calendar.upsert(anchor, &label.join(" "))?;
            println!("{outcome:?}");
        }
        Command::Unmark { anchor } => match calendar.remove(&anchor)? {
            Some(era) => println!("Removed \"{}\"", era.label()),
            None => println!("No event starts at {anchor}"),
        },
        Command::Move { source, target } => {
            let event = GridInteractionEvent::Move { source, target };
            let applied = apply_interaction(&mut calendar, event, &mut prompt)?;
            println!("{applied:?}");
        }
        Command::BirthYear { year } => match year {
            Some(year) => calendar.set_birth_year(year)?,
            None => println!("{}", calendar.birth_year()),
        },
        Command::Reset => {
            if calendar.reset(|| prompt.confirm(RESET_MESSAGE))? {
                println!("Cleared all marked events");
            }
        }
        Command::ExportCsv { path } => {
            let csv = calendar.export_csv();
            match path {
                Some(path) => fs::write(path, csv)?,
                None => print!("{csv}"),
            }
        }
        Command::ImportCsv { path } => {
            let text = fs::read_to_string(path)?;
            let confirm = |count| prompt.confirm(&import_message(count));
            if calendar.import_csv(&text, confirm)?.is_some() {
                println!("Import successful!");
            }
        }
        Command::ExportPng { path, view } => {
            let mut engine = Engine::new(estimate_text_size);
            engine.set_granularity(Granularity::from(view));
            let cursor = calendar.cursor(today());
            engine.render(calendar.eras(), calendar.birth_year(), &cursor);
            export_png(&engine.scene(EXPORT_SCALE), Some(&ImageRasteriser), &path)?;
            println!("Exported to {}", path.display());
        }
    }

    Ok(())
}

/// Life Calendar CLI args using [clap]
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Life Calendar tool for viewing and editing a life calendar",
    after_help = "Blocks are given as <age-year>-<week>, e.g. 18-35"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the data file (defaults to the desktop app's)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(long, short, global = true)]
    pub yes: bool,

    /// Log what's happening
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the calendar as text
    Show {
        #[arg(long, value_enum, default_value_t = View::Weeks)]
        view: View,
    },

    /// List every event
    List,

    /// Print what's shown when hovering over the block holding the week
    Info {
        anchor: Anchor,

        #[arg(long, value_enum, default_value_t = View::Weeks)]
        view: View,
    },

    /// Edit (or unmark) the event starting at a week
    Edit { anchor: Anchor },

    /// Mark an event starting at a week
    Mark {
        anchor: Anchor,

        #[arg(required = true)]
        label: Vec<String>,
    },

    /// Unmark the event starting at a week
    Unmark { anchor: Anchor },

    /// Move the event starting at one week to another
    Move { source: Anchor, target: Anchor },

    /// Print or set the birth year
    BirthYear { year: Option<i32> },

    /// Clear all marked events
    Reset,

    /// Export the calendar as CSV (to stdout if no path is given)
    ExportCsv { path: Option<PathBuf> },

    /// Replace the calendar with a CSV export
    ImportCsv { path: PathBuf },

    /// Export the calendar as a PNG image
    ExportPng {
        path: PathBuf,

        #[arg(long, value_enum, default_value_t = View::Weeks)]
        view: View,
    },
}

/// The granularity to show the calendar at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Weeks,
    Months,
    Years,
}

impl ValueEnum for View {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Weeks, Self::Months, Self::Years]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            View::Weeks => Some(PossibleValue::new("weeks").help("One block per week")),
            View::Months => Some(PossibleValue::new("months").help("One block per month")),
            View::Years => Some(PossibleValue::new("years").help("One block per year")),
        }
    }
}

impl From<View> for Granularity {
    fn from(view: View) -> Self {
        match view {
            View::Weeks => Granularity::Weeks,
            View::Months => Granularity::Months,
            View::Years => Granularity::Years,
        }
    }
}

/// Asks questions on stdin/stdout
struct StdinPrompt<R: BufRead, W: Write> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    /// Ask, and read a line.  `None` at the end of the input.
    fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{question} ");
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Prompt for StdinPrompt<R, W> {
    fn edit_label(&mut self, message: &str, current: &str) -> Option<String> {
        if !current.is_empty() {
            let _ = writeln!(self.output, "Current: {current}");
        }
        self.ask(message)
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        self.ask(&format!("{message} [y/N]"))
            .is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
    }
}

/// Rough text measurements for rendering without a GUI (only the layout
/// depends on them, text isn't drawn into exported images)
fn estimate_text_size(font_size: f64, text: String) -> (f64, f64) {
    (font_size * 0.6 * text.chars().count() as f64, font_size * 1.2)
}

/// The block of `blocks` holding the week at `anchor`
fn block_containing<'a, 'b>(
    blocks: &'b [ResolvedBlock<'a>],
    anchor: &Anchor,
) -> Option<&'b ResolvedBlock<'a>> {
    let index_in_year = match blocks.first()?.granularity {
        Granularity::Weeks => anchor.week(),
        Granularity::Months => month_of_week(anchor.week()),
        Granularity::Years => 0,
    };
    blocks
        .iter()
        .find(|block| block.year == anchor.year() && block.index_in_year == index_in_year)
}

/// Draw the calendar as text, one row of blocks per line:
///
/// - `*` an era starts
/// - `#` covered by an era
/// - `-` empty and in the past
/// - `.` empty
fn text_grid(blocks: &[ResolvedBlock], granularity: Granularity) -> String {
    let row_shape = RowShape::of(granularity);
    let mut rows = vec![String::new(); row_shape.row_count() as usize];
    for block in blocks {
        let (row, _) = row_shape.row_and_column(
            block.year,
            block.index_in_year,
            granularity.blocks_per_year(),
        );
        let symbol = match (block.is_era_start(), block.era, block.is_past) {
            (true, _, _) => '*',
            (false, Some(_), _) => '#',
            (false, None, true) => '-',
            (false, None, false) => '.',
        };
        rows[row as usize].push(symbol);
    }
    let mut grid = String::new();
    for (row, blocks) in rows.iter().enumerate() {
        let label = row_shape
            .row_label(granularity, row as u32)
            .unwrap_or_default();
        grid.push_str(&format!("{label:>6} {blocks}\n"));
    }
    grid
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use life_calendar_core::{EraStore, MemoryKeyValueStore, PaletteColours, current_cursor};
    use life_calendar_renderer::EDIT_LABEL_MESSAGE;

    fn prompt(input: &str, assume_yes: bool) -> StdinPrompt<&[u8], Vec<u8>> {
        StdinPrompt {
            input: input.as_bytes(),
            output: Vec::new(),
            assume_yes,
        }
    }

    fn anchor(year: u32, week: u32) -> Anchor {
        Anchor::new(year, week).unwrap()
    }

    #[test]
    fn prompt_reads_labels() {
        let mut prompt = prompt("Primary School\n", false);
        let label = prompt.edit_label(EDIT_LABEL_MESSAGE, "Elementary School");
        assert_eq!(label.as_deref(), Some("Primary School"));
        let output = String::from_utf8(prompt.output).unwrap();
        assert_eq!(
            output,
            "Current: Elementary School\nEnter event description (leave empty to unmark): "
        );
    }

    #[test]
    fn prompt_cancels_at_end_of_input() {
        let mut prompt = prompt("", false);
        assert_eq!(prompt.edit_label(EDIT_LABEL_MESSAGE, ""), None);
        assert!(!prompt.confirm("Sure?"));
    }

    #[test]
    fn prompt_confirms() {
        assert!(prompt("y\n", false).confirm("Sure?"));
        assert!(prompt("yes\n", false).confirm("Sure?"));
        assert!(!prompt("n\n", false).confirm("Sure?"));
        assert!(!prompt("\n", false).confirm("Sure?"));
        assert!(prompt("", true).confirm("Sure?"));
    }

    #[test]
    fn move_through_prompt() {
        let mut calendar = LifeCalendar::load_with(
            MemoryKeyValueStore::new(),
            Box::new(PaletteColours::new()),
            1990,
        )
        .unwrap();
        let event = GridInteractionEvent::Move {
            source: anchor(5, 35),
            target: anchor(18, 35),
        };
        let mut prompt = prompt("y\n", false);
        let applied = apply_interaction(&mut calendar, event, &mut prompt).unwrap();
        assert!(applied.changed_calendar());
        assert_eq!(
            calendar.era_at(&anchor(18, 35)).map(|era| era.label().as_str()),
            Some("Elementary School")
        );
    }

    #[test]
    fn grid_of_years() {
        let mut store = EraStore::default();
        let mut colours = PaletteColours::new();
        store.upsert(anchor(2, 10), "School", &mut colours);
        let cursor = current_cursor(2000, new_years_day(2001));
        let blocks = life_calendar_core::resolve(&store, Granularity::Years, &cursor);
        let grid = text_grid(&blocks, Granularity::Years);
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "   0-9 -.*#######");
        assert_eq!(lines[9], " 90-94 #####");
    }

    #[test]
    fn finds_block_containing_week() {
        let store = EraStore::default();
        let cursor = current_cursor(2000, new_years_day(2001));
        let blocks = life_calendar_core::resolve(&store, Granularity::Months, &cursor);
        let block = block_containing(&blocks, &anchor(3, 51)).unwrap();
        assert_eq!((block.year, block.index_in_year), (3, 11));
    }

    #[test]
    fn every_week_finds_the_month_it_starts_in() {
        let cursor = current_cursor(2000, new_years_day(2001));
        let mut colours = PaletteColours::new();
        for week in 0..52 {
            let mut store = EraStore::default();
            store.upsert(anchor(3, week), "Event", &mut colours);
            let blocks = life_calendar_core::resolve(&store, Granularity::Months, &cursor);
            let block = block_containing(&blocks, &anchor(3, week)).unwrap();
            assert!(block.is_era_start(), "week {week}");
            assert_eq!(block.starts[0].0, anchor(3, week));
        }
    }

    fn new_years_day(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
    }
}
