// SPDX-License-Identifier: MIT

//!
//! Persisting the eras and birth year through a simple key-value store, and
//! normalising the older shapes the eras were persisted in
//!

use crate::{Anchor, ColourPolicy, Colour, Era, EraStore, Label};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The key under which the eras are persisted
pub const ERAS_KEY: &str = "life_event_visualizer_data";

/// The key under which the birth year is persisted
pub const BIRTH_YEAR_KEY: &str = "life_event_visualizer_birth_year";

/// The label given to eras persisted as a bare list of marked blocks
pub const LEGACY_LABEL: &str = "Marked Event";

/// The eras a new (or emptied) calendar starts with
pub const DEFAULT_ERAS: [(u32, u32, &str); 4] = [
    (0, 0, "Born"),
    (5, 35, "Elementary School"),
    (18, 35, "Starting College"),
    (22, 20, "Graduated College"),
];

/// Errors that can arise while persisting
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Implementing types store string values under string keys.  This is all the
/// persistence a life calendar needs.
pub trait KeyValueStore {
    /// Get the value stored under the key (if any)
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Store the value under the key, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// A key-value store that lives only as long as the value does
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore(HashMap<String, String>);

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.0.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A key-value store backed by a single JSON file holding an object of
/// key → string.  The whole file is rewritten on every [`set`].
///
/// [`set`]: KeyValueStore::set
#[derive(Debug, Clone)]
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileKeyValueStore {
    /// Open the store at the path.  A missing file is an empty store, and so
    /// is a file that doesn't hold a JSON object of strings (it is replaced on
    /// the next write).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let data = fs::read_to_string(&path)?;
            match serde_json::from_str(&data) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!("Ignoring malformed data file {}: {error}", path.display());
                    BTreeMap::new()
                }
            }
        } else {
            info!("No data file at {}", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// The file backing the store
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        debug!("Saved {key} to {}", self.path.display());
        Ok(())
    }
}

/// Load the eras from the key-value store, normalising older shapes.
///
/// Missing or malformed data is treated as no data at all (an empty store is
/// returned).  Seeding the defaults is left to the caller.
pub fn load_eras(
    kv_store: &dyn KeyValueStore,
    colour_policy: &mut dyn ColourPolicy,
) -> Result<EraStore, PersistError> {
    let Some(data) = kv_store.get(ERAS_KEY)? else {
        info!("No persisted eras");
        return Ok(EraStore::new());
    };
    let value: Value = match serde_json::from_str(&data) {
        Ok(value) => value,
        Err(error) => {
            warn!("Ignoring malformed persisted eras: {error}");
            return Ok(EraStore::new());
        }
    };
    let store = normalise_eras(&value, colour_policy);
    info!("Loaded {} era(s)", store.len());
    Ok(store)
}

/// Save the eras as a JSON object of `"year-week"` → `{"text", "color"}`
pub fn save_eras(kv_store: &mut dyn KeyValueStore, store: &EraStore) -> Result<(), PersistError> {
    let json = serde_json::to_string(store)?;
    kv_store.set(ERAS_KEY, &json)
}

/// Load the birth year, falling back to `fallback` if it's missing or isn't
/// an integer
pub fn load_birth_year(kv_store: &dyn KeyValueStore, fallback: i32) -> Result<i32, PersistError> {
    let birth_year = kv_store
        .get(BIRTH_YEAR_KEY)?
        .and_then(|year| year.trim().parse::<i32>().ok())
        .unwrap_or_else(|| {
            info!("No persisted birth year, using {fallback}");
            fallback
        });
    Ok(birth_year)
}

/// Save the birth year as a decimal string
pub fn save_birth_year(
    kv_store: &mut dyn KeyValueStore,
    birth_year: i32,
) -> Result<(), PersistError> {
    kv_store.set(BIRTH_YEAR_KEY, &birth_year.to_string())
}

/// Build a store from any of the shapes eras have been persisted in:
///
/// - `{"y-w": {"text": "...", "color": "#rrggbb"}}` (current)
/// - `{"y-w": "..."}` (label only, a fresh colour is assigned)
/// - `["y-w", ...]` (marked blocks only, labelled [`LEGACY_LABEL`])
///
/// Entries that can't be understood are dropped.  An object entry without a
/// usable colour gets a fresh one.
pub fn normalise_eras(value: &Value, colour_policy: &mut dyn ColourPolicy) -> EraStore {
    let mut store = EraStore::new();
    match value {
        Value::Array(keys) => {
            info!("Migrating {} marked block(s)", keys.len());
            for key in keys {
                let Some(anchor) = key.as_str().and_then(parse_anchor) else {
                    warn!("Dropping marked block {key}");
                    continue;
                };
                if let Ok(label) = Label::from(LEGACY_LABEL) {
                    store.insert(anchor, Era::new(label, colour_policy.next_colour()));
                }
            }
        }
        Value::Object(entries) => {
            for (key, entry) in entries {
                let Some(anchor) = parse_anchor(key) else {
                    continue;
                };
                match normalise_entry(entry, colour_policy) {
                    Some(era) => {
                        store.insert(anchor, era);
                    }
                    None => warn!("Dropping era at {anchor}: {entry}"),
                }
            }
        }
        _ => warn!("Ignoring persisted eras that are neither an object nor a list"),
    }
    store
}

fn parse_anchor(key: &str) -> Option<Anchor> {
    match key.parse::<Anchor>() {
        Ok(anchor) => Some(anchor),
        Err(error) => {
            warn!("Dropping era: {error}");
            None
        }
    }
}

fn normalise_entry(entry: &Value, colour_policy: &mut dyn ColourPolicy) -> Option<Era> {
    match entry {
        Value::String(text) => {
            let label = Label::from(text).ok()?;
            Some(Era::new(label, colour_policy.next_colour()))
        }
        Value::Object(fields) => {
            let label = Label::from(fields.get("text")?.as_str()?).ok()?;
            let colour = fields
                .get("color")
                .and_then(Value::as_str)
                .and_then(|hex| Colour::from_hex(hex).ok())
                .unwrap_or_else(|| colour_policy.next_colour());
            Some(Era::new(label, colour))
        }
        _ => None,
    }
}

/// The default eras, each with a freshly assigned colour
pub fn default_eras(colour_policy: &mut dyn ColourPolicy) -> EraStore {
    let mut store = EraStore::new();
    for (year, week, label) in DEFAULT_ERAS {
        if let Ok(anchor) = Anchor::new(year, week) {
            store.upsert(anchor, label, colour_policy);
        }
    }
    store
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::PALETTE;
    use crate::test::{CyclingColours, anchor, path_to_test_data};
    use tempdir::TempDir;

    fn label_at(store: &EraStore, year: u32, week: u32) -> Option<String> {
        store
            .get(&anchor(year, week))
            .map(|era| era.label().to_string())
    }

    fn memory_store_holding(data: &str) -> MemoryKeyValueStore {
        let mut kv_store = MemoryKeyValueStore::new();
        kv_store.set(ERAS_KEY, data).unwrap();
        kv_store
    }

    #[test]
    fn current_shape() {
        let data = fs::read_to_string(path_to_test_data().join("eras.json")).unwrap();
        let kv_store = memory_store_holding(&data);
        let store = load_eras(&kv_store, &mut CyclingColours::new()).unwrap();
        assert_eq!(store.len(), 3);
        let born = store.get(&anchor(0, 0)).unwrap();
        assert_eq!(born.label().as_str(), "Born");
        assert_eq!(born.colour().to_hex(), "#ff6b6b");
        assert_eq!(label_at(&store, 5, 35).as_deref(), Some("Elementary School"));
        assert_eq!(label_at(&store, 30, 4).as_deref(), Some("Moved to \"The City\""));
    }

    #[test]
    fn marked_blocks_shape() {
        let data = fs::read_to_string(path_to_test_data().join("marked-blocks.json")).unwrap();
        let kv_store = memory_store_holding(&data);
        let store = load_eras(&kv_store, &mut CyclingColours::new()).unwrap();
        assert_eq!(store.len(), 3);
        for (_, era) in store.iter() {
            assert_eq!(era.label().as_str(), LEGACY_LABEL);
            assert!(PALETTE.contains(&era.colour()));
        }
        assert!(store.contains(&anchor(12, 3)));
    }

    #[test]
    fn label_only_shape() {
        let kv_store = memory_store_holding(r#"{"0-0":"Born","5-35":"  School ","6-1":"  "}"#);
        let store = load_eras(&kv_store, &mut CyclingColours::new()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(label_at(&store, 5, 35).as_deref(), Some("School"));
        assert!(!store.contains(&anchor(6, 1)));
    }

    #[test]
    fn bad_entries_are_dropped() {
        let kv_store = memory_store_holding(
            r##"{
                "0-0": {"text": "Born", "color": "not a colour"},
                "95-0": {"text": "Too old", "color": "#ff6b6b"},
                "1-52": "Too many weeks",
                "nonsense": "What",
                "2-0": {"color": "#ff6b6b"},
                "3-0": 42
            }"##,
        );
        let store = load_eras(&kv_store, &mut CyclingColours::new()).unwrap();
        assert_eq!(store.len(), 1);
        // The bad colour is replaced by a fresh one
        assert_eq!(store.get(&anchor(0, 0)).unwrap().colour(), PALETTE[0]);
    }

    #[test]
    fn missing_or_malformed_is_empty() {
        let kv_store = MemoryKeyValueStore::new();
        assert!(load_eras(&kv_store, &mut CyclingColours::new()).unwrap().is_empty());

        let kv_store = memory_store_holding("{not json");
        assert!(load_eras(&kv_store, &mut CyclingColours::new()).unwrap().is_empty());

        let kv_store = memory_store_holding("42");
        assert!(load_eras(&kv_store, &mut CyclingColours::new()).unwrap().is_empty());
    }

    #[test]
    fn saved_shape() {
        let mut kv_store = MemoryKeyValueStore::new();
        let mut store = EraStore::new();
        store.insert(
            anchor(5, 35),
            Era::new(Label::from("School").unwrap(), PALETTE[4]),
        );
        save_eras(&mut kv_store, &store).unwrap();
        assert_eq!(
            kv_store.get(ERAS_KEY).unwrap().as_deref(),
            Some(r##"{"5-35":{"text":"School","color":"#54a0ff"}}"##)
        );
        let loaded = load_eras(&kv_store, &mut CyclingColours::new()).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn birth_year() {
        let mut kv_store = MemoryKeyValueStore::new();
        assert_eq!(load_birth_year(&kv_store, 2026).unwrap(), 2026);
        save_birth_year(&mut kv_store, 1990).unwrap();
        assert_eq!(kv_store.get(BIRTH_YEAR_KEY).unwrap().as_deref(), Some("1990"));
        assert_eq!(load_birth_year(&kv_store, 2026).unwrap(), 1990);
        kv_store.set(BIRTH_YEAR_KEY, "nineteen ninety").unwrap();
        assert_eq!(load_birth_year(&kv_store, 2026).unwrap(), 2026);
    }

    #[test]
    fn defaults() {
        let store = default_eras(&mut CyclingColours::new());
        assert_eq!(store.len(), 4);
        assert_eq!(label_at(&store, 0, 0).as_deref(), Some("Born"));
        assert_eq!(label_at(&store, 5, 35).as_deref(), Some("Elementary School"));
        assert_eq!(label_at(&store, 18, 35).as_deref(), Some("Starting College"));
        assert_eq!(label_at(&store, 22, 20).as_deref(), Some("Graduated College"));
    }

    #[test]
    fn json_file_store() {
        let dir = TempDir::new("life-calendar-core-persist").unwrap();
        let path = dir.path().join("nested").join("data.json");

        let mut kv_store = JsonFileKeyValueStore::open(&path).unwrap();
        assert_eq!(kv_store.get(ERAS_KEY).unwrap(), None);
        save_birth_year(&mut kv_store, 1984).unwrap();
        assert!(path.exists());

        let reopened = JsonFileKeyValueStore::open(&path).unwrap();
        assert_eq!(load_birth_year(&reopened, 2026).unwrap(), 1984);
    }

    #[test]
    fn json_file_store_ignores_malformed_file() {
        let dir = TempDir::new("life-calendar-core-persist").unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let mut kv_store = JsonFileKeyValueStore::open(&path).unwrap();
        assert_eq!(kv_store.get(BIRTH_YEAR_KEY).unwrap(), None);
        kv_store.set(BIRTH_YEAR_KEY, "1990").unwrap();
        let reopened = JsonFileKeyValueStore::open(&path).unwrap();
        assert_eq!(reopened.get(BIRTH_YEAR_KEY).unwrap().as_deref(), Some("1990"));
    }
}
