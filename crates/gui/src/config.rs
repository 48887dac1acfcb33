// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Life Calendar GUI config
//!

use directories_next::ProjectDirs;
use life_calendar_core::Granularity;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PROJECT_QUALIFIER: &str = "org";
const ORG_NAME: &str = "LifeCalendar";
const APPLICATION_NAME: &str = "LifeCalendar";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_DATA_FILE_NAME: &str = "life-calendar.json";

/// Errors that can arise while loading or saving the config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find a home directory for the config")]
    NoProjectDirs,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The config that's saved to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the file the calendar is saved in
    data_path: PathBuf,

    /// The view last shown
    #[serde(default)]
    granularity: Granularity,
}

impl Config {
    /// Load the config from the platform's config directory, creating it (with
    /// defaults) if it doesn't exist yet
    pub fn load() -> Result<Self, ConfigError> {
        let config_file_path = config_file_path()?;
        if !config_file_path.exists() {
            info!("No config file found");
            let new_config = Config::new(default_data_file_path()?);
            new_config.save_to(&config_file_path)?;
            info!("Config created = {new_config:?}");
            return Ok(new_config);
        }
        Self::load_from(&config_file_path)
    }

    /// Load the config from the given file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading config from {}", path.display());
        let data = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&data)?;
        info!("Config loaded = {config:?}");
        Ok(config)
    }

    /// Save the config to the platform's config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path()?)
    }

    /// Save the config to the given file, creating any missing directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        info!("Saving config to {}", path.display());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Config saved");
        Ok(())
    }

    pub fn new(data_path: PathBuf) -> Self {
        Config {
            data_path,
            granularity: Granularity::default(),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }
}

/// Get the project directories (e.g. where the config is stored)
#[cfg(debug_assertions)]
fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    info!("Getting project directories (dev build)");
    ProjectDirs::from(
        PROJECT_QUALIFIER,
        ORG_NAME,
        &format!("{APPLICATION_NAME} Dev"),
    )
    .ok_or(ConfigError::NoProjectDirs)
}

/// Get the project directories (e.g. where the config is stored)
#[cfg(not(debug_assertions))]
fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    info!("Getting project directories");
    ProjectDirs::from(PROJECT_QUALIFIER, ORG_NAME, APPLICATION_NAME)
        .ok_or(ConfigError::NoProjectDirs)
}

/// Get the path to the config
fn config_file_path() -> Result<PathBuf, ConfigError> {
    let config_file = project_dirs()?.config_dir().join(CONFIG_FILE_NAME);
    info!("Config file path = {config_file:?}");
    Ok(config_file)
}

/// Get the default path to the calendar's data file.  The command line tool
/// uses this too.
pub fn default_data_file_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_dir().join(DEFAULT_DATA_FILE_NAME))
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn save_then_load() {
        let dir = TempDir::new("life-calendar-gui-config").unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = Config::new(dir.path().join("calendar.json"));
        config.set_granularity(Granularity::Years);
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn granularity_defaults_to_weeks() {
        let dir = TempDir::new("life-calendar-gui-config").unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "data_path": "/tmp/calendar.json" }"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.granularity(), Granularity::Weeks);
        assert_eq!(config.data_path(), Path::new("/tmp/calendar.json"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new("life-calendar-gui-config").unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Json(_))));
    }
}
