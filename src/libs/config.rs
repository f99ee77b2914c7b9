//! Persistent application settings.
//!
//! Settings live in `config.json` inside the data directory resolved by
//! [`DataStorage`]. The file is flat JSON; a missing file gives the
//! defaults and a missing key gives that key's default, so older files keep
//! loading as options are added.
//!
//! ```json
//! {
//!   "dark_mode": false,
//!   "timer_workers": 4,
//!   "shutdown_grace_secs": 5,
//!   "export_dir": null
//! }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logbook::libs::config::Config;
//!
//! let mut config = Config::read()?;
//! config.dark_mode = true;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use super::scheduler::SchedulerConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dark colour scheme for the front end.
    pub dark_mode: bool,
    /// Number of runtime workers driving delayed and repeating tasks.
    pub timer_workers: usize,
    /// Seconds to wait for running work when shutting down.
    pub shutdown_grace_secs: u64,
    /// Where CSV exports are written; the current directory when unset.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dark_mode: false,
            timer_workers: 4,
            shutdown_grace_secs: 5,
            export_dir: None,
        }
    }
}

impl Config {
    /// Loads the configuration from the default data directory.
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    /// Loads the configuration from `storage`, falling back to defaults when
    /// no file exists yet.
    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            timer_workers: self.timer_workers,
            shutdown_grace: Duration::from_secs(self.shutdown_grace_secs),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
