//! # Engine Configuration Module
//!
//! This module handles loading and managing configuration for the dispatch
//! daemon. It retrieves configuration values from environment variables and
//! provides defaults where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `DATA_DIR`: Directory holding the persisted collections (default: "data")
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `REMINDER_INTERVAL_SECS`: Seconds between reminder sweeps (default: 3600)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use eyre::{Result, WrapErr};
use tracing::Level;

/// Configuration for the dispatch daemon
///
/// This struct encapsulates all runtime options: where the record store
/// lives, how chatty the logs are, and how often the reminder scanner runs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted collections and user directories
    pub data_dir: PathBuf,

    /// Log level for the application
    pub log_level: Level,

    /// Interval between reminder sweeps
    pub reminder_interval: Duration,
}

impl Config {
    /// Creates a new Config from environment variables
    ///
    /// All values have defaults, so a bare environment yields a working
    /// configuration rooted at `./data` sweeping hourly.
    ///
    /// # Errors
    ///
    /// This function will return an error if the REMINDER_INTERVAL_SECS
    /// value cannot be parsed as a number of seconds.
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("DATA_DIR")
            .unwrap_or_else(|_| "data".to_string())
            .into();

        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let reminder_interval = env::var("REMINDER_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map(Duration::from_secs)
            .wrap_err("Invalid REMINDER_INTERVAL_SECS value")?;

        Ok(Self {
            data_dir,
            log_level,
            reminder_interval,
        })
    }
}
