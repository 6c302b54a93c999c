//! # Settings Loader
//!
//! Configuration for the statement processing workspace. A single `Settings`
//! value is built once per invocation and passed to each entry point; nothing
//! here is process-wide mutable state.
//!
//! Every field has a default, so a partial (or empty) `settings.json` is
//! valid. Two environment variables override the file:
//!
//! - `NETWORTH_PERIOD`: reporting period, e.g. `10.25`
//! - `NETWORTH_BASE_DIR`: root containing `data/<period>/...`
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! let settings = settings_loader::load_settings("settings.json")?;
//! let next_month = settings.with_period("11.25");
//! assert_eq!(next_month.nsdl_dir(), PathBuf::from("./data/11.25/equity/nsdl"));
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";
pub const PERIOD_ENV: &str = "NETWORTH_PERIOD";
pub const BASE_DIR_ENV: &str = "NETWORTH_BASE_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub period: String,
    pub output_dir: PathBuf,
    /// Rows inspected when looking for a table header.
    pub header_scan_rows: usize,
    pub price_cache_file: Option<PathBuf>,
    pub price_max_age_hours: u64,
    /// Minimum spacing between two price lookups.
    pub rate_limit_ms: u64,
    pub prices_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            period: "10.25".to_string(),
            output_dir: PathBuf::from("output"),
            header_scan_rows: 20,
            price_cache_file: None,
            price_max_age_hours: 24,
            rate_limit_ms: 100,
            prices_file: None,
        }
    }
}

impl Settings {
    /// Same settings, different reporting period.
    pub fn with_period(&self, period: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            ..self.clone()
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data").join(&self.period)
    }

    pub fn equity_dir(&self) -> PathBuf {
        self.data_dir().join("equity")
    }

    pub fn nsdl_dir(&self) -> PathBuf {
        self.equity_dir().join("nsdl")
    }

    pub fn mf_dir(&self) -> PathBuf {
        self.data_dir().join("mf")
    }

    /// Applies `NETWORTH_PERIOD` / `NETWORTH_BASE_DIR` when set.
    pub fn apply_env_overrides(self) -> Self {
        self.with_overrides(env::var(PERIOD_ENV).ok(), env::var(BASE_DIR_ENV).ok())
    }

    pub fn with_overrides(mut self, period: Option<String>, base_dir: Option<String>) -> Self {
        if let Some(p) = period.filter(|p| !p.trim().is_empty()) {
            self.period = p.trim().to_string();
        }
        if let Some(b) = base_dir.filter(|b| !b.trim().is_empty()) {
            self.base_dir = PathBuf::from(b.trim());
        }
        self
    }
}

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Loads the provided path, or settings.json in the current directory when no
/// path is given. An explicit path that cannot be loaded is an error; a
/// missing default file yields None.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    if let Some(settings_path) = path {
        return load_settings(settings_path).map(Some);
    }

    if settings_file_exists(DEFAULT_SETTINGS_FILE) {
        load_default_settings().map(Some)
    } else {
        Ok(None)
    }
}

/// Settings from the fallback chain (or defaults) with environment overrides applied.
pub fn resolve_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let settings = load_settings_with_fallback(path)?.unwrap_or_default();
    Ok(settings.apply_env_overrides())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_file()
}
