//! User settings for the planner.
//!
//! Read from `<config dir>/sprint-capacity/settings.json`. A missing or
//! unreadable file falls back to defaults. `SPRINT_CAPACITY_DB` overrides the
//! database location.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::capacity::LeavePolicy;

const APP_NAME: &str = "sprint-capacity";
const SETTINGS_FILE: &str = "settings.json";
pub const DB_PATH_ENV: &str = "SPRINT_CAPACITY_DB";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,
    /// How leave days relate to public holidays when deriving capacity.
    pub leave_policy: LeavePolicy,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            leave_policy: LeavePolicy::default(),
            log_filter: "sprint_capacity=info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the user's config directory only. This is the copy
    /// to change and [`save`](Self::save); overrides never reach the file.
    pub fn load_file() -> Self {
        match Self::try_load() {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = settings_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read settings file")?;
        let settings = serde_json::from_str(&content).context("Failed to parse settings file")?;
        Ok(settings)
    }

    /// Apply `SPRINT_CAPACITY_DB`, if set.
    pub fn with_env(self) -> Self {
        self.with_db_override(std::env::var(DB_PATH_ENV).ok())
    }

    fn with_db_override(mut self, path: Option<String>) -> Self {
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Save the current settings to the user's config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content).context("Failed to write settings file")?;

        Ok(())
    }
}

pub fn settings_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(SETTINGS_FILE);
    Ok(path)
}
