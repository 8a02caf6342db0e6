mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::*;

pub const CONFIGS_KEY: &str = "configs";
pub const RESOURCES_KEY: &str = "resources";
pub const STORY_POINTS_MAPPING_KEY: &str = "storyPointsMapping";

/// Everything the planner persists, as loaded at startup.
///
/// Absent keys fall back to defaults: no configurations, no resources and the
/// default story point table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub configs: Vec<Configuration>,
    pub resources: Vec<Resource>,
    pub story_points_mapping: Vec<StoryPointMappingRow>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            configs: Vec::new(),
            resources: Vec::new(),
            story_points_mapping: default_story_point_mapping(),
        }
    }
}

/// Client-local key/value store backed by SQLite.
///
/// Each key holds one JSON document. The planner writes a whole key after
/// every mutation; nothing is patched in place.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "sprint-capacity")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("planner.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Raw key/value operations
    // ============================================================

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let value = conn
            .query_row("SELECT value FROM kv_state WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn put_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO kv_state (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            (key, value, Utc::now().to_rfc3339()),
        )?;
        Ok(())
    }

    // ============================================================
    // Typed documents
    // ============================================================

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_value(key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse stored value for '{}'", key))?;
        Ok(Some(value))
    }

    pub fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize value for '{}'", key))?;
        self.put_value(key, &raw)?;
        tracing::debug!("Saved '{}' ({} bytes)", key, raw.len());
        Ok(())
    }

    pub fn load_snapshot(&self) -> Result<Snapshot> {
        let defaults = Snapshot::default();
        Ok(Snapshot {
            configs: self.get_json(CONFIGS_KEY)?.unwrap_or(defaults.configs),
            resources: self.get_json(RESOURCES_KEY)?.unwrap_or(defaults.resources),
            story_points_mapping: self
                .get_json(STORY_POINTS_MAPPING_KEY)?
                .unwrap_or(defaults.story_points_mapping),
        })
    }

    pub fn save_configs(&self, configs: &[Configuration]) -> Result<()> {
        self.put_json(CONFIGS_KEY, configs)
    }

    pub fn save_resources(&self, resources: &[Resource]) -> Result<()> {
        self.put_json(RESOURCES_KEY, resources)
    }

    pub fn save_story_points_mapping(&self, mapping: &[StoryPointMappingRow]) -> Result<()> {
        self.put_json(STORY_POINTS_MAPPING_KEY, mapping)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}
