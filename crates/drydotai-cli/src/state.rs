//! Persistent CLI state.
//!
//! The issue tracker remembers which space it created so later commands
//! can find it again. State is stored at
//! `~/.config/drydotai/tracker.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application name used for the config directory
const APP_NAME: &str = "drydotai";

/// Tracker state file name
const TRACKER_FILE: &str = "tracker.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub space_id: String,
    pub space_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TrackerState {
    pub fn new(space_id: String, space_name: Option<String>) -> Self {
        Self {
            space_id,
            space_name,
            created_at: Utc::now(),
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(TRACKER_FILE))
    }

    /// Load state, `None` when the tracker has not been set up yet
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let state = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(state))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = TrackerState::load(&dir.path().join("tracker.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tracker.json");
        let state = TrackerState::new("space-1".into(), Some("Issue Tracker".into()));

        state.save(&path).unwrap();
        assert_eq!(TrackerState::load(&path).unwrap(), Some(state));
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(TrackerState::load(&path).is_err());
    }
}
