//! Persisted user settings. Currently a single value: the search term that
//! seeds a new interactive session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_search_term: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Pawns and items on the current map, no label.
            default_search_term: "-.".to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mapsearch").join("settings.json"))
    }

    /// Load settings from the default location, falling back to defaults when
    /// the file is missing or unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("could not determine config directory")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        Ok(())
    }
}
