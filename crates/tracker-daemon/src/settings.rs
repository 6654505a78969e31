//! Persisted daemon settings.
//!
//! One setting: the frontmatter property name that modified dates are
//! recorded under. Stored in `.date-tracker/settings.json` within the
//! vault directory, loaded on start and saved whenever it changes.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracker_core::DEFAULT_FIELD_NAME;

/// Directory inside the vault holding tracker state.
pub const STATE_DIR: &str = ".date-tracker";

const SETTINGS_FILE: &str = "settings.json";

/// Daemon settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Frontmatter property where modified dates are stored
    pub property_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            property_name: DEFAULT_FIELD_NAME.to_string(),
        }
    }
}

impl Settings {
    /// The property name to use, with blank values falling back to the
    /// default.
    pub fn resolved_property_name(&self) -> &str {
        let trimmed = self.property_name.trim();
        if trimmed.is_empty() {
            DEFAULT_FIELD_NAME
        } else {
            trimmed
        }
    }
}

/// Storage for persisted settings.
pub struct SettingsStore {
    /// Path to the storage file.
    path: PathBuf,
    /// In-memory cache.
    settings: Settings,
}

impl SettingsStore {
    /// Create storage at the specified vault directory.
    ///
    /// Creates `.date-tracker/settings.json` within the vault.
    pub fn new(vault_path: &Path) -> Result<Self> {
        let state_dir = vault_path.join(STATE_DIR);
        let path = state_dir.join(SETTINGS_FILE);

        let mut store = Self {
            path,
            settings: Settings::default(),
        };

        // Try to load existing data
        if let Ok(loaded) = store.load() {
            store.settings = loaded;
        }

        Ok(store)
    }

    /// Load settings from disk.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&self.path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    /// Save current settings to disk.
    pub fn save(&self) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The property name to track, normalized.
    pub fn property_name(&self) -> &str {
        self.settings.resolved_property_name()
    }

    /// Update the property name and persist.
    pub fn set_property_name(&mut self, name: &str) -> Result<()> {
        let trimmed = name.trim();
        self.settings.property_name = if trimmed.is_empty() {
            DEFAULT_FIELD_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_no_file_exists() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::new(temp_dir.path()).unwrap();

        assert_eq!(store.property_name(), "Modified");
        // Nothing is written until a setting changes
        assert!(!temp_dir.path().join(STATE_DIR).exists());
    }

    #[test]
    fn test_settings_persist_across_sessions() {
        let temp_dir = TempDir::new().unwrap();
        let vault_path = temp_dir.path();

        // First session: change the property name
        {
            let mut store = SettingsStore::new(vault_path).unwrap();
            store.set_property_name("updated-on").unwrap();
        }

        // File should exist and be valid JSON
        let settings_file = vault_path.join(STATE_DIR).join(SETTINGS_FILE);
        assert!(settings_file.exists());
        let contents = fs::read_to_string(&settings_file).unwrap();
        let loaded: Settings = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded.property_name, "updated-on");

        // Second session: the name is loaded back
        {
            let store = SettingsStore::new(vault_path).unwrap();
            assert_eq!(store.property_name(), "updated-on");
        }
    }

    #[test]
    fn test_blank_name_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = SettingsStore::new(temp_dir.path()).unwrap();

        store.set_property_name("   ").unwrap();
        assert_eq!(store.property_name(), "Modified");
        assert_eq!(store.settings().property_name, "Modified");
    }

    #[test]
    fn test_name_is_trimmed() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = SettingsStore::new(temp_dir.path()).unwrap();

        store.set_property_name("  Touched  ").unwrap();
        assert_eq!(store.property_name(), "Touched");
    }

    #[test]
    fn test_resolved_property_name_handles_blank_stored_value() {
        let settings = Settings {
            property_name: "  ".to_string(),
        };
        assert_eq!(settings.resolved_property_name(), "Modified");
    }
}
