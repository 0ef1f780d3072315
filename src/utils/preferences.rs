// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Remembered author and override list, backed by a small key-value store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::overrides::DEFAULT_OVERRIDES;

pub const AUTHOR_KEY: &str = "magisk-font-author";
pub const OVERRIDES_KEY: &str = "magisk-font-overrides";
pub const DEFAULT_AUTHOR: &str = "Magisk User";

/// Opaque string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    /// Persist pending writes.
    fn flush(&self) -> Result<()>;
}

/// Store kept only in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Store persisted as a flat JSON object of string values.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Load the store at `path`.
    ///
    /// A missing file yields an empty store. An unreadable or malformed file is
    /// logged and treated as empty so a bad preferences file never blocks startup.
    pub fn open(path: &Path) -> Self {
        let values = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => {
                    log::debug!("Loaded preferences from {:?}", path);
                    values
                }
                Err(err) => {
                    log::warn!("Ignoring malformed preferences file {:?}: {}", path, err);
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                log::warn!("Failed to read preferences file {:?}: {}", path, err);
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            values,
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create preferences directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write preferences file {:?}", self.path))?;
        log::debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

/// Default location of the preferences file in the user's config directory.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fontmod").join("preferences.json"))
}

/// Values carried over between sessions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preferences {
    pub author: String,
    pub overrides: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            overrides: DEFAULT_OVERRIDES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Preferences {
    /// Read both keys, falling back to defaults for missing or unparsable values.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();

        let author = store
            .get(AUTHOR_KEY)
            .filter(|author| !author.is_empty())
            .unwrap_or(defaults.author);

        let overrides = match store.get(OVERRIDES_KEY) {
            Some(raw) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|err| {
                log::warn!("Ignoring malformed saved override list: {}", err);
                defaults.overrides
            }),
            None => defaults.overrides,
        };

        Self { author, overrides }
    }

    /// Write both keys and flush the store.
    pub fn store(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        store.set(AUTHOR_KEY, self.author.clone());
        store.set(OVERRIDES_KEY, serde_json::to_string(&self.overrides)?);
        store.flush()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn empty_store_yields_defaults() {
        let prefs = Preferences::load(&MemoryStore::default());

        assert_eq!(prefs.author, DEFAULT_AUTHOR);
        assert_eq!(prefs.overrides.len(), DEFAULT_OVERRIDES.len());
    }

    #[test]
    fn overrides_are_stored_as_json_encoded_list() {
        let mut store = MemoryStore::default();
        let prefs = Preferences {
            author: "Jane".into(),
            overrides: vec!["A".into(), "B.otf".into()],
        };

        prefs.store(&mut store).unwrap();

        assert_eq!(store.get(AUTHOR_KEY).as_deref(), Some("Jane"));
        assert_eq!(store.get(OVERRIDES_KEY).as_deref(), Some(r#"["A","B.otf"]"#));
        assert_eq!(Preferences::load(&store), prefs);
    }

    #[test]
    fn malformed_override_list_falls_back_to_defaults() {
        let mut store = MemoryStore::default();
        store.set(OVERRIDES_KEY, "not json".into());
        store.set(AUTHOR_KEY, "Kept".into());

        let prefs = Preferences::load(&store);

        assert_eq!(prefs.author, "Kept");
        assert_eq!(prefs.overrides, Preferences::default().overrides);
    }

    #[test]
    fn json_file_store_round_trips_on_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config").join("preferences.json");

        let mut store = JsonFileStore::open(&path);
        let prefs = Preferences {
            author: "Disk Author".into(),
            overrides: vec!["Roboto-Regular.ttf".into()],
        };
        prefs.store(&mut store).unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(Preferences::load(&reopened), prefs);
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("preferences.json");
        fs::write(&path, "{ broken").unwrap();

        let store = JsonFileStore::open(&path);

        assert_eq!(store.get(AUTHOR_KEY), None);
        assert_eq!(Preferences::load(&store), Preferences::default());
    }
}
