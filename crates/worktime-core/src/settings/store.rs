use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Currency, Lang, Settings, Theme};

/// Storage key holding the serialized settings record
pub const SETTINGS_KEY: &str = "worktime_settings_v2";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Key-value store kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self
            .items
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Key-value store backed by one JSON object on disk.
///
/// The whole file is rewritten on every `set_item`; the mutex serializes
/// read-modify-write cycles within the process.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        // Corrupt contents are dropped on the next write
        let mut items = self.read_all().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Discarding unreadable storage file");
            HashMap::new()
        });
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&items)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// Load settings from `store`.
///
/// A missing or unreadable record yields the defaults. Fields present in the
/// record override the defaults one by one; a field with an unknown value
/// keeps its default.
pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
    let raw = match store.get_item(SETTINGS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Settings::default(),
        Err(e) => {
            warn!(error = %e, "Failed to read settings, using defaults");
            return Settings::default();
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(fields)) => merge_over_defaults(&fields),
        Ok(_) => Settings::default(),
        Err(e) => {
            debug!(error = %e, "Stored settings are not valid JSON, using defaults");
            Settings::default()
        }
    }
}

fn merge_over_defaults(fields: &Map<String, Value>) -> Settings {
    let defaults = Settings::default();
    let text = |name: &str| fields.get(name).and_then(Value::as_str);

    Settings {
        wage: text("wage").map(str::to_string).unwrap_or(defaults.wage),
        theme: text("theme").and_then(Theme::from_code).unwrap_or(defaults.theme),
        lang: text("lang").and_then(Lang::from_code).unwrap_or(defaults.lang),
        currency: text("currency")
            .and_then(Currency::from_code)
            .unwrap_or(defaults.currency),
    }
}

/// Persist settings under `SETTINGS_KEY`.
pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<(), StorageError> {
    let json = serde_json::to_string(settings)?;
    store.set_item(SETTINGS_KEY, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_load_missing_gives_defaults() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(load_settings(&store), Settings::default());
    }

    #[test]
    fn test_load_corrupt_gives_defaults() {
        let store = MemoryKeyValueStore::new();
        store.set_item(SETTINGS_KEY, "{not json").unwrap();
        assert_eq!(load_settings(&store), Settings::default());

        store.set_item(SETTINGS_KEY, "42").unwrap();
        assert_eq!(load_settings(&store), Settings::default());
    }

    #[test]
    fn test_load_storage_error_gives_defaults() {
        assert_eq!(load_settings(&BrokenStore), Settings::default());
    }

    #[test]
    fn test_partial_record_merges_over_defaults() {
        let store = MemoryKeyValueStore::new();
        store
            .set_item(SETTINGS_KEY, r#"{"wage":"15","lang":"en"}"#)
            .unwrap();

        let settings = load_settings(&store);
        assert_eq!(settings.wage, "15");
        assert_eq!(settings.lang, Lang::En);
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.currency, Currency::Eur);
    }

    #[test]
    fn test_unknown_values_fall_back_per_field() {
        let store = MemoryKeyValueStore::new();
        store
            .set_item(
                SETTINGS_KEY,
                r#"{"wage":"9","theme":"sepia","lang":"fr","currency":"USD"}"#,
            )
            .unwrap();

        let settings = load_settings(&store);
        assert_eq!(settings.wage, "9");
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.lang, Lang::It);
        assert_eq!(settings.currency, Currency::Usd);
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryKeyValueStore::new();
        let settings = Settings {
            wage: "22,75".to_string(),
            theme: Theme::Light,
            lang: Lang::En,
            currency: Currency::Gbp,
        };
        save_settings(&store, &settings).unwrap();
        assert_eq!(load_settings(&store), settings);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileKeyValueStore::new(&path);
        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(reopened.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get_item("b").unwrap().as_deref(), Some("2"));
        assert_eq!(reopened.get_item("c").unwrap(), None);
    }

    #[test]
    fn test_file_store_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "garbage").unwrap();

        let store = FileKeyValueStore::new(&path);
        assert!(store.get_item("a").is_err());
        assert_eq!(load_settings(&store), Settings::default());

        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));
    }
}
