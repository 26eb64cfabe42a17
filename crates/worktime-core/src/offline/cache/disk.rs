use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::offline::http::Response;

use super::storage::{CacheError, CacheStorage};

/// File extension of a generation file
const CACHE_FILE_EXTENSION: &str = "json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

type Generation = BTreeMap<String, CachedData<Response>>;

/// Generation names map to file names, so only a safe subset is allowed
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Cache storage keeping each generation in `<cache_dir>/<name>.json`.
pub struct DiskCacheStorage {
    cache_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl DiskCacheStorage {
    pub fn new(cache_dir: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            cache_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, name: &str) -> Result<PathBuf, CacheError> {
        if !is_valid_name(name) {
            return Err(CacheError::InvalidName(name.to_string()));
        }
        Ok(self
            .cache_dir
            .join(format!("{}.{}", name, CACHE_FILE_EXTENSION)))
    }

    fn load(&self, name: &str) -> Result<Option<Generation>, CacheError> {
        let path = self.cache_path(name)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, name: &str, generation: &Generation) -> Result<(), CacheError> {
        let path = self.cache_path(name)?;
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_string(generation)?;
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Cached entry together with the time it was stored
    pub async fn get_entry(
        &self,
        name: &str,
        key: &str,
    ) -> Result<Option<CachedData<Response>>, CacheError> {
        Ok(self.load(name)?.and_then(|mut generation| generation.remove(key)))
    }
}

#[async_trait]
impl CacheStorage for DiskCacheStorage {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;
        if self.load(name)?.is_none() {
            self.save(name, &Generation::new())?;
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(CACHE_FILE_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if is_valid_name(stem) => names.push(stem.to_string()),
                _ => debug!(path = %path.display(), "Ignoring foreign file in cache directory"),
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let _guard = self.write_lock.lock().await;
        let path = self.cache_path(name)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        debug!(cache = name, "Deleted cache generation");
        Ok(true)
    }

    async fn get(&self, name: &str, key: &str) -> Result<Option<Response>, CacheError> {
        Ok(self.get_entry(name, key).await?.map(|cached| cached.data))
    }

    async fn put(&self, name: &str, key: &str, response: Response) -> Result<(), CacheError> {
        self.put_all(name, vec![(key.to_string(), response)]).await
    }

    async fn put_all(&self, name: &str, entries: Vec<(String, Response)>) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;
        let mut generation = self.load(name)?.unwrap_or_default();
        for (key, response) in entries {
            generation.insert(key, CachedData::new(response));
        }
        self.save(name, &generation)
    }

    async fn entry_keys(&self, name: &str) -> Result<Vec<String>, CacheError> {
        Ok(self
            .load(name)?
            .map(|generation| generation.into_keys().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cached_data_age_display() {
        let mut cached = CachedData::new(());
        assert_eq!(cached.age_display(), "just now");

        cached.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");

        cached.cached_at = Utc::now() - Duration::minutes(125);
        assert_eq!(cached.age_display(), "2h ago");

        cached.cached_at = Utc::now() - Duration::days(3);
        assert_eq!(cached.age_display(), "3d ago");

        cached.cached_at = Utc::now() + Duration::minutes(10);
        assert_eq!(cached.age_display(), "just now");
    }

    #[tokio::test]
    async fn test_generations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = DiskCacheStorage::new(dir.path().to_path_buf()).unwrap();
            storage
                .put(
                    "worktime-pwa-v1",
                    "https://example.com/index.html",
                    Response::new(200, "<html>").with_header("Content-Type", "text/html"),
                )
                .await
                .unwrap();
            storage.open("worktime-pwa-v0").await.unwrap();
        }

        let storage = DiskCacheStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(
            storage.keys().await.unwrap(),
            vec!["worktime-pwa-v0", "worktime-pwa-v1"]
        );
        let cached = storage
            .get("worktime-pwa-v1", "https://example.com/index.html")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.text(), "<html>");
        assert_eq!(cached.header("content-type"), Some("text/html"));
        assert!(storage.entry_keys("worktime-pwa-v0").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_generation() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskCacheStorage::new(dir.path().to_path_buf()).unwrap();
        storage.put("old", "k", Response::new(200, "x")).await.unwrap();

        assert!(storage.delete("old").await.unwrap());
        assert!(!storage.delete("old").await.unwrap());
        assert!(storage.keys().await.unwrap().is_empty());
        assert_eq!(storage.get("old", "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskCacheStorage::new(dir.path().to_path_buf()).unwrap();
        for name in ["", "../escape", ".hidden", "a/b"] {
            let result = storage.open(name).await;
            assert!(matches!(result, Err(CacheError::InvalidName(_))), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_keys_skip_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my backup.json"), "{}").unwrap();
        std::fs::write(dir.path().join(".hidden.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hi").unwrap();

        let storage = DiskCacheStorage::new(dir.path().to_path_buf()).unwrap();
        storage.open("worktime-pwa-v1").await.unwrap();

        let keys = storage.keys().await.unwrap();
        assert_eq!(keys, vec!["worktime-pwa-v1"]);
        for name in keys {
            storage.delete(&name).await.unwrap();
        }
        assert!(dir.path().join("my backup.json").exists());
    }

    #[tokio::test]
    async fn test_get_entry_has_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskCacheStorage::new(dir.path().to_path_buf()).unwrap();
        storage.put("gen", "k", Response::new(200, "x")).await.unwrap();

        let entry = storage.get_entry("gen", "k").await.unwrap().unwrap();
        assert!(entry.age_minutes() <= 1);
    }
}
