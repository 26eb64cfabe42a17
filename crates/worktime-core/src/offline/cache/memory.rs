use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::offline::http::Response;

use super::storage::{CacheError, CacheStorage};

type Entries = HashMap<String, Response>;

/// In-memory cache storage. Caches are kept in creation order.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: RwLock<Vec<(String, Entries)>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn entries_mut<'a>(caches: &'a mut Vec<(String, Entries)>, name: &str) -> &'a mut Entries {
    let index = match caches.iter().position(|(n, _)| n == name) {
        Some(index) => index,
        None => {
            caches.push((name.to_string(), Entries::new()));
            caches.len() - 1
        }
    };
    &mut caches[index].1
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        let mut caches = self.caches.write().await;
        entries_mut(&mut caches, name);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let caches = self.caches.read().await;
        Ok(caches.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let mut caches = self.caches.write().await;
        let before = caches.len();
        caches.retain(|(n, _)| n != name);
        Ok(caches.len() != before)
    }

    async fn get(&self, name: &str, key: &str) -> Result<Option<Response>, CacheError> {
        let caches = self.caches.read().await;
        Ok(caches
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, entries)| entries.get(key).cloned()))
    }

    async fn put(&self, name: &str, key: &str, response: Response) -> Result<(), CacheError> {
        let mut caches = self.caches.write().await;
        entries_mut(&mut caches, name).insert(key.to_string(), response);
        Ok(())
    }

    async fn put_all(&self, name: &str, entries: Vec<(String, Response)>) -> Result<(), CacheError> {
        let mut caches = self.caches.write().await;
        entries_mut(&mut caches, name).extend(entries);
        Ok(())
    }

    async fn entry_keys(&self, name: &str) -> Result<Vec<String>, CacheError> {
        let caches = self.caches.read().await;
        let mut keys: Vec<String> = caches
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entries)| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let storage = MemoryCacheStorage::new();
        storage
            .put("gen-a", "https://example.com/app.js", Response::new(200, "js"))
            .await
            .unwrap();

        let hit = storage.get("gen-a", "https://example.com/app.js").await.unwrap();
        assert_eq!(hit.map(|r| r.text()), Some("js".to_string()));
        assert_eq!(storage.get("gen-b", "https://example.com/app.js").await.unwrap(), None);

        assert!(storage.delete("gen-a").await.unwrap());
        assert!(!storage.delete("gen-a").await.unwrap());
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keys_in_creation_order() {
        let storage = MemoryCacheStorage::new();
        storage.open("b").await.unwrap();
        storage.open("a").await.unwrap();
        storage.open("b").await.unwrap();
        assert_eq!(storage.keys().await.unwrap(), vec!["b", "a"]);
        assert!(storage.has("a").await.unwrap());
        assert!(!storage.has("c").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_all_and_entry_keys() {
        let storage = MemoryCacheStorage::new();
        storage
            .put_all(
                "gen",
                vec![
                    ("k2".to_string(), Response::new(200, "2")),
                    ("k1".to_string(), Response::new(200, "1")),
                ],
            )
            .await
            .unwrap();
        assert_eq!(storage.entry_keys("gen").await.unwrap(), vec!["k1", "k2"]);
        assert!(storage.entry_keys("missing").await.unwrap().is_empty());
    }
}
