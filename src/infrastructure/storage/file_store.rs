use crate::domain::ports::KeyValueStore;
use crate::shared::error::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

type Entries = BTreeMap<String, String>;

/// Key-value cache persisted as one JSON object on disk.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> AppResult<Entries> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    "Cache file {} is corrupt, starting empty: {}",
                    self.path.display(),
                    e
                );
                Ok(Entries::new())
            }
        }
    }

    async fn persist(&self, entries: &Entries) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {}", e)))?;
        }

        let tmp = self
            .path
            .with_file_name(format!(".cache-{}.tmp", uuid::Uuid::new_v4()));
        let raw = serde_json::to_vec_pretty(entries)?;
        fs::write(&tmp, raw)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write cache: {}", e)))?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(AppError::Storage(format!("Failed to replace cache: {}", e)));
        }
        Ok(())
    }

    async fn update<F>(&self, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut Entries) -> bool + Send,
    {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if change(&mut entries) {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
        .await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.update(|entries| entries.remove(key).is_some()).await
    }

    async fn remove_many(&self, keys: &[&str]) -> AppResult<()> {
        self.update(|entries| {
            let before = entries.len();
            for key in keys {
                entries.remove(*key);
            }
            entries.len() != before
        })
        .await
    }

    async fn clear(&self) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to clear cache: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!("careshift-test-{}", uuid::Uuid::new_v4()));
        FileStore::new(dir.join("cache.json"))
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let store = temp_store();
        let value = tokio_test::block_on(store.get("token")).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_set_get_remove_persist_across_instances() {
        tokio_test::block_on(async {
            let store = temp_store();
            store.set("token", "abc").await.unwrap();
            store.set("worker", "{}").await.unwrap();

            let reopened = FileStore::new(store.path().to_path_buf());
            assert_eq!(reopened.get("token").await.unwrap().as_deref(), Some("abc"));

            reopened.remove_many(&["token", "refresh_token"]).await.unwrap();
            assert_eq!(store.get("token").await.unwrap(), None);
            assert_eq!(store.get("worker").await.unwrap().as_deref(), Some("{}"));
        });
    }

    #[test]
    fn test_corrupt_file_reads_empty_and_is_replaced() {
        tokio_test::block_on(async {
            let store = temp_store();
            let parent = store.path().parent().unwrap().to_path_buf();
            fs::create_dir_all(&parent).await.unwrap();
            fs::write(store.path(), "not json").await.unwrap();

            assert_eq!(store.get("token").await.unwrap(), None);
            store.set("token", "fresh").await.unwrap();
            assert_eq!(store.get("token").await.unwrap().as_deref(), Some("fresh"));
        });
    }

    #[test]
    fn test_clear_removes_everything() {
        tokio_test::block_on(async {
            let store = temp_store();
            store.set("progress:2026-03-02", "[\"a1\"]").await.unwrap();
            store.clear().await.unwrap();
            assert_eq!(store.get("progress:2026-03-02").await.unwrap(), None);
            // Clearing twice is fine
            store.clear().await.unwrap();
        });
    }
}
