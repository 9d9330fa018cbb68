use crate::shared::error::AppResult;
use async_trait::async_trait;

/// Local string key-value cache
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;

    async fn remove_many(&self, keys: &[&str]) -> AppResult<()>;

    /// Remove every entry
    async fn clear(&self) -> AppResult<()>;
}
