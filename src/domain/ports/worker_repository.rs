use crate::domain::entities::Worker;
use crate::shared::error::AppResult;

#[async_trait::async_trait]
pub trait WorkerRepository: Send + Sync {
    /// Case-insensitive lookup restricted to active workers
    async fn find_active_by_email(&self, email: &str) -> AppResult<Option<Worker>>;
}
