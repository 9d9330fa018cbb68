use super::{PostgrestClient, Query};
use crate::domain::entities::Worker;
use crate::domain::ports::WorkerRepository;
use crate::shared::error::AppResult;
use async_trait::async_trait;

pub(crate) fn active_worker_query(email: &str) -> Query {
    vec![
        ("select", "id,email,name,surname,role,is_active".to_string()),
        ("email", format!("ilike.{}", email)),
        ("is_active", "eq.true".to_string()),
        ("limit", "1".to_string()),
    ]
}

#[async_trait]
impl WorkerRepository for PostgrestClient {
    async fn find_active_by_email(&self, email: &str) -> AppResult<Option<Worker>> {
        let workers: Vec<Worker> = self.select("workers", &active_worker_query(email)).await?;
        if workers.is_empty() {
            tracing::warn!("No active worker found for {}", email);
        }
        Ok(workers.into_iter().next())
    }
}
