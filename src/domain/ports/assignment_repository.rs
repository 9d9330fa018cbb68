use crate::domain::entities::Assignment;
use crate::shared::error::AppResult;
use chrono::NaiveDate;

/// Read access to a worker's assignments
#[async_trait::async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Active assignments whose activity window overlaps `from..=to`
    async fn active_assignments(
        &self,
        worker_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Assignment>>;
}
