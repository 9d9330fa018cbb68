use crate::domain::entities::MonthlyBalance;
use crate::shared::error::AppResult;

#[async_trait::async_trait]
pub trait BalanceRepository: Send + Sync {
    /// Closed monthly balances of one year, newest month first
    async fn monthly_balances(&self, worker_id: &str, year: i32) -> AppResult<Vec<MonthlyBalance>>;
}
