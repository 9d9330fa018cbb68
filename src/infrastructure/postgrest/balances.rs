use super::{PostgrestClient, Query};
use crate::domain::entities::MonthlyBalance;
use crate::domain::ports::BalanceRepository;
use crate::shared::error::AppResult;
use async_trait::async_trait;

fn monthly_balances_query(worker_id: &str, year: i32) -> Query {
    vec![
        ("select", "*".to_string()),
        ("worker_id", format!("eq.{}", worker_id)),
        ("year", format!("eq.{}", year)),
        ("order", "month.desc".to_string()),
    ]
}

#[async_trait]
impl BalanceRepository for PostgrestClient {
    async fn monthly_balances(&self, worker_id: &str, year: i32) -> AppResult<Vec<MonthlyBalance>> {
        self.select("monthly_balances", &monthly_balances_query(worker_id, year))
            .await
    }
}
