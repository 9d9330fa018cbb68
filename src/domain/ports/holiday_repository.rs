use crate::domain::entities::Holiday;
use crate::shared::error::AppResult;
use chrono::NaiveDate;

#[async_trait::async_trait]
pub trait HolidayRepository: Send + Sync {
    /// Registered holidays falling inside `from..=to`
    async fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Holiday>>;
}
