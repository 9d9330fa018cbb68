use super::rows::{holiday_in_window, HolidayRow};
use super::{PostgrestClient, Query};
use crate::domain::entities::Holiday;
use crate::domain::ports::HolidayRepository;
use crate::shared::error::AppResult;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

pub(crate) fn holidays_query(from: NaiveDate, to: NaiveDate) -> Query {
    vec![
        ("select", "day,month,year,name".to_string()),
        (
            "or",
            format!(
                "(year.is.null,and(year.gte.{},year.lte.{}))",
                from.year(),
                to.year()
            ),
        ),
    ]
}

#[async_trait]
impl HolidayRepository for PostgrestClient {
    async fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Holiday>> {
        let rows: Vec<HolidayRow> = self.select("holidays", &holidays_query(from, to)).await?;
        Ok(rows
            .into_iter()
            .filter_map(HolidayRow::into_holiday)
            .filter(|holiday| holiday_in_window(holiday, from, to))
            .collect())
    }
}
