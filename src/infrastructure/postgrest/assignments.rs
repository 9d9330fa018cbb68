use super::rows::AssignmentRow;
use super::{PostgrestClient, Query};
use crate::domain::entities::Assignment;
use crate::domain::ports::AssignmentRepository;
use crate::shared::error::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;

const ASSIGNMENT_COLUMNS: &str =
    "id,assignment_type,schedule,start_date,end_date,weekly_hours,users(name,surname,address)";

pub(crate) fn active_assignments_query(worker_id: &str, from: NaiveDate, to: NaiveDate) -> Query {
    vec![
        ("select", ASSIGNMENT_COLUMNS.to_string()),
        ("worker_id", format!("eq.{}", worker_id)),
        ("status", "eq.active".to_string()),
        ("start_date", format!("lte.{}", to)),
        ("or", format!("(end_date.is.null,end_date.gte.{})", from)),
        ("order", "start_date.asc".to_string()),
    ]
}

#[async_trait]
impl AssignmentRepository for PostgrestClient {
    async fn active_assignments(
        &self,
        worker_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Assignment>> {
        let rows: Vec<AssignmentRow> = self
            .select("assignments", &active_assignments_query(worker_id, from, to))
            .await?;
        Ok(rows.into_iter().map(Assignment::from).collect())
    }
}
