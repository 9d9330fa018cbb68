use super::agenda_service::AgendaService;
use crate::domain::entities::{BalanceTrend, MonthRef, MonthlyBalance, Worker};
use crate::domain::errors::DomainError;
use crate::domain::ports::BalanceRepository;
use crate::shared::error::AppResult;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub month: MonthRef,
    pub current: Option<MonthlyBalance>,
    /// Other months of the same year, newest first
    pub history: Vec<MonthlyBalance>,
    /// Hours the active assignments schedule for the month
    pub planned_hours: f64,
}

impl BalanceReport {
    pub fn trend(&self) -> BalanceTrend {
        self.current
            .as_ref()
            .map(MonthlyBalance::trend)
            .unwrap_or(BalanceTrend::Neutral)
    }
}

#[derive(Clone)]
pub struct BalanceService {
    balance_repo: Arc<dyn BalanceRepository>,
    agenda: AgendaService,
}

impl BalanceService {
    pub fn new(balance_repo: Arc<dyn BalanceRepository>, agenda: AgendaService) -> Self {
        Self {
            balance_repo,
            agenda,
        }
    }

    pub async fn month_report(&self, worker: &Worker, month: MonthRef) -> AppResult<BalanceReport> {
        let (first, last) = month
            .first_day()
            .zip(month.last_day())
            .ok_or_else(|| DomainError::ValidationError(format!("Invalid month: {:?}", month)))?;

        let mut balances = self
            .balance_repo
            .monthly_balances(&worker.id, month.year)
            .await?;
        balances.sort_by(|a, b| b.month.cmp(&a.month));

        let (current, history): (Vec<_>, Vec<_>) = balances
            .into_iter()
            .filter(|b| b.year == month.year)
            .partition(|b| b.month == month.month);

        let minutes = self.agenda.planned_minutes(&worker.id, first, last).await?;

        Ok(BalanceReport {
            month,
            current: current.into_iter().next(),
            history,
            planned_hours: (f64::from(minutes) / 60.0 * 10.0).round() / 10.0,
        })
    }
}
