//! In-memory implementations of the ports for service-level tests.

use async_trait::async_trait;
use careshift::domain::entities::{
    Assignment, AuthSession, Credentials, Holiday, MonthlyBalance, Worker,
};
use careshift::domain::ports::{
    AssignmentRepository, AuthProvider, BalanceRepository, Clock, HolidayRepository,
    WorkerRepository,
};
use careshift::shared::error::{AppError, AppResult};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::sync::Mutex;

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Assignments keyed by worker id.
#[derive(Default)]
pub struct InMemoryAssignments {
    pub rows: Vec<(String, Assignment)>,
}

impl InMemoryAssignments {
    pub fn for_worker(worker_id: &str, assignments: Vec<Assignment>) -> Self {
        Self {
            rows: assignments
                .into_iter()
                .map(|a| (worker_id.to_string(), a))
                .collect(),
        }
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignments {
    async fn active_assignments(
        &self,
        worker_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Assignment>> {
        Ok(self
            .rows
            .iter()
            .filter(|(owner, _)| owner == worker_id)
            .map(|(_, a)| a)
            .filter(|a| a.start_date <= to && a.end_date.map_or(true, |end| end >= from))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryHolidays {
    pub holidays: Vec<Holiday>,
}

#[async_trait]
impl HolidayRepository for InMemoryHolidays {
    async fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Holiday>> {
        Ok(self
            .holidays
            .iter()
            .filter(|h| h.recurring || (h.date >= from && h.date <= to))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryWorkers {
    pub workers: Vec<Worker>,
}

#[async_trait]
impl WorkerRepository for InMemoryWorkers {
    async fn find_active_by_email(&self, email: &str) -> AppResult<Option<Worker>> {
        Ok(self
            .workers
            .iter()
            .find(|w| w.is_active && w.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryBalances {
    pub balances: Vec<MonthlyBalance>,
}

#[async_trait]
impl BalanceRepository for InMemoryBalances {
    async fn monthly_balances(&self, worker_id: &str, year: i32) -> AppResult<Vec<MonthlyBalance>> {
        let mut rows: Vec<MonthlyBalance> = self
            .balances
            .iter()
            .filter(|b| b.worker_id == worker_id && b.year == year)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.month.cmp(&a.month));
        Ok(rows)
    }
}

/// Auth provider with a fixed set of accounts. Issued access tokens are
/// `token-<email>` and refresh tokens `refresh-<email>`; anything else is
/// rejected the way GoTrue rejects it.
#[derive(Default)]
pub struct ScriptedAuthProvider {
    pub accounts: HashMap<String, String>,
    pub network_down: bool,
    pub fail_sign_out: bool,
    pub sign_outs: Mutex<Vec<String>>,
    pub refreshes: Mutex<Vec<String>>,
}

impl ScriptedAuthProvider {
    pub fn with_account(email: &str, password: &str) -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(email.to_string(), password.to_string());
        Self {
            accounts,
            ..Default::default()
        }
    }

    pub fn token_for(email: &str) -> String {
        format!("token-{}", email)
    }

    pub fn refresh_token_for(email: &str) -> String {
        format!("refresh-{}", email)
    }

    pub fn sign_out_calls(&self) -> Vec<String> {
        self.sign_outs.lock().unwrap().clone()
    }

    pub fn refresh_calls(&self) -> Vec<String> {
        self.refreshes.lock().unwrap().clone()
    }

    fn session_for(email: &str) -> AuthSession {
        AuthSession {
            access_token: Self::token_for(email),
            refresh_token: Some(Self::refresh_token_for(email)),
            user_email: email.to_string(),
        }
    }
}

#[async_trait]
impl AuthProvider for ScriptedAuthProvider {
    async fn sign_in(&self, credentials: &Credentials) -> AppResult<AuthSession> {
        if self.network_down {
            return Err(AppError::Network("Connection failed".to_string()));
        }
        match self.accounts.get(&credentials.email) {
            Some(password) if *password == credentials.password => {
                Ok(Self::session_for(&credentials.email))
            }
            _ => Err(AppError::backend(400, "invalid_grant")),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        self.refreshes.lock().unwrap().push(refresh_token.to_string());
        if self.network_down {
            return Err(AppError::Network("Connection failed".to_string()));
        }
        self.accounts
            .keys()
            .find(|email| Self::refresh_token_for(email) == refresh_token)
            .map(|email| Self::session_for(email))
            .ok_or_else(|| AppError::backend(400, "Invalid Refresh Token: Refresh Token Not Found"))
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.sign_outs.lock().unwrap().push(access_token.to_string());
        if self.fail_sign_out {
            return Err(AppError::Network("Connection failed".to_string()));
        }
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> AppResult<String> {
        if self.network_down {
            return Err(AppError::Network("Connection failed".to_string()));
        }
        self.accounts
            .keys()
            .find(|email| Self::token_for(email) == access_token)
            .cloned()
            .ok_or_else(|| AppError::backend(401, "Invalid Refresh Token"))
    }
}
