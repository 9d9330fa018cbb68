use crate::application::services::{AgendaService, AuthService, BalanceService};
use crate::config::Config;
use crate::domain::ports::{
    AssignmentRepository, AuthProvider, BalanceRepository, Clock, HolidayRepository,
    KeyValueStore, WorkerRepository,
};
use crate::infrastructure::postgrest::PostgrestClient;
use crate::infrastructure::runtime::SystemClock;
use crate::infrastructure::storage::FileStore;
use crate::shared::error::AppResult;
use std::sync::Arc;

/// Services wired against the real backend, cache file and clock.
pub struct App {
    pub auth: AuthService,
    pub agenda: AgendaService,
    pub balances: BalanceService,
}

pub fn build_app(config: &Config) -> AppResult<App> {
    let client = PostgrestClient::new(
        &config.backend_url,
        &config.backend_anon_key,
        config.http_timeout(),
    )?;
    tracing::debug!("Backend client ready for {}", config.backend_url);

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.cache_path.clone()));
    tracing::debug!("Local cache at {}", config.cache_path.display());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(config.timezone));

    let auth = AuthService::new(
        Arc::new(client.clone()) as Arc<dyn AuthProvider>,
        Arc::new(client.clone()) as Arc<dyn WorkerRepository>,
        store.clone(),
    );

    let agenda = AgendaService::new(
        Arc::new(client.clone()) as Arc<dyn AssignmentRepository>,
        Arc::new(client.clone()) as Arc<dyn HolidayRepository>,
        store,
        clock,
        config.holiday_policy,
    );

    let balances = BalanceService::new(
        Arc::new(client) as Arc<dyn BalanceRepository>,
        agenda.clone(),
    );

    Ok(App {
        auth,
        agenda,
        balances,
    })
}
