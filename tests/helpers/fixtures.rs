use super::fakes::*;
use careshift::application::services::{AgendaService, AuthService, BalanceService};
use careshift::domain::entities::{Assignment, AssignmentType, ClientRef, Holiday, Worker};
use careshift::domain::schedule::HolidayPolicy;
use careshift::infrastructure::storage::MemoryStore;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use std::sync::Arc;

pub const WORKER_ID: &str = "w-1";
pub const WORKER_EMAIL: &str = "ana@sadlas.es";
pub const WORKER_PASSWORD: &str = "secreto";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).unwrap()
}

pub fn worker() -> Worker {
    let mut worker = Worker::new(WORKER_ID, WORKER_EMAIL);
    worker.name = Some("Ana".to_string());
    worker.surname = Some("García".to_string());
    worker
}

pub fn assignment(id: &str, kind: &str, schedule: Value) -> Assignment {
    Assignment::new(id, AssignmentType::from(kind), schedule, date(2026, 1, 1)).with_client(
        ClientRef {
            name: Some(format!("Cliente {}", id)),
            surname: None,
            address: None,
        },
    )
}

/// Monday and Wednesday mornings, a holiday slot, nothing else.
pub fn weekday_schedule() -> Value {
    json!({
        "monday": {"enabled": true, "timeSlots": [{"start": "9:00", "end": "11:00"}]},
        "wednesday": {"enabled": true, "timeSlots": [{"start": "16:00", "end": "17:30"}]},
        "holiday": {"timeSlots": [{"start": "10:00", "end": "12:00"}]}
    })
}

pub struct AgendaFixture {
    pub service: AgendaService,
    pub store: Arc<MemoryStore>,
}

pub fn agenda_fixture(
    now: NaiveDateTime,
    assignments: Vec<Assignment>,
    holidays: Vec<Holiday>,
    policy: HolidayPolicy,
) -> AgendaFixture {
    let store = Arc::new(MemoryStore::new());
    let service = AgendaService::new(
        Arc::new(InMemoryAssignments::for_worker(WORKER_ID, assignments)),
        Arc::new(InMemoryHolidays { holidays }),
        store.clone(),
        Arc::new(FixedClock(now)),
        policy,
    );
    AgendaFixture { service, store }
}

pub fn balance_service(agenda: AgendaService, balances: InMemoryBalances) -> BalanceService {
    BalanceService::new(Arc::new(balances), agenda)
}

pub struct AuthFixture {
    pub service: AuthService,
    pub provider: Arc<ScriptedAuthProvider>,
    pub store: Arc<MemoryStore>,
}

pub fn auth_fixture(provider: ScriptedAuthProvider, workers: Vec<Worker>) -> AuthFixture {
    let provider = Arc::new(provider);
    let store = Arc::new(MemoryStore::new());
    let service = AuthService::new(
        provider.clone(),
        Arc::new(InMemoryWorkers { workers }),
        store.clone(),
    );
    AuthFixture {
        service,
        provider,
        store,
    }
}
