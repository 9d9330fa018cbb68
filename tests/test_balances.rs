mod helpers;

use careshift::domain::entities::{BalanceTrend, MonthRef, MonthlyBalance};
use careshift::domain::schedule::HolidayPolicy;
use helpers::*;

fn balance(month: u32, value: f64) -> MonthlyBalance {
    MonthlyBalance {
        id: format!("b-{}", month),
        worker_id: WORKER_ID.to_string(),
        year: 2026,
        month,
        total_hours: 80.0,
        worked_hours: 80.0 + value,
        holiday_hours: 4.0,
        balance: value,
        services_completed: 40,
        clients_served: 6,
        earnings: 1200.0,
    }
}

#[tokio::test]
async fn test_month_report_splits_current_and_history() {
    let agenda = agenda_fixture(
        at(date(2026, 3, 10), 9, 0),
        vec![assignment("weekday", "laborables", weekday_schedule())],
        Vec::new(),
        HolidayPolicy::Registered,
    );
    let service = balance_service(
        agenda.service,
        InMemoryBalances {
            balances: vec![balance(1, -2.0), balance(3, 1.5), balance(2, 0.0)],
        },
    );

    let report = service
        .month_report(&worker(), MonthRef::new(2026, 3).unwrap())
        .await
        .unwrap();

    assert_eq!(report.current.as_ref().map(|b| b.month), Some(3));
    assert_eq!(report.trend(), BalanceTrend::Positive);
    let history: Vec<u32> = report.history.iter().map(|b| b.month).collect();
    assert_eq!(history, vec![2, 1]);
    // Five Mondays of 2h and four Wednesdays of 1.5h in March 2026
    assert_eq!(report.planned_hours, 16.0);
}

#[tokio::test]
async fn test_month_without_balance_is_neutral() {
    let agenda = agenda_fixture(
        at(date(2026, 5, 1), 9, 0),
        Vec::new(),
        Vec::new(),
        HolidayPolicy::Registered,
    );
    let service = balance_service(agenda.service, InMemoryBalances::default());

    let report = service
        .month_report(&worker(), MonthRef::new(2026, 5).unwrap())
        .await
        .unwrap();
    assert!(report.current.is_none());
    assert!(report.history.is_empty());
    assert_eq!(report.trend(), BalanceTrend::Neutral);
    assert_eq!(report.planned_hours, 0.0);
}
