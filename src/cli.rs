use crate::application::services::{BalanceReport, TodayView, UpcomingView};
use crate::bootstrap::App;
use crate::domain::entities::{BalanceTrend, Credentials, MonthRef, Worker};
use crate::domain::errors::DomainError;
use crate::domain::schedule::{DayMode, ServiceState, UpcomingRange, WeekAgenda};
use crate::domain::services::AuthState;
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Parser, Debug)]
#[command(name = "careshift")]
#[command(version)]
#[command(
    about = "Agenda, upcoming services and hour balances for home-care workers",
    long_about = None
)]
pub struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and keep the session in the local cache
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "CARESHIFT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in worker
    Whoami,
    /// Remove everything from the local cache
    ClearCache,
    /// Today's services, in progress first
    Today,
    /// Services after today
    Upcoming {
        #[arg(long, value_enum, default_value_t = RangeArg::Week)]
        range: RangeArg,
    },
    /// Week view (Monday to Sunday)
    Week {
        /// Any date of the week to show (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Monthly hour balance
    Balances {
        #[arg(long)]
        year: Option<i32>,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Mark a service as completed
    Done {
        assignment_id: String,

        #[arg(long)]
        date: Option<NaiveDate>,

        /// Remove the mark instead
        #[arg(long)]
        undo: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RangeArg {
    Tomorrow,
    Week,
    Month,
}

impl From<RangeArg> for UpcomingRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::Tomorrow => UpcomingRange::Tomorrow,
            RangeArg::Week => UpcomingRange::ThisWeek,
            RangeArg::Month => UpcomingRange::ThisMonth,
        }
    }
}

#[derive(Serialize)]
struct Marked<'a> {
    assignment_id: &'a str,
    date: NaiveDate,
    completed: bool,
    changed: bool,
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

/// Restore the stored session and return the signed-in worker.
async fn require_worker(app: &mut App) -> anyhow::Result<Worker> {
    match app.auth.restore().await {
        AuthState::Authenticated(worker) => Ok(worker.clone()),
        AuthState::Error(message) => Err(anyhow::anyhow!("{}", message)),
        _ => Err(anyhow::Error::new(DomainError::Unauthenticated)
            .context("No active session, run `careshift login` first")),
    }
}

pub async fn run(cli: Cli, app: &mut App) -> anyhow::Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Login { email, password } => {
            let worker = app.auth.login(&Credentials { email, password }).await?;
            emit(json, &worker, || {
                format!("Sesión iniciada como {}\n", worker.display_name())
            })
        }
        Command::Logout => {
            app.auth.logout().await?;
            emit(json, app.auth.state(), || "Sesión cerrada\n".to_string())
        }
        Command::ClearCache => {
            app.auth.clear_all_cache().await?;
            emit(json, app.auth.state(), || "Caché local eliminada\n".to_string())
        }
        Command::Whoami => {
            let worker = require_worker(app).await?;
            emit(json, &worker, || {
                format!("{} <{}> ({})\n", worker.display_name(), worker.email, worker.role)
            })
        }
        Command::Today => {
            let worker = require_worker(app).await?;
            let view = app.agenda.today(&worker).await?;
            emit(json, &view, || render_today(&view))
        }
        Command::Upcoming { range } => {
            let worker = require_worker(app).await?;
            let view = app.agenda.upcoming(&worker, range.into()).await?;
            emit(json, &view, || render_upcoming(&view))
        }
        Command::Week { start } => {
            let worker = require_worker(app).await?;
            let agenda = app.agenda.week(&worker, start).await?;
            emit(json, &agenda, || render_week(&agenda))
        }
        Command::Balances { year, month } => {
            let worker = require_worker(app).await?;
            let today = app.agenda.today_date();
            let month = MonthRef::new(year.unwrap_or(today.year()), month.unwrap_or(today.month()))
                .ok_or_else(|| DomainError::ValidationError("Invalid month".to_string()))?;
            let report = app.balances.month_report(&worker, month).await?;
            emit(json, &report, || render_balance(&report))
        }
        Command::Done {
            assignment_id,
            date,
            undo,
        } => {
            let worker = require_worker(app).await?;
            let date = date.unwrap_or_else(|| app.agenda.today_date());
            let changed = if undo {
                app.agenda.unmark_completed(date, &assignment_id).await?
            } else {
                app.agenda.mark_completed(&worker, date, &assignment_id).await?
            };
            let marked = Marked {
                assignment_id: &assignment_id,
                date,
                completed: !undo,
                changed,
            };
            emit(json, &marked, || match (undo, changed) {
                (false, true) => format!("Servicio {} completado el {}\n", assignment_id, date),
                (false, false) => format!("Servicio {} ya estaba completado\n", assignment_id),
                (true, true) => format!("Servicio {} marcado como pendiente\n", assignment_id),
                (true, false) => format!("Servicio {} no estaba completado\n", assignment_id),
            })
        }
    }
}

fn state_label(state: ServiceState) -> &'static str {
    match state {
        ServiceState::InProgress => "en curso",
        ServiceState::Pending => "pendiente",
        ServiceState::Done => "terminado",
    }
}

fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {}",
        crate::domain::schedule::DayKey::from_weekday(date.weekday()).display_name(),
        date.format("%d/%m/%Y")
    )
}

pub fn render_today(view: &TodayView) -> String {
    let mut out = String::new();
    let _ = write!(out, "Hoy, {}", format_date(view.date));
    match (&view.mode, &view.holiday_name) {
        (DayMode::Holiday, Some(name)) => {
            let _ = write!(out, " (festivo: {})", name);
        }
        (DayMode::Holiday, None) => out.push_str(" (festivo)"),
        _ => {}
    }
    out.push('\n');

    if view.rows.is_empty() {
        out.push_str("  No hay servicios para hoy\n");
    }
    for row in &view.rows {
        let mark = if view.completed.contains(&row.assignment_id) {
            " [completado]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {} - {}  {:<10} {}{}",
            row.start,
            row.end,
            state_label(row.state),
            row.label,
            mark
        );
    }

    let summary = &view.summary;
    let _ = writeln!(
        out,
        "Servicios: {}  Completados: {}  Pendientes: {}  Horas: {:.1}",
        summary.total_services,
        summary.completed_services,
        summary.pending_services,
        summary.total_hours
    );
    out
}

pub fn render_upcoming(view: &UpcomingView) -> String {
    let mut out = String::new();
    let counts: Vec<String> = view
        .counts
        .iter()
        .map(|c| format!("{}: {}", c.range.display_name(), c.count))
        .collect();
    let _ = writeln!(out, "{}", counts.join("  "));

    if view.services.is_empty() {
        let _ = writeln!(out, "  Sin servicios ({})", view.range.display_name().to_lowercase());
        return out;
    }

    let mut current: Option<NaiveDate> = None;
    for service in &view.services {
        if current != Some(service.date) {
            let _ = writeln!(out, "{}", format_date(service.date));
            current = Some(service.date);
        }
        let _ = writeln!(
            out,
            "  {} - {}  {} ({})",
            service.start,
            service.end,
            service.label,
            service.assignment_type.display_name()
        );
    }
    out
}

pub fn render_week(agenda: &WeekAgenda) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Semana del {}", agenda.week_start.format("%d/%m/%Y"));
    for day in &agenda.days {
        let holiday = if day.mode == DayMode::Holiday { " (festivo)" } else { "" };
        let _ = writeln!(out, "{}{}", format_date(day.date), holiday);
        if day.services.is_empty() {
            out.push_str("  -\n");
        }
        for service in &day.services {
            let _ = writeln!(out, "  {} - {}  {}", service.start, service.end, service.label);
        }
    }
    let _ = writeln!(out, "Total: {:.1} h", agenda.total_hours());
    out
}

pub fn render_balance(report: &BalanceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Balance de {}", report.month);
    match &report.current {
        Some(balance) => {
            let sign = match report.trend() {
                BalanceTrend::Positive => "+",
                _ => "",
            };
            let _ = writeln!(out, "  Horas totales:   {:.1}", balance.total_hours);
            let _ = writeln!(out, "  Horas trabajadas: {:.1}", balance.worked_hours);
            let _ = writeln!(out, "  Horas festivas:  {:.1}", balance.holiday_hours);
            let _ = writeln!(out, "  Balance:         {}{:.1}", sign, balance.balance);
            let _ = writeln!(out, "  Servicios:       {}", balance.services_completed);
            let _ = writeln!(out, "  Clientes:        {}", balance.clients_served);
            let _ = writeln!(out, "  Ingresos:        {:.2} €", balance.earnings);
        }
        None => out.push_str("  Sin balance registrado\n"),
    }
    let _ = writeln!(out, "  Horas planificadas: {:.1}", report.planned_hours);

    if !report.history.is_empty() {
        out.push_str("Historial\n");
        for balance in &report.history {
            let name = balance
                .month_ref()
                .map(|m| m.name())
                .unwrap_or("?");
            let _ = writeln!(out, "  {:<11} {:>6.1}", name, balance.balance);
        }
    }
    out
}
