use crate::domain::entities::{Assignment, Worker};
use crate::domain::errors::DomainError;
use crate::domain::ports::{AssignmentRepository, Clock, HolidayRepository, KeyValueStore};
use crate::domain::schedule::{
    aggregate_today, assignments_for_day, expand_range, planned_minutes, week_agenda,
    week_start_for, DayMode, DaySummary, HolidayCalendar, HolidayPolicy, ScheduledService,
    ServiceRow, UpcomingRange, WeekAgenda,
};
use crate::shared::error::AppResult;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

const PROGRESS_KEY_PREFIX: &str = "progress:";

fn progress_key(date: NaiveDate) -> String {
    format!("{}{}", PROGRESS_KEY_PREFIX, date.format("%Y-%m-%d"))
}

/// Everything the "today" view renders.
#[derive(Debug, Clone, Serialize)]
pub struct TodayView {
    pub date: NaiveDate,
    pub mode: DayMode,
    pub holiday_name: Option<String>,
    pub rows: Vec<ServiceRow>,
    pub completed: Vec<String>,
    pub summary: DaySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeCount {
    pub range: UpcomingRange,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingView {
    pub range: UpcomingRange,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub services: Vec<ScheduledService>,
    pub counts: Vec<RangeCount>,
}

/// Builds the day, week and upcoming views for a worker.
#[derive(Clone)]
pub struct AgendaService {
    assignment_repo: Arc<dyn AssignmentRepository>,
    holiday_repo: Arc<dyn HolidayRepository>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    holiday_policy: HolidayPolicy,
}

impl AgendaService {
    pub fn new(
        assignment_repo: Arc<dyn AssignmentRepository>,
        holiday_repo: Arc<dyn HolidayRepository>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        holiday_policy: HolidayPolicy,
    ) -> Self {
        Self {
            assignment_repo,
            holiday_repo,
            store,
            clock,
            holiday_policy,
        }
    }

    pub fn today_date(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn holiday_calendar(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<HolidayCalendar> {
        let holidays = self.holiday_repo.holidays_between(from, to).await?;
        Ok(HolidayCalendar::new(holidays, self.holiday_policy))
    }

    async fn assignments(
        &self,
        worker_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Assignment>> {
        let assignments = self
            .assignment_repo
            .active_assignments(worker_id, from, to)
            .await?;
        tracing::debug!(
            "Loaded {} assignments for worker {} ({} to {})",
            assignments.len(),
            worker_id,
            from,
            to
        );
        Ok(assignments)
    }

    /// Assignments with at least one slot on `date` under the holiday policy.
    async fn scheduled_on(
        &self,
        worker: &Worker,
        date: NaiveDate,
    ) -> AppResult<(HolidayCalendar, Vec<Assignment>)> {
        let calendar = self.holiday_calendar(date, date).await?;
        let assignments: Vec<Assignment> = self
            .assignments(&worker.id, date, date)
            .await?
            .into_iter()
            .filter(|a| a.is_active_on(date))
            .collect();
        let applicable = assignments_for_day(&assignments, date, calendar.day_mode(date))
            .into_iter()
            .cloned()
            .collect();
        Ok((calendar, applicable))
    }

    pub async fn today(&self, worker: &Worker) -> AppResult<TodayView> {
        let now = self.clock.now();
        let date = now.date();

        let (calendar, applicable) = self.scheduled_on(worker, date).await?;
        let mode = calendar.day_mode(date);
        let holiday_name = calendar.registered(date).and_then(|h| h.name.clone());

        let rows = aggregate_today(&applicable, now, mode);
        let completed = self.completed_on(date).await?;
        let summary = DaySummary::from_rows(&rows, &completed);

        Ok(TodayView {
            date,
            mode,
            holiday_name,
            rows,
            completed: completed.into_iter().collect::<BTreeSet<_>>().into_iter().collect(),
            summary,
        })
    }

    /// Services in `range`, plus the size of every range for the selector.
    pub async fn upcoming(&self, worker: &Worker, range: UpcomingRange) -> AppResult<UpcomingView> {
        let today = self.clock.today();
        let windows: Vec<(UpcomingRange, Option<(NaiveDate, NaiveDate)>)> = UpcomingRange::ALL
            .iter()
            .map(|r| (*r, r.window(today)))
            .collect();

        let from = today + Duration::days(1);
        let to = windows
            .iter()
            .filter_map(|(_, w)| w.map(|(_, end)| end))
            .max()
            .unwrap_or(from);

        let assignments = self.assignments(&worker.id, from, to).await?;
        let calendar = self.holiday_calendar(from, to).await?;
        let day_mode = |date: NaiveDate| calendar.day_mode(date);
        let everything = expand_range(&assignments, from, to, &day_mode);

        let within = |window: Option<(NaiveDate, NaiveDate)>| -> Vec<ScheduledService> {
            match window {
                Some((start, end)) => everything
                    .iter()
                    .filter(|s| s.date >= start && s.date <= end)
                    .cloned()
                    .collect(),
                None => Vec::new(),
            }
        };

        let counts = windows
            .iter()
            .map(|(r, w)| RangeCount {
                range: *r,
                count: within(*w).len(),
            })
            .collect();
        let window = range.window(today);

        Ok(UpcomingView {
            range,
            from: window.map(|(start, _)| start),
            to: window.map(|(_, end)| end),
            services: within(window),
            counts,
        })
    }

    /// Week view starting on the Monday of `start` (or of today).
    pub async fn week(&self, worker: &Worker, start: Option<NaiveDate>) -> AppResult<WeekAgenda> {
        let week_start = week_start_for(start.unwrap_or_else(|| self.clock.today()));
        let week_end = week_start + Duration::days(6);

        let assignments = self.assignments(&worker.id, week_start, week_end).await?;
        let calendar = self.holiday_calendar(week_start, week_end).await?;
        Ok(week_agenda(&assignments, week_start, &|date: NaiveDate| calendar.day_mode(date)))
    }

    pub async fn planned_minutes(
        &self,
        worker_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<u32> {
        let assignments = self.assignments(worker_id, from, to).await?;
        let calendar = self.holiday_calendar(from, to).await?;
        Ok(planned_minutes(&assignments, from, to, &|date: NaiveDate| calendar.day_mode(date)))
    }

    pub async fn completed_on(&self, date: NaiveDate) -> AppResult<HashSet<String>> {
        let key = progress_key(date);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(HashSet::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => Ok(ids.into_iter().collect()),
            Err(e) => {
                tracing::warn!("Ignoring unreadable progress entry {}: {}", key, e);
                Ok(HashSet::new())
            }
        }
    }

    async fn save_completed(&self, date: NaiveDate, ids: HashSet<String>) -> AppResult<()> {
        let key = progress_key(date);
        if ids.is_empty() {
            return self.store.remove(&key).await;
        }
        let sorted: BTreeSet<String> = ids.into_iter().collect();
        let raw = serde_json::to_string(&sorted)?;
        self.store.set(&key, &raw).await
    }

    /// Returns false when the service was already marked. Only assignments
    /// scheduled for the worker on `date` can be marked.
    pub async fn mark_completed(
        &self,
        worker: &Worker,
        date: NaiveDate,
        assignment_id: &str,
    ) -> AppResult<bool> {
        let (_, scheduled) = self.scheduled_on(worker, date).await?;
        if !scheduled.iter().any(|a| a.id == assignment_id) {
            return Err(DomainError::NotFound(format!(
                "No service {} scheduled on {}",
                assignment_id, date
            ))
            .into());
        }

        let mut ids = self.completed_on(date).await?;
        if !ids.insert(assignment_id.to_string()) {
            return Ok(false);
        }
        self.save_completed(date, ids).await?;
        tracing::info!("Service {} marked completed on {}", assignment_id, date);
        Ok(true)
    }

    /// Returns false when the service was not marked. Stale marks can be
    /// removed even if the assignment is no longer scheduled.
    pub async fn unmark_completed(
        &self,
        date: NaiveDate,
        assignment_id: &str,
    ) -> AppResult<bool> {
        let mut ids = self.completed_on(date).await?;
        if !ids.remove(assignment_id) {
            return Ok(false);
        }
        self.save_completed(date, ids).await?;
        tracing::info!("Service {} unmarked on {}", assignment_id, date);
        Ok(true)
    }
}
