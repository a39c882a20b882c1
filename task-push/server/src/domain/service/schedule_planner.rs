//! 日程规划 - 把任务转换为日历事件草稿

use chrono::{Duration, NaiveDateTime};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::domain::model::{CalendarEventDraft, EventDateTime, SchedulePlan, SkippedTask, Task};

pub const DEFAULT_START_TIME: &str = "10:00";
pub const DEFAULT_TIME_ZONE: &str = "Asia/Kolkata";

const DATE_TIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_TIME_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("invalid duration `{0}`")]
    InvalidDuration(String),
    #[error("invalid start `{0}`")]
    InvalidStart(String),
    #[error("unknown time zone `{0}`")]
    UnknownTimeZone(String),
}

/// 日程规划器
#[derive(Debug, Clone, Copy)]
pub struct SchedulePlanner {
    time_zone: Tz,
}

impl SchedulePlanner {
    pub fn new(time_zone: &str) -> Result<Self, PlanError> {
        let time_zone = time_zone
            .parse::<Tz>()
            .map_err(|_| PlanError::UnknownTimeZone(time_zone.to_string()))?;
        Ok(Self { time_zone })
    }

    pub fn time_zone(&self) -> &'static str {
        self.time_zone.name()
    }

    /// 逐个规划任务，无法解析的任务记录日志后跳过
    #[instrument(skip_all, fields(time_zone = %self.time_zone(), tasks = tasks.len()))]
    pub fn plan(&self, tasks: &[Task]) -> SchedulePlan {
        let mut plan = SchedulePlan::default();
        for task in tasks {
            match self.draft_event(task) {
                Ok(event) => plan.events.push(event),
                Err(e) => {
                    warn!(task = %task.name, error = %e, "Could not schedule task");
                    plan.skipped.push(SkippedTask {
                        name: task.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        plan
    }

    pub fn draft_event(&self, task: &Task) -> Result<CalendarEventDraft, PlanError> {
        let minutes = task
            .duration
            .trim()
            .parse::<i64>()
            .map_err(|_| PlanError::InvalidDuration(task.duration.clone()))?;

        let start_time = task
            .start_time
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_START_TIME);
        let raw_start = format!("{} {}", task.deadline, start_time);
        let start = NaiveDateTime::parse_from_str(&raw_start, DATE_TIME_INPUT_FORMAT)
            .map_err(|_| PlanError::InvalidStart(raw_start.clone()))?;
        let end = Duration::try_minutes(minutes)
            .and_then(|duration| start.checked_add_signed(duration))
            .ok_or_else(|| PlanError::InvalidDuration(task.duration.clone()))?;

        Ok(CalendarEventDraft {
            summary: task.name.clone(),
            description: format!("Priority: {}, Energy: {}", task.priority, task.energy),
            start: self.event_time(start),
            end: self.event_time(end),
        })
    }

    fn event_time(&self, at: NaiveDateTime) -> EventDateTime {
        EventDateTime {
            date_time: at.format(DATE_TIME_OUTPUT_FORMAT).to_string(),
            time_zone: self.time_zone().to_string(),
        }
    }
}

impl Default for SchedulePlanner {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::Asia::Kolkata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, duration: &str, deadline: &str, start_time: Option<&str>) -> Task {
        Task {
            name: name.to_string(),
            priority: "high".to_string(),
            duration: duration.to_string(),
            energy: "low".to_string(),
            deadline: deadline.to_string(),
            start_time: start_time.map(str::to_string),
        }
    }

    #[test]
    fn end_is_start_plus_duration() {
        let planner = SchedulePlanner::default();
        let event = planner
            .draft_event(&task("Write report", "90", "2025-06-01", Some("23:00")))
            .unwrap();

        assert_eq!(event.summary, "Write report");
        assert_eq!(event.description, "Priority: high, Energy: low");
        assert_eq!(event.start.date_time, "2025-06-01T23:00:00");
        assert_eq!(event.end.date_time, "2025-06-02T00:30:00");
        assert_eq!(event.start.time_zone, "Asia/Kolkata");
    }

    #[test]
    fn missing_start_time_defaults_to_ten() {
        let event = SchedulePlanner::default()
            .draft_event(&task("Buy milk", "15", "2025-06-01", None))
            .unwrap();
        assert_eq!(event.start.date_time, "2025-06-01T10:00:00");
        assert_eq!(event.end.date_time, "2025-06-01T10:15:00");
    }

    #[test]
    fn empty_start_time_uses_default_start() {
        let event = SchedulePlanner::default()
            .draft_event(&task("Stretch", "5", "2025-06-01", Some("")))
            .unwrap();
        assert_eq!(event.start.date_time, "2025-06-01T10:00:00");
        assert_eq!(event.end.date_time, "2025-06-01T10:05:00");
    }

    #[test]
    fn malformed_tasks_are_skipped() {
        let planner = SchedulePlanner::new("Europe/Berlin").unwrap();
        let plan = planner.plan(&[
            task("ok", "30", "2025-06-01", Some("09:00")),
            task("bad duration", "half an hour", "2025-06-01", None),
            task("bad date", "30", "June 1st", None),
        ]);

        assert_eq!(plan.events.len(), 1);
        assert_eq!(plan.events[0].end.time_zone, "Europe/Berlin");
        assert_eq!(plan.skipped.len(), 2);
        assert_eq!(plan.skipped[0].name, "bad duration");
        assert_eq!(plan.skipped[1].name, "bad date");
    }

    #[test]
    fn unknown_time_zone_is_rejected() {
        assert_eq!(
            SchedulePlanner::new("Nowhere/Special").unwrap_err(),
            PlanError::UnknownTimeZone("Nowhere/Special".to_string())
        );
    }
}
