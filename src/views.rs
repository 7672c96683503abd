use std::cmp::Reverse;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

use crate::models::{parse_timestamp, Task};

/// Maximum number of entries in the completed view.
pub const COMPLETED_VIEW_LIMIT: usize = 20;

/// A pending task is flagged when its deadline is closer than this.
pub const DEADLINE_SOON_HOURS: i64 = 24;

/// Pending tasks, earliest deadline first.
///
/// Tasks without a (parseable) deadline sort as if due at the epoch, i.e.
/// first. The sort is stable, so equal deadlines keep their stored order.
pub fn pending_view(tasks: &[Task]) -> Vec<&Task> {
    let mut pending: Vec<&Task> = tasks.iter().filter(|t| !t.status).collect();
    pending.sort_by_key(|t| t.deadline_utc().map_or(0, |d| d.timestamp_millis()));
    pending
}

/// The most recently completed tasks, newest first.
pub fn completed_view(tasks: &[Task]) -> Vec<&Task> {
    let mut completed: Vec<&Task> = tasks.iter().filter(|t| t.status).collect();
    completed.sort_by_key(|t| Reverse(t.completed_at_utc().map_or(0, |d| d.timestamp_millis())));
    completed.truncate(COMPLETED_VIEW_LIMIT);
    completed
}

/// Whether a pending task is due within the next day (or already overdue).
///
/// Completed tasks and tasks without a deadline are never "soon".
pub fn is_deadline_soon(task: &Task, now: DateTime<Utc>) -> bool {
    if task.status {
        return false;
    }
    match task.deadline_utc() {
        Some(deadline) => deadline - now < Duration::hours(DEADLINE_SOON_HOURS),
        None => false,
    }
}

/// Short human label for the time remaining until the deadline.
pub fn time_left_label(task: &Task, now: DateTime<Utc>) -> String {
    let Some(deadline) = task.deadline_utc() else {
        return "-".to_string();
    };
    let left = deadline - now;
    if left < Duration::zero() {
        let overdue = -left;
        if overdue.num_days() > 0 {
            format!("{}d overdue", overdue.num_days())
        } else {
            format!("{}h overdue", overdue.num_hours())
        }
    } else if left.num_days() > 0 {
        format!("{}d {}h", left.num_days(), left.num_hours() % 24)
    } else {
        format!("{}h", left.num_hours())
    }
}

/// A stored timestamp in local time, `-` if absent or unreadable.
pub fn local_time_label(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Percentage of completed tasks, rounded; 0 when there are no tasks.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * completed as f64 / total as f64).round() as u32
}

/// Aggregate counts shown on the profile view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DailyStats {
    pub today_tasks: usize,
    pub today_completed_tasks: usize,
    pub pending_tasks: usize,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub completion_rate: u32,
}

impl DailyStats {
    /// Computes the statistics for `today` (a UTC calendar date).
    ///
    /// A task counts as today's when its `created_at` falls on `today` in UTC.
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let created_today = |t: &&Task| t.created_at_utc().map(|at| at.date_naive()) == Some(today);

        let today_tasks = tasks.iter().filter(created_today).count();
        let today_completed_tasks = tasks.iter().filter(created_today).filter(|t| t.status).count();
        let completed_tasks = tasks.iter().filter(|t| t.status).count();
        let total_tasks = tasks.len();

        DailyStats {
            today_tasks,
            today_completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            completed_tasks,
            total_tasks,
            completion_rate: completion_rate(completed_tasks, total_tasks),
        }
    }
}
