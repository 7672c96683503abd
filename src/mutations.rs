//! Task mutations
//!
//! Every operation validates its input before touching storage, then runs a
//! single load-mutate-save cycle through [`TaskStore::update`].

use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::models::{format_timestamp, Task};
use crate::storage::TaskStore;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 25;

/// Longest accepted duration, in days (100 years).
pub const MAX_DURATION_DAYS: u32 = 36_500;

/// User-supplied fields of a task, shared by create and edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    /// Days until the deadline; `None` means no deadline.
    pub duration: Option<u32>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration = Some(days);
        self
    }

    /// Rejects blank fields, over-long titles and out-of-range durations.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Title is required".into()));
        }
        let len = self.title.chars().count();
        if len > MAX_TITLE_LEN {
            return Err(Error::Validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters (got {len})"
            )));
        }
        if self.description.trim().is_empty() {
            return Err(Error::Validation("Description is required".into()));
        }
        if let Some(days) = self.duration {
            if days > MAX_DURATION_DAYS {
                return Err(Error::Validation(format!(
                    "Duration must be at most {MAX_DURATION_DAYS} days (got {days})"
                )));
            }
        }
        Ok(())
    }
}

/// Id for a task created at `now`.
///
/// The creation time in milliseconds, bumped past the largest existing id so
/// ids stay unique and increasing even within one millisecond.
pub fn next_task_id(tasks: &[Task], now: DateTime<Utc>) -> Result<u64> {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    match tasks.iter().map(|t| t.id).max() {
        Some(max) if max >= millis => max.checked_add(1).ok_or_else(|| Error::CorruptTask {
            id: max,
            reason: "no task id left above this one".into(),
        }),
        _ => Ok(millis),
    }
}

/// `created_at + duration` days, if a duration is given.
pub fn deadline_for(created_at: DateTime<Utc>, duration: Option<u32>) -> Result<Option<DateTime<Utc>>> {
    let Some(days) = duration else {
        return Ok(None);
    };
    Duration::try_days(i64::from(days))
        .and_then(|d| created_at.checked_add_signed(d))
        .map(Some)
        .ok_or_else(|| Error::Validation("Duration is too large".into()))
}

/// Partial edit of a pending task; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the deadline.
    pub duration: Option<Option<u32>>,
}

/// Creates a pending task from `draft` and persists it.
pub fn create_task(store: &TaskStore, draft: &TaskDraft, now: DateTime<Utc>) -> Result<Task> {
    draft.validate()?;

    let task = store.update(|tasks| {
        let deadline = deadline_for(now, draft.duration)?.map(format_timestamp);
        let task = Task {
            id: next_task_id(tasks, now)?,
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: false,
            created_at: format_timestamp(now),
            completed_at: String::new(),
            duration: draft.duration,
            deadline,
        };
        tasks.push(task.clone());
        Ok(task)
    })?;

    tracing::info!(id = task.id, title = %task.title, "task created");
    Ok(task)
}

/// Replaces title, description and duration of a pending task.
///
/// The deadline is recomputed from the original creation time. Completed
/// tasks cannot be edited.
pub fn edit_task(store: &TaskStore, id: u64, draft: &TaskDraft) -> Result<Task> {
    draft.validate()?;

    let task = store.update(|tasks| {
        let task = find_pending(tasks, id)?;
        apply_draft(task, draft)?;
        Ok(task.clone())
    })?;

    tracing::info!(id, "task updated");
    Ok(task)
}

/// Merges `patch` into the stored task and saves it, all under one lock.
///
/// The merged fields go through the same validation as [`edit_task`].
pub fn patch_task(store: &TaskStore, id: u64, patch: &TaskPatch) -> Result<Task> {
    let task = store.update(|tasks| {
        let task = find_pending(tasks, id)?;
        let draft = TaskDraft {
            title: patch.title.clone().unwrap_or_else(|| task.title.clone()),
            description: patch.description.clone().unwrap_or_else(|| task.description.clone()),
            duration: patch.duration.unwrap_or(task.duration),
        };
        draft.validate()?;
        apply_draft(task, &draft)?;
        Ok(task.clone())
    })?;

    tracing::info!(id, "task updated");
    Ok(task)
}

fn find_pending(tasks: &mut [Task], id: u64) -> Result<&mut Task> {
    let task = tasks.iter_mut().find(|t| t.id == id).ok_or(Error::NotFound(id))?;
    if task.is_completed() {
        return Err(Error::AlreadyCompleted(id));
    }
    Ok(task)
}

fn apply_draft(task: &mut Task, draft: &TaskDraft) -> Result<()> {
    let created_at = task.created_at_utc().ok_or_else(|| Error::CorruptTask {
        id: task.id,
        reason: format!("unreadable createdAt '{}'", task.created_at),
    })?;
    let deadline = deadline_for(created_at, draft.duration)?;

    task.title = draft.title.clone();
    task.description = draft.description.clone();
    task.duration = draft.duration;
    task.deadline = deadline.map(format_timestamp);
    Ok(())
}

/// Marks a task as completed at `now`.
///
/// Completing an already completed task moves its completion time to `now`.
pub fn complete_task(store: &TaskStore, id: u64, now: DateTime<Utc>) -> Result<Task> {
    let task = store.update(|tasks| {
        let task = tasks.iter_mut().find(|t| t.id == id).ok_or(Error::NotFound(id))?;
        task.status = true;
        task.completed_at = format_timestamp(now);
        Ok(task.clone())
    })?;

    tracing::info!(id, "task completed");
    Ok(task)
}

/// Removes a task, returning it.
pub fn delete_task(store: &TaskStore, id: u64) -> Result<Task> {
    let task = store.update(|tasks| {
        let idx = tasks.iter().position(|t| t.id == id).ok_or(Error::NotFound(id))?;
        Ok(tasks.remove(idx))
    })?;

    tracing::info!(id, "task removed");
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn task_with_id(id: u64) -> Task {
        Task {
            id,
            title: "t".into(),
            description: "d".into(),
            status: false,
            created_at: format_timestamp(at(id as i64)),
            completed_at: String::new(),
            duration: None,
            deadline: None,
        }
    }

    #[test]
    fn id_is_creation_millis() {
        assert_eq!(next_task_id(&[], at(1_700_000_000_123)).unwrap(), 1_700_000_000_123);
    }

    #[test]
    fn id_is_bumped_within_same_millisecond() {
        let tasks = vec![task_with_id(1_000), task_with_id(1_001)];
        assert_eq!(next_task_id(&tasks, at(1_000)).unwrap(), 1_002);
        assert_eq!(next_task_id(&tasks, at(5_000)).unwrap(), 5_000);
    }

    #[test]
    fn id_overflow_is_an_error() {
        let tasks = vec![task_with_id(u64::MAX)];
        let err = next_task_id(&tasks, at(1_000)).unwrap_err();
        assert!(matches!(err, Error::CorruptTask { id: u64::MAX, .. }));
    }

    #[test]
    fn title_limit_counts_characters() {
        let ok = TaskDraft::new("é".repeat(MAX_TITLE_LEN), "d");
        assert!(ok.validate().is_ok());
        let too_long = TaskDraft::new("a".repeat(MAX_TITLE_LEN + 1), "d");
        assert!(matches!(too_long.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(matches!(TaskDraft::new("   ", "d").validate(), Err(Error::Validation(_))));
        assert!(matches!(TaskDraft::new("t", "\n\t").validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn deadline_adds_whole_days() {
        let created = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        assert_eq!(
            deadline_for(created, Some(3)).unwrap(),
            Some(Utc.with_ymd_and_hms(2026, 10, 22, 8, 0, 0).unwrap())
        );
        assert_eq!(deadline_for(created, None).unwrap(), None);
    }

    #[test]
    fn deadline_past_the_calendar_is_rejected() {
        let created = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        assert!(matches!(deadline_for(created, Some(u32::MAX)), Err(Error::Validation(_))));
        assert!(matches!(deadline_for(created, Some(100_000_000)), Err(Error::Validation(_))));
    }

    #[test]
    fn duration_limit_is_validated() {
        let ok = TaskDraft::new("t", "d").with_duration(MAX_DURATION_DAYS);
        assert!(ok.validate().is_ok());
        let too_far = TaskDraft::new("t", "d").with_duration(MAX_DURATION_DAYS + 1);
        assert!(matches!(too_far.validate(), Err(Error::Validation(_))));
    }
}
