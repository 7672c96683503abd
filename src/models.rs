use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single task in the task manager.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, derived from the creation time in milliseconds.
    pub id: u64,
    /// Short title of the task (at most 25 characters).
    pub title: String,
    /// Longer free-form description.
    pub description: String,
    /// `false` while pending, `true` once completed.
    #[serde(default)]
    pub status: bool,
    /// Timestamp when the task was created (ISO 8601).
    pub created_at: String,
    /// Timestamp when the task was completed (ISO 8601), empty while pending.
    #[serde(default)]
    pub completed_at: String,
    /// Number of days allotted to the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// `created_at + duration` days (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn completed_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.completed_at)
    }

    pub fn deadline_utc(&self) -> Option<DateTime<Utc>> {
        self.deadline.as_deref().and_then(parse_timestamp)
    }

    /// `completed_at` is set exactly when the task is completed.
    pub fn is_consistent(&self) -> bool {
        self.status != self.completed_at.is_empty()
    }
}

/// The user profile shown next to the task statistics.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    /// Opaque reference (path or URI) to the profile picture.
    #[serde(default)]
    pub profile_picture: String,
}

/// Formats a timestamp the way it is persisted: RFC 3339, UTC, milliseconds.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a persisted timestamp.
///
/// Accepts RFC 3339 with any offset, and the verbose
/// `Mon Oct 19 2026 10:30:00 GMT+0200 (Zone Name)` form found in older data.
/// Returns `None` for empty or unrecognised input.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    // Drop the trailing "(Zone Name)" of the verbose form.
    let verbose = raw.split(" (").next().unwrap_or(raw);
    DateTime::parse_from_str(verbose, "%a %b %d %Y %H:%M:%S GMT%z")
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
