//! Error types for taskpad
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (invalid input, unknown task, bad configuration)
//! - 4: Operation failed (storage could not be read or written)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskpad CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Failures of the underlying key-value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

/// Main error type for taskpad operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("{0}")]
    Validation(String),

    #[error("Task {0} not found")]
    NotFound(u64),

    #[error("Task {0} is already completed and can no longer be edited")]
    AlreadyCompleted(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Task {id} is corrupt: {reason}")]
    CorruptTask { id: u64, reason: String },

    #[error("Failed to read `{key}` from storage: {source}")]
    StorageRead {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to write `{key}` to storage: {source}")]
    StorageWrite {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl Error {
    pub fn read(key: &str, source: impl Into<StorageError>) -> Self {
        Error::StorageRead {
            key: key.to_string(),
            source: source.into(),
        }
    }

    pub fn write(key: &str, source: impl Into<StorageError>) -> Self {
        Error::StorageWrite {
            key: key.to_string(),
            source: source.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::NotFound(_)
            | Error::AlreadyCompleted(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::CorruptTask { .. } | Error::StorageRead { .. } | Error::StorageWrite { .. } => {
                exit_codes::OPERATION_FAILED
            }
        }
    }

    /// Whether repeating the same operation later may succeed.
    ///
    /// Write failures never change state, so the caller can simply try again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::StorageWrite { .. }
                | Error::StorageRead {
                    source: StorageError::LockFailed(_),
                    ..
                }
        )
    }
}

/// Result type alias for taskpad operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_map_to_user_exit_code() {
        assert_eq!(Error::Validation("bad".into()).exit_code(), exit_codes::USER_ERROR);
        assert_eq!(Error::NotFound(7).exit_code(), exit_codes::USER_ERROR);
        assert_eq!(Error::AlreadyCompleted(7).exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn storage_errors_are_operation_failures() {
        let err = Error::write("tasks", StorageError::LockFailed(PathBuf::from("tasks.lock")));
        assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
        assert!(err.is_retryable());
        assert!(err.to_string().contains("`tasks`"));
    }

    #[test]
    fn validation_is_not_retryable() {
        assert!(!Error::Validation("Title is required".into()).is_retryable());
    }

    #[test]
    fn json_read_failure_is_not_retryable() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = Error::read("tasks", json_err);
        assert!(!err.is_retryable());
        assert!(matches!(err, Error::StorageRead { source: StorageError::Json(_), .. }));
    }
}
