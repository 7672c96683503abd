//! Local persistence
//!
//! State lives in a single data directory, one JSON file per key:
//!
//! ```text
//! <data_dir>/
//!   tasks.json     # key "tasks": array of tasks
//!   profile.json   # key "profile": the profile object
//!   tasks.lock     # held while a load-mutate-save cycle runs
//!   profile.lock   # held while the profile is written
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::config::Config;
use crate::error::{Error, Result, StorageError};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::models::{Profile, Task};

/// Storage key of the task collection
pub const TASKS_KEY: &str = "tasks";

/// Storage key of the profile record
pub const PROFILE_KEY: &str = "profile";

/// A directory-backed key-value store holding one JSON document per key.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    root: PathBuf,
}

impl KeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Path of the lock file guarding `key`
    pub fn lock_path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.lock"))
    }

    /// Raw value for `key`, `None` if it was never written.
    pub fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Atomically replaces the value for `key`.
    pub fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        lock::write_atomic(self.path_for(key), value.as_bytes())
    }

    /// Deletes `key`; removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> std::result::Result<Option<T>, StorageError> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> std::result::Result<(), StorageError> {
        let json = serde_json::to_string_pretty(value)?;
        self.set(key, &json)
    }

    /// Exclusive lock for `key`, waiting at most `timeout_ms`.
    pub fn lock(&self, key: &str, timeout_ms: u64) -> std::result::Result<FileLock, StorageError> {
        FileLock::acquire(self.lock_path_for(key), timeout_ms)
    }
}

/// Persistence for the task collection and the profile.
///
/// The collection is always read and written whole. Mutations go through
/// [`TaskStore::update`], which holds the storage lock for the entire
/// load-mutate-save cycle so concurrent writers cannot lose each other's
/// changes.
#[derive(Debug, Clone)]
pub struct TaskStore {
    kv: KeyValueStore,
    lock_timeout_ms: u64,
}

impl TaskStore {
    /// Opens the store rooted at `data_dir`. Nothing is touched on disk yet.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            kv: KeyValueStore::new(data_dir),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::open(config.resolve_data_dir()).with_lock_timeout(config.lock_timeout_ms)
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn data_dir(&self) -> &Path {
        self.kv.root()
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.kv.path_for(TASKS_KEY)
    }

    /// Loads all tasks, distinguishing "no data yet" from a failed read.
    pub fn try_load_tasks(&self) -> Result<Vec<Task>> {
        let tasks = self
            .kv
            .get_json::<Vec<Task>>(TASKS_KEY)
            .map_err(|e| Error::read(TASKS_KEY, e))?
            .unwrap_or_default();
        tracing::debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Loads all tasks.
    ///
    /// Returns an empty vector if nothing was stored yet or the data cannot be
    /// read; read failures are logged, never returned.
    pub fn load_tasks(&self) -> Vec<Task> {
        self.try_load_tasks().unwrap_or_else(|e| {
            tracing::error!(error = %e, "error loading tasks");
            Vec::new()
        })
    }

    /// Loads a single task by its ID.
    ///
    /// Returns `None` if the task is not found or the collection cannot be read.
    pub fn get_task_by_id(&self, id: u64) -> Option<Task> {
        self.load_tasks().into_iter().find(|t| t.id == id)
    }

    /// Replaces the whole stored collection.
    ///
    /// Failures are logged and returned; on error nothing was persisted.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let _lock = self
            .kv
            .lock(TASKS_KEY, self.lock_timeout_ms)
            .map_err(|e| Error::write(TASKS_KEY, e))
            .inspect_err(|e| tracing::error!(error = %e, "error saving tasks"))?;
        self.write_tasks(tasks)
    }

    /// Runs one load-mutate-save cycle under the storage lock.
    ///
    /// If `mutate` fails the collection is not written. A collection that
    /// cannot be read aborts the cycle instead of being overwritten.
    pub fn update<T, F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<T>,
    {
        let _lock = self
            .kv
            .lock(TASKS_KEY, self.lock_timeout_ms)
            .map_err(|e| Error::write(TASKS_KEY, e))?;

        let mut tasks = self.try_load_tasks()?;
        let out = mutate(&mut tasks)?;
        self.write_tasks(&tasks)?;
        Ok(out)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.kv
            .set_json(TASKS_KEY, &tasks)
            .map_err(|e| Error::write(TASKS_KEY, e))
            .inspect_err(|e| tracing::error!(error = %e, "error saving tasks"))?;
        tracing::debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }

    pub fn try_load_profile(&self) -> Result<Option<Profile>> {
        self.kv
            .get_json(PROFILE_KEY)
            .map_err(|e| Error::read(PROFILE_KEY, e))
    }

    /// Loads the profile; `None` when absent or unreadable (logged).
    pub fn load_profile(&self) -> Option<Profile> {
        self.try_load_profile().unwrap_or_else(|e| {
            tracing::error!(error = %e, "error loading profile");
            None
        })
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        let _lock = self
            .kv
            .lock(PROFILE_KEY, self.lock_timeout_ms)
            .map_err(|e| Error::write(PROFILE_KEY, e))
            .inspect_err(|e| tracing::error!(error = %e, "error saving profile"))?;
        self.kv
            .set_json(PROFILE_KEY, profile)
            .map_err(|e| Error::write(PROFILE_KEY, e))
            .inspect_err(|e| tracing::error!(error = %e, "error saving profile"))
    }

    /// Deletes the task collection and the profile.
    pub fn reset(&self) -> Result<()> {
        let _lock = self
            .kv
            .lock(TASKS_KEY, self.lock_timeout_ms)
            .map_err(|e| Error::write(TASKS_KEY, e))?;
        self.kv.remove(TASKS_KEY).map_err(|e| Error::write(TASKS_KEY, e))?;
        self.kv.remove(PROFILE_KEY).map_err(|e| Error::write(PROFILE_KEY, e))?;
        tracing::info!(dir = %self.data_dir().display(), "storage reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let kv = KeyValueStore::new(dir.path());
        assert_eq!(kv.get("tasks").unwrap(), None);
        kv.remove("tasks").unwrap();
    }

    #[test]
    fn set_then_get_returns_value() {
        let dir = tempfile::tempdir().unwrap();
        let kv = KeyValueStore::new(dir.path().join("nested"));
        kv.set("profile", "{}").unwrap();
        assert_eq!(kv.get("profile").unwrap().as_deref(), Some("{}"));
        assert!(kv.path_for("profile").ends_with("profile.json"));
    }

    #[test]
    fn corrupt_json_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let kv = KeyValueStore::new(dir.path());
        kv.set("tasks", "[{").unwrap();
        let err = kv.get_json::<Vec<Task>>("tasks").unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }
}
