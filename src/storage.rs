//! Storage layer for tau
//!
//! All state lives under one root directory:
//!
//! ```text
//! <root>/
//!   tau.toml                  # Optional settings
//!   task/
//!     <reference_id>          # One JSON document per task
//!   month/
//!     <MMYY>                  # Month bucket: created_at + ordered reference ids
//!     <MMYY>.lock             # Advisory lock for bucket read-modify-write
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::lock;
use crate::month::{self, MonthIndex};
use crate::task::TaskRecord;

/// Name of the task record directory
pub const TASK_DIR: &str = "task";

/// Name of the month bucket directory
pub const MONTH_DIR: &str = "month";

/// File-backed store for task records and month buckets
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn task_dir(&self) -> PathBuf {
        self.root.join(TASK_DIR)
    }

    pub fn month_dir(&self) -> PathBuf {
        self.root.join(MONTH_DIR)
    }

    pub fn task_file(&self, reference_id: &str) -> PathBuf {
        self.task_dir().join(reference_id)
    }

    pub fn month_file(&self, month_key: &str) -> PathBuf {
        self.month_dir().join(month_key)
    }

    /// Lock guarding read-modify-write of one month bucket
    pub fn month_lock_file(&self, month_key: &str) -> PathBuf {
        lock::lock_path_for(&self.month_file(month_key))
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Create the root, `task/` and `month/` if they are missing
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.task_dir())?;
        fs::create_dir_all(self.month_dir())?;
        Ok(())
    }

    // =========================================================================
    // Task records
    // =========================================================================

    pub fn put_task(&self, record: &TaskRecord) -> Result<()> {
        let path = self.task_file(&record.reference_id);
        tracing::debug!(reference_id = %record.reference_id, "writing task record");
        self.write_json(&path, record)
    }

    /// Load a task record; `NotFound` if missing, `CorruptRecord` if unreadable.
    pub fn get_task(&self, reference_id: &str) -> Result<TaskRecord> {
        if !is_safe_name(reference_id) {
            return Err(Error::NotFound(format!("task record {reference_id}")));
        }
        let path = self.task_file(reference_id);
        let mut record: TaskRecord =
            self.read_json(&path, || format!("task record {reference_id}"))?;
        // The file name is authoritative for the key.
        record.reference_id = reference_id.to_string();
        Ok(record)
    }

    /// Reference ids of every stored task, sorted
    pub fn list_task_refs(&self) -> Result<Vec<String>> {
        self.list_names(&self.task_dir(), is_safe_name)
    }

    // =========================================================================
    // Month buckets
    // =========================================================================

    pub fn put_month(&self, index: &MonthIndex) -> Result<()> {
        let path = self.month_file(index.month_key());
        tracing::debug!(month = index.month_key(), members = index.members().len(), "writing month bucket");
        self.write_json(&path, index)
    }

    /// Load a month bucket; `NotFound` if missing, `CorruptRecord` if unreadable.
    pub fn get_month(&self, month_key: &str) -> Result<MonthIndex> {
        if !month::is_month_key(month_key) {
            return Err(Error::NotFound(format!("month bucket {month_key}")));
        }
        let path = self.month_file(month_key);
        let index: MonthIndex = self.read_json(&path, || format!("month bucket {month_key}"))?;
        Ok(index.with_key(month_key))
    }

    /// Keys of every stored month bucket, sorted
    pub fn list_month_keys(&self) -> Result<Vec<String>> {
        self.list_names(&self.month_dir(), month::is_month_key)
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Write pretty JSON atomically (temp file + rename)
    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path, label: impl FnOnce() -> String) -> Result<T> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotFound(label()));
            }
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                return Err(Error::CorruptRecord {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
            }
            Err(err) => return Err(Error::Io(err)),
        };
        serde_json::from_str(&content).map_err(|err| Error::CorruptRecord {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    fn list_names(&self, dir: &Path, keep: fn(&str) -> bool) -> Result<Vec<String>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if keep(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Reference ids are plain tokens; anything with a dot is a temp or lock file.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
