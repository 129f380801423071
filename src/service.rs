//! Task operations over the store.
//!
//! Open tasks are found through the month bucket of "now": a task is listed,
//! and addressable by its short id, only while it is a member of that bucket
//! and its state is not `stop`. Short ids are recycled once a task stops.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::due;
use crate::error::{Error, Result};
use crate::lock::FileLock;
use crate::month::{month_key, MonthIndex};
use crate::storage::Storage;
use crate::task::{self, NewTask, TaskAction, TaskRecord};

#[derive(Debug, Clone)]
pub struct TaskService {
    storage: Storage,
    lock_timeout_ms: u64,
}

/// Result of `set_state`: the saved task and whether an event was appended.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub task: TaskRecord,
    pub changed: bool,
}

/// A task file that no month bucket lists.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrphanTask {
    pub reference_id: String,
    pub month: String,
}

/// A bucket member whose task file is missing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DanglingMember {
    pub month: String,
    pub reference_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub tasks_scanned: usize,
    pub months_scanned: usize,
    pub orphans: Vec<OrphanTask>,
    pub dangling: Vec<DanglingMember>,
    /// Task files that could not be parsed; never repaired automatically.
    pub unreadable: Vec<String>,
    pub repaired: bool,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.dangling.is_empty() && self.unreadable.is_empty()
    }
}

impl TaskService {
    pub fn new(storage: Storage, lock_timeout_ms: u64) -> Self {
        Self {
            storage,
            lock_timeout_ms,
        }
    }

    /// Service over `root`, creating `task/` and `month/` if needed.
    pub fn open(root: &Path, config: &Config) -> Result<Self> {
        let storage = Storage::new(root);
        storage.init()?;
        Ok(Self::new(storage, config.settings.lock_timeout_ms))
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Create a task and register it in the bucket for `now`.
    ///
    /// `today` is the caller's local calendar date; the due date rolls
    /// forward from it and is checked before anything is written. The record is
    /// persisted before the bucket; a crash in between leaves an orphan that
    /// [`TaskService::reconcile`] reports.
    pub fn create(
        &self,
        new_task: NewTask,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<TaskRecord> {
        let due = due::resolve(new_task.due.as_deref(), today)?;

        let key = month_key(now);
        let _lock = self.lock_month(&key)?;
        let mut index = self.load_or_create_month_locked(&key, now)?;
        let open = self.load_open_members(&index)?;
        let short_id = task::smallest_free_id(open.iter().map(|task| task.short_id));

        let record = TaskRecord {
            reference_id: task::new_reference_id(),
            short_id,
            title: new_task.title,
            description: new_task.description,
            assignee: new_task.assignee,
            project: new_task.project,
            due,
            rank: new_task.rank,
            created_at: now,
            events: Vec::new(),
            comments: Vec::new(),
        };
        self.storage.put_task(&record)?;

        index.add(record.reference_id.clone());
        self.storage.put_month(&index)?;

        tracing::info!(
            reference_id = %record.reference_id,
            short_id = record.short_id,
            month = %key,
            "task created"
        );
        Ok(record)
    }

    /// Bucket for `now`, created and persisted if absent.
    pub fn load_or_create_month(&self, now: DateTime<Utc>) -> Result<MonthIndex> {
        let key = month_key(now);
        match self.storage.get_month(&key) {
            Err(Error::NotFound(_)) => {
                let _lock = self.lock_month(&key)?;
                self.load_or_create_month_locked(&key, now)
            }
            other => other,
        }
    }

    /// Open tasks of the current month, highest rank first.
    pub fn list_open(&self, now: DateTime<Utc>) -> Result<Vec<TaskRecord>> {
        let index = self.load_or_create_month(now)?;
        let mut open = self.load_open_members(&index)?;
        task::sort_by_rank(&mut open);
        Ok(open)
    }

    pub fn find_by_short_id(&self, short_id: u32, now: DateTime<Utc>) -> Result<TaskRecord> {
        let mut matches: Vec<TaskRecord> = self
            .list_open(now)?
            .into_iter()
            .filter(|task| task.short_id == short_id)
            .collect();
        match matches.len() {
            0 => Err(Error::NotFound(format!("task ID {short_id}"))),
            1 => Ok(matches.remove(0)),
            n => Err(Error::IndexInvariantViolation(format!(
                "{n} open tasks share ID {short_id} in month {}",
                month_key(now)
            ))),
        }
    }

    pub fn set_state(&self, short_id: u32, action: TaskAction, now: DateTime<Utc>) -> Result<Transition> {
        let mut task = self.find_by_short_id(short_id, now)?;
        let changed = self.transition(&mut task, action, now)?;
        Ok(Transition { task, changed })
    }

    /// Apply `action` to an already loaded task and persist it if it changed.
    pub fn transition(&self, task: &mut TaskRecord, action: TaskAction, now: DateTime<Utc>) -> Result<bool> {
        let changed = task.apply_transition(action, now);
        if changed {
            self.storage.put_task(task)?;
            tracing::info!(reference_id = %task.reference_id, short_id = task.short_id, action = %action, "task state changed");
        } else {
            tracing::debug!(reference_id = %task.reference_id, short_id = task.short_id, action = %action, "task already in state");
        }
        Ok(changed)
    }

    pub fn add_comment(
        &self,
        short_id: u32,
        content: &str,
        author: &str,
        now: DateTime<Utc>,
    ) -> Result<TaskRecord> {
        let mut task = self.find_by_short_id(short_id, now)?;
        task.add_comment(content, author, now);
        self.storage.put_task(&task)?;
        tracing::info!(reference_id = %task.reference_id, short_id, author, "comment added");
        Ok(task)
    }

    /// Short id the next created task would get.
    pub fn next_free_id(&self, now: DateTime<Utc>) -> Result<u32> {
        let open = self.list_open(now)?;
        Ok(task::smallest_free_id(open.iter().map(|task| task.short_id)))
    }

    /// Cross-check `task/` against every month bucket.
    ///
    /// With `repair`, orphans join the bucket of their own `created_at` and
    /// dangling members are dropped from their bucket.
    pub fn reconcile(&self, repair: bool) -> Result<ReconcileReport> {
        let mut report = ReconcileReport {
            repaired: repair,
            ..ReconcileReport::default()
        };

        let task_refs = self.storage.list_task_refs()?;
        let existing: HashSet<&str> = task_refs.iter().map(String::as_str).collect();
        let mut indexed: HashSet<String> = HashSet::new();

        let month_keys = self.storage.list_month_keys()?;
        for key in &month_keys {
            let index = self.storage.get_month(key)?;
            for member in index.members() {
                if !existing.contains(member.as_str()) {
                    report.dangling.push(DanglingMember {
                        month: key.clone(),
                        reference_id: member.clone(),
                    });
                }
                indexed.insert(member.clone());
            }
        }

        let mut orphan_records = Vec::new();
        for reference_id in &task_refs {
            if indexed.contains(reference_id) {
                continue;
            }
            match self.storage.get_task(reference_id) {
                Ok(record) => {
                    report.orphans.push(OrphanTask {
                        reference_id: reference_id.clone(),
                        month: month_key(record.created_at),
                    });
                    orphan_records.push(record);
                }
                Err(Error::CorruptRecord { path, message }) => {
                    tracing::warn!(path = %path.display(), %message, "unreadable task record");
                    report.unreadable.push(reference_id.clone());
                }
                Err(err) => return Err(err),
            }
        }

        report.tasks_scanned = task_refs.len();
        report.months_scanned = month_keys.len();

        if repair {
            for record in &orphan_records {
                let key = month_key(record.created_at);
                let _lock = self.lock_month(&key)?;
                let mut index = self.load_or_create_month_locked(&key, record.created_at)?;
                if index.add(record.reference_id.clone()) {
                    self.storage.put_month(&index)?;
                }
                tracing::info!(reference_id = %record.reference_id, month = %key, "orphan task activated");
            }
            for member in &report.dangling {
                let _lock = self.lock_month(&member.month)?;
                let mut index = self.storage.get_month(&member.month)?;
                if index.remove(&member.reference_id) {
                    self.storage.put_month(&index)?;
                }
                tracing::info!(reference_id = %member.reference_id, month = %member.month, "dangling member removed");
            }
        }

        Ok(report)
    }

    fn lock_month(&self, key: &str) -> Result<FileLock> {
        FileLock::acquire(self.storage.month_lock_file(key), self.lock_timeout_ms)
    }

    // Caller holds the month lock.
    fn load_or_create_month_locked(&self, key: &str, created_at: DateTime<Utc>) -> Result<MonthIndex> {
        match self.storage.get_month(key) {
            Ok(index) => Ok(index),
            Err(Error::NotFound(_)) => {
                let index = MonthIndex::new(created_at);
                self.storage.put_month(&index)?;
                tracing::debug!(month = %key, "month bucket created");
                Ok(index)
            }
            Err(err) => Err(err),
        }
    }

    /// Members in bucket order, without stopped tasks.
    ///
    /// A member whose file is gone is skipped; `reconcile` reports it.
    fn load_open_members(&self, index: &MonthIndex) -> Result<Vec<TaskRecord>> {
        let mut open = Vec::with_capacity(index.members().len());
        for reference_id in index.members() {
            match self.storage.get_task(reference_id) {
                Ok(task) if task.is_open() => open.push(task),
                Ok(_) => {}
                Err(Error::NotFound(_)) => {
                    tracing::warn!(reference_id = %reference_id, month = index.month_key(), "bucket member has no task file");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(open)
    }
}
