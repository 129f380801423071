//! Task records.
//!
//! A task is one JSON document holding its descriptive fields plus two
//! append-only logs: lifecycle events and comments. The current state is
//! never stored on its own; it is the action of the newest event.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::rank::Rank;

/// Lifecycle action, also used as the task state.
///
/// Any action may follow any other; `stop` only hides a task from listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    Open,
    Start,
    Pause,
    Stop,
}

impl TaskAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskAction::Open => "open",
            TaskAction::Start => "start",
            TaskAction::Pause => "pause",
            TaskAction::Stop => "stop",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(TaskAction::Open),
            "start" => Ok(TaskAction::Start),
            "pause" => Ok(TaskAction::Pause),
            "stop" => Ok(TaskAction::Stop),
            _ => Err(Error::InvalidArgument(format!(
                "unknown task action '{s}' (expected open|start|pause|stop)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskEvent {
    pub action: TaskAction,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskComment {
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assignee: Option<String>,
    pub project: Option<String>,
    /// Raw `DDMM` due date, validated on create
    pub due: Option<String>,
    pub rank: Option<Rank>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRecord {
    pub reference_id: String,
    pub short_id: u32,
    pub title: String,
    pub description: String,
    pub assignee: Option<String>,
    pub project: Option<String>,
    pub due: Option<NaiveDate>,
    pub rank: Option<Rank>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub events: Vec<TaskEvent>,
    #[serde(default)]
    pub comments: Vec<TaskComment>,
}

impl TaskRecord {
    pub fn current_state(&self) -> TaskAction {
        self.events
            .last()
            .map(|event| event.action)
            .unwrap_or(TaskAction::Open)
    }

    pub fn is_open(&self) -> bool {
        self.current_state() != TaskAction::Stop
    }

    /// Record a lifecycle action.
    ///
    /// Re-applying the current state is a no-op; returns whether an event
    /// was appended.
    pub fn apply_transition(&mut self, action: TaskAction, now: DateTime<Utc>) -> bool {
        if self.current_state() == action {
            return false;
        }
        let timestamp = self.clamp_timestamp(now);
        self.events.push(TaskEvent { action, timestamp });
        true
    }

    pub fn add_comment(&mut self, content: impl Into<String>, author: impl Into<String>, now: DateTime<Utc>) {
        self.comments.push(TaskComment {
            content: content.into(),
            author: author.into(),
            timestamp: now,
        });
    }

    // Events stay ordered even if the clock steps backwards.
    fn clamp_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.events.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        }
    }
}

/// Fresh storage key: 32 lowercase hex characters.
pub fn new_reference_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Smallest id not present in `taken`.
pub fn smallest_free_id(taken: impl IntoIterator<Item = u32>) -> u32 {
    let mut taken: Vec<u32> = taken.into_iter().collect();
    taken.sort_unstable();
    taken.dedup();
    let mut candidate = 0;
    for id in taken {
        if id != candidate {
            break;
        }
        candidate += 1;
    }
    candidate
}

/// Sort by rank, highest first, unranked last. Equal ranks keep their order.
pub fn sort_by_rank(tasks: &mut [TaskRecord]) {
    tasks.sort_by(|left, right| match (&left.rank, &right.rank) {
        (Some(l), Some(r)) => r.cmp(l),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
