//! Monthly task buckets.
//!
//! Each calendar month (UTC) gets a manifest of the reference ids of tasks
//! created in it. Listing open tasks only scans the current month's bucket.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// `MMYY` bucket key, e.g. `0624` for June 2024.
pub fn month_key(at: DateTime<Utc>) -> String {
    format!("{:02}{:02}", at.month(), at.year().rem_euclid(100))
}

/// Whether `name` looks like a bucket file name.
pub fn is_month_key(name: &str) -> bool {
    name.len() == 4
        && name.bytes().all(|b| b.is_ascii_digit())
        && matches!(name[..2].parse::<u32>(), Ok(1..=12))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthIndex {
    #[serde(skip)]
    month_key: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "tasks", default)]
    members: Vec<String>,
}

impl MonthIndex {
    /// Empty bucket for the month containing `created_at`.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            month_key: month_key(created_at),
            created_at,
            members: Vec::new(),
        }
    }

    /// The key is not stored in the file; the loader restores it from the file name.
    pub(crate) fn with_key(mut self, key: impl Into<String>) -> Self {
        self.month_key = key.into();
        self
    }

    pub fn month_key(&self) -> &str {
        &self.month_key
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, reference_id: &str) -> bool {
        self.members.iter().any(|member| member == reference_id)
    }

    /// Append a member. Returns false if it was already present.
    pub fn add(&mut self, reference_id: impl Into<String>) -> bool {
        let reference_id = reference_id.into();
        if self.contains(&reference_id) {
            return false;
        }
        self.members.push(reference_id);
        true
    }

    /// Remove a member. Returns false if it was not present.
    pub fn remove(&mut self, reference_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member != reference_id);
        before != self.members.len()
    }
}
