//! Source of "now".
//!
//! Month bucketing works on the UTC instant, while due dates roll forward
//! from the user's local calendar date. The CLI reads both once per
//! invocation from a [`Clock`]. Tests pin it with `TAU_NOW`, whose offset
//! stands in for the local timezone.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(DateTime<FixedOffset>),
}

impl Clock {
    /// Fixed clock from an RFC 3339 timestamp, system clock otherwise.
    pub fn from_override(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(Clock::System),
            Some(raw) => {
                let parsed = DateTime::parse_from_rfc3339(raw).map_err(|err| {
                    Error::InvalidArgument(format!("invalid --now timestamp '{raw}': {err}"))
                })?;
                Ok(Clock::Fixed(parsed))
            }
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => at.with_timezone(&Utc),
        }
    }

    /// Calendar date on the user's side: local time, or the pinned offset.
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(at) => at.date_naive(),
        }
    }
}
