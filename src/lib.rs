//! tau - Task Tracking Library
//!
//! This library provides the core functionality for the tau CLI tool:
//! file-backed tasks with a lifecycle log, grouped into monthly buckets.
//!
//! # Core Concepts
//!
//! - **Tasks**: JSON records keyed by a random reference id
//! - **Short ids**: Small recyclable numbers for the open tasks of a month
//! - **Month buckets**: Per-month manifests used to list open tasks
//! - **Due dates**: `DDMM` input rolled forward to the next occurrence
//! - **Ranks**: Exact decimals ordering the task list
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Storage root resolution and `tau.toml` settings
//! - `error`: Error types and result aliases
//! - `task`: Task records, lifecycle events and comments
//! - `month`: Monthly bucket manifests
//! - `due`: `DDMM` due date validation and roll-forward
//! - `rank`: Arbitrary precision rank values
//! - `service`: Create, list, transition, comment and reconcile
//! - `storage`: File storage and directory management
//! - `lock`: File locking and atomic writes
//! - `clock`: Injectable "now"
//! - `author`: Comment author resolution
//! - `editor`: External editor capture
//! - `simulate`: Synthetic task generation

pub mod author;
pub mod cli;
pub mod clock;
pub mod config;
pub mod due;
pub mod editor;
pub mod error;
pub mod lock;
pub mod month;
pub mod output;
pub mod rank;
pub mod service;
pub mod simulate;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
