//! Command-line interface for tau
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in [`task`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::task::TaskAction;

mod task;

/// tau - task tracking from the terminal
///
/// Tasks are stored as JSON files under the config directory and grouped
/// into monthly buckets; `list` shows the open tasks of the current month.
#[derive(Parser, Debug)]
#[command(name = "tau")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Storage root (defaults to ~/.config/tau)
    #[arg(long, global = true, env = "TAU_CONFIG_PATH")]
    pub config_path: Option<PathBuf>,

    /// Author recorded on comments
    #[arg(long, global = true, env = "TAU_AUTHOR")]
    pub author: Option<String>,

    /// Pin the current time (RFC 3339)
    #[arg(long, global = true, env = "TAU_NOW", hide = true)]
    pub now: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Assign the task to a user
        #[arg(short = 'a', long)]
        assign: Option<String>,

        /// Project tag (can be hierarchical: crypto.zk)
        #[arg(short, long)]
        project: Option<String>,

        /// Due date as DDMM, e.g. 0222
        #[arg(short, long)]
        due: Option<String>,

        /// Rank, an arbitrary precision decimal: 4.8761
        #[arg(short, long)]
        rank: Option<String>,

        /// Task title (prompted if omitted)
        #[arg(short, long)]
        title: Option<String>,

        /// Task description (opens the editor if omitted)
        #[arg(long)]
        desc: Option<String>,
    },

    /// List open tasks for the current month
    List,

    /// Show a task by id
    Show {
        /// Task id
        id: u32,
    },

    /// Start a task by id
    Start {
        /// Task id
        id: u32,
    },

    /// Pause a task by id
    Pause {
        /// Task id
        id: u32,
    },

    /// Stop a task by id
    Stop {
        /// Task id
        id: u32,
    },

    /// Comment on a task by id
    Comment {
        /// Task id
        id: u32,

        /// Comment text (opens the editor if omitted)
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Check that task files and month buckets agree
    Doctor {
        /// Activate orphaned tasks and drop dangling bucket entries
        #[arg(long)]
        repair: bool,
    },
}

/// Flags shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub config_path: Option<PathBuf>,
    pub author: Option<String>,
    pub now: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = GlobalOptions {
            config_path: self.config_path,
            author: self.author,
            now: self.now,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add {
                assign,
                project,
                due,
                rank,
                title,
                desc,
            } => task::run_add(
                task::AddOptions {
                    assign,
                    project,
                    due,
                    rank,
                    title,
                    desc,
                },
                &global,
            ),
            Commands::List => task::run_list(&global),
            Commands::Show { id } => task::run_show(task::ShowOptions { id }, &global),
            Commands::Start { id } => task::run_transition(
                task::TransitionOptions {
                    id,
                    action: TaskAction::Start,
                },
                &global,
            ),
            Commands::Pause { id } => task::run_transition(
                task::TransitionOptions {
                    id,
                    action: TaskAction::Pause,
                },
                &global,
            ),
            Commands::Stop { id } => task::run_transition(
                task::TransitionOptions {
                    id,
                    action: TaskAction::Stop,
                },
                &global,
            ),
            Commands::Comment { id, comment } => {
                task::run_comment(task::CommentOptions { id, comment }, &global)
            }
            Commands::Doctor { repair } => {
                task::run_doctor(task::DoctorOptions { repair }, &global)
            }
        }
    }
}
