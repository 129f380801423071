//! Comment author resolution.
//!
//! Resolution order:
//! 1) CLI --author (explicit)
//! 2) TAU_AUTHOR environment variable
//! 3) Config default (settings.author)
//! 4) "unknown"

use crate::config::Config;

pub const AUTHOR_ENV: &str = "TAU_AUTHOR";

const FALLBACK_AUTHOR: &str = "unknown";

/// Resolve the current author using CLI, environment and config.
pub fn resolve_author(cli_author: Option<&str>, config: &Config) -> String {
    let env_author = std::env::var(AUTHOR_ENV).ok();
    resolve_author_from(cli_author, env_author.as_deref(), config)
}

fn resolve_author_from(cli_author: Option<&str>, env_author: Option<&str>, config: &Config) -> String {
    non_empty(cli_author)
        .or_else(|| non_empty(env_author))
        .or_else(|| non_empty(config.settings.author.as_deref()))
        .unwrap_or(FALLBACK_AUTHOR)
        .to_string()
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|value| !value.is_empty())
}
