//! Free-text capture through an external editor.
//!
//! The buffer is seeded with a short template of `#` lines; after the editor
//! exits, comment lines and blank lines are dropped.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

pub const DESCRIPTION_TEMPLATE: &str =
    "\n# Write task description above this line\n# These lines will be removed\n";

pub const COMMENT_TEMPLATE: &str =
    "\n# Write comment above this line\n# These lines will be removed\n";

/// Open `template` in the editor and return the cleaned-up text.
///
/// `preferred` (from `settings.editor`) is tried before `$VISUAL`, `$EDITOR`
/// and `vi`.
pub fn read_from_editor(preferred: Option<&str>, template: &str) -> Result<String> {
    let mut buffer = NamedTempFile::new()?;
    buffer.write_all(template.as_bytes())?;
    buffer.flush()?;

    let status = launch_editor(preferred, buffer.path()).map_err(Error::Editor)?;
    if !status.success() {
        return Err(Error::Editor(format!("editor exited with {status}")));
    }

    let edited = std::fs::read_to_string(buffer.path())?;
    Ok(strip_comment_lines(&edited))
}

/// Drop blank lines and lines starting with `#`.
pub fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn launch_editor(preferred: Option<&str>, path: &Path) -> std::result::Result<ExitStatus, String> {
    let mut attempted: Vec<String> = Vec::new();
    for candidate in editor_candidates(preferred) {
        let parts = split_editor_command(&candidate);
        let Some((program, args)) = parts.split_first() else {
            continue;
        };
        attempted.push(program.clone());
        tracing::debug!(editor = %program, path = %path.display(), "launching editor");
        match Command::new(program).args(args).arg(path).status() {
            Ok(status) => return Ok(status),
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(format!("failed to launch editor '{program}': {err}")),
        }
    }
    let tried = if attempted.is_empty() {
        "no editor candidates".to_string()
    } else {
        attempted.join(", ")
    };
    Err(format!("no editor found (tried {tried}); set $VISUAL or $EDITOR"))
}

fn editor_candidates(preferred: Option<&str>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(value) = preferred.filter(|value| !value.trim().is_empty()) {
        out.push(value.to_string());
    }
    for var in ["VISUAL", "EDITOR"] {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                out.push(value);
            }
        }
    }
    out.push("vi".to_string());
    out
}

fn split_editor_command(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
