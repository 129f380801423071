#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Instant every command runs at unless a test pins another one.
pub const JUNE_2024: &str = "2024-06-01T09:00:00Z";

/// Throwaway storage root for CLI tests.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn task_dir(&self) -> PathBuf {
        self.dir.path().join("task")
    }

    pub fn month_dir(&self) -> PathBuf {
        self.dir.path().join("month")
    }

    /// `tau` pointed at this store, clock pinned to `now`, editor stubbed out.
    pub fn tau_at(&self, now: &str) -> Command {
        let mut cmd = Command::cargo_bin("tau").expect("tau binary");
        cmd.env("TAU_CONFIG_PATH", self.path())
            .env("TAU_NOW", now)
            .env("EDITOR", "true")
            .env_remove("VISUAL")
            .env_remove("TAU_AUTHOR")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn tau(&self) -> Command {
        self.tau_at(JUNE_2024)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.path().join("tau.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Reference ids of stored tasks, ignoring temp files.
    pub fn task_refs(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.task_dir()) else {
            return Vec::new();
        };
        let mut refs: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.contains('.'))
            .collect();
        refs.sort();
        refs
    }

    pub fn read_task(&self, reference_id: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(self.task_dir().join(reference_id))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn read_month(&self, key: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(self.month_dir().join(key))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Run `tau add --json` and return the created record.
    pub fn add(&self, args: &[&str]) -> Value {
        let output = self
            .tau()
            .arg("add")
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("add json");
        value["data"].clone()
    }

    /// Run a command with `--json` and return the `data` payload.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .tau()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("json output");
        value["data"].clone()
    }
}
