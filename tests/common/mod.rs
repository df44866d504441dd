//! Common helpers for the soltpl integration tests
//!
//! Each test gets its own project directory in a temporary location, with
//! `HOME` pointed inside it so no user configuration leaks into the run.

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use serde_json::Value;
use solution_templates::test_utils::JsonFixture;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated working directory for running `soltpl`.
pub struct TestProject {
    _temp_dir: TempDir,
    project_dir: PathBuf,
    home_dir: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let home_dir = temp_dir.path().join("home");
        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&home_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            home_dir,
        })
    }

    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    pub fn home_path(&self) -> &Path {
        &self.home_dir
    }

    /// Write a fixture into the project directory and return its file name.
    pub fn write_fixture(&self, fixture: &JsonFixture) -> Result<String> {
        let path = fixture.write_to(&self.project_dir)?;
        file_name(&path)
    }

    /// Write `value` to `name` in the project directory.
    pub fn write_json(&self, name: &str, value: &Value) -> Result<String> {
        let path = self.project_dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(value)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(name.to_string())
    }

    /// Write a raw file (configuration, malformed input) to the project.
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// A `soltpl` command running in the project directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("soltpl").expect("soltpl binary is built");
        cmd.current_dir(&self.project_dir)
            .env("HOME", &self.home_dir)
            .env("NO_COLOR", "1")
            .env_remove("SOLTPL_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `soltpl` with `args` and capture its output.
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.command().args(args).output().context("Failed to run soltpl")?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Captured output of one run.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.stdout)
            .with_context(|| format!("stdout is not JSON:\n{}\nstderr:\n{}", self.stdout, self.stderr))
    }

    pub fn assert_success(&self) -> &Self {
        assert!(self.success, "command failed ({:?})\nstdout:\n{}\nstderr:\n{}", self.code, self.stdout, self.stderr);
        self
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .context("fixture path has no file name")
}
