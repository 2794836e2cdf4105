#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness running the CLI inside an isolated temporary directory
pub struct CliTestHarness {
    temp_dir: TempDir,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskflow").expect("Failed to find taskflow binary");
        cmd.current_dir(self.temp_dir.path());
        for (key, _) in std::env::vars() {
            if key.starts_with("TASKFLOW_") {
                cmd.env_remove(key);
            }
        }
        cmd.env("NO_COLOR", "1");
        cmd
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file into the working directory and return its path
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Write the standard seed data set and return its path
    pub fn write_seed(&self) -> PathBuf {
        self.write_file("seed.json", TestFixtures::seed_json())
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Run a command and return its stdout
    pub fn stdout(&self, args: &[&str]) -> String {
        let output = self.run_success(args).get_output().stdout.clone();
        String::from_utf8(output).expect("stdout is not UTF-8")
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub fn seed_json() -> &'static str {
        r##"{
            "categories": [
                {"id": "work", "name": "Work", "color": "#3b82f6"},
                {"id": "personal", "name": "Personal", "color": "#10b981"}
            ],
            "tasks": [
                {
                    "id": "0190a5a4-1f2b-7c3d-8e4f-000000000001",
                    "title": "Ship release",
                    "category": "work",
                    "priority": "high",
                    "dueDate": "2099-06-01",
                    "createdAt": "2024-05-01T09:00:00Z"
                },
                {
                    "id": "0190a5a4-1f2b-7c3d-8e4f-000000000002",
                    "title": "Buy milk",
                    "category": "personal",
                    "priority": "low",
                    "completed": true,
                    "dueDate": "2024-05-02",
                    "createdAt": "2024-05-01T10:00:00Z",
                    "completedAt": "2024-05-02T08:00:00Z"
                },
                {
                    "id": "0190a5a4-1f2b-7c3d-8e4f-000000000003",
                    "title": "Write report",
                    "description": "Quarterly numbers",
                    "category": "work",
                    "dueDate": null,
                    "createdAt": "2024-05-01T11:00:00Z"
                }
            ]
        }"##
    }

    /// Weekly Monday/Friday recurrence producing five dates
    pub fn weekly_args() -> Vec<&'static str> {
        vec![
            "--every", "weekly",
            "--on", "mon,fri",
            "--start", "2099-01-05",
            "--until", "2099-01-19",
        ]
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output contains task table headers
    pub fn has_task_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Status"))
    }

    /// Predicate to check if output indicates successful task creation
    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓").and(predicate::str::contains("Created"))
    }

    /// Predicate to check for empty result set
    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No tasks found")
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error")
    }
}
