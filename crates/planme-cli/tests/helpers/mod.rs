use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness running `planme` inside a temporary working directory, so
/// that rule files and `planme.toml` stay isolated per test
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
        let mut cmd = Command::cargo_bin("planme").expect("Failed to find planme binary");
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("RUST_LOG");
        for key in ["HORIZON_DAYS", "PREVIEW_COUNT", "MAX_TO_GENERATE", "OUTPUT"] {
            cmd.env_remove(format!("PLANME_{key}"));
        }
        cmd
    }

    /// Write a rule JSON file and return its path
    pub fn write_rule(&self, name: &str, json: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, json).expect("Failed to write rule file");
        path
    }

    /// Write `planme.toml` into the working directory
    pub fn write_config(&self, toml: &str) {
        std::fs::write(self.temp_dir.path().join("planme.toml"), toml)
            .expect("Failed to write config file");
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Run a command expected to print a JSON array of instants
    pub fn run_json(&self, args: &[&str]) -> Vec<String> {
        let output = self.run_success(args).get_output().stdout.clone();
        serde_json::from_slice(&output).expect("stdout is not a JSON array of strings")
    }
}

/// Common rule fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Monday, Wednesday and Friday at 09:00 from Monday 2025-01-06
    pub fn weekly_rule_json() -> &'static str {
        r#"{
            "frequency": "WEEKLY_DAYS",
            "endType": "NEVER",
            "startDateTime": "2025-01-06T09:00:00Z",
            "weekdaysBitmask": 21
        }"#
    }

    /// ON_DATE rule without an end date
    pub fn invalid_rule_json() -> &'static str {
        r#"{
            "frequency": "DAILY_INTERVAL",
            "endType": "ON_DATE",
            "startDateTime": "2025-01-01T10:00:00Z"
        }"#
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    pub fn has_occurrence_table_headers() -> impl Predicate<str> {
        predicate::str::contains("Date (UTC)").and(predicate::str::contains("Weekday"))
    }

    pub fn no_occurrences() -> impl Predicate<str> {
        predicate::str::contains("No upcoming occurrence")
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
