#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated data dir and config file per test.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn keys_path(&self) -> PathBuf {
        self.data_dir().join("keys.json")
    }

    pub fn last_used_path(&self) -> PathBuf {
        self.data_dir().join("last_used")
    }

    pub fn write_config(&self, config: &Value) {
        std::fs::write(self.config_path(), config.to_string()).expect("write config");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!();
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .arg("--config")
            .arg(self.config_path())
            .env_remove("RUST_LOG")
            .env_remove("KEYSWITCH_HOME")
            .env_remove("KEYSWITCH_CONFIG")
            .env_remove("ANTHROPIC_AUTH_TOKEN")
            .env_remove("ANTHROPIC_BASE_URL");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("failed to run keyswitch");
        assert!(
            output.status.success(),
            "command failed: stdout={}, stderr={}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("invalid JSON output")
    }

    pub fn assert_exit(&self, args: &[&str], code: i32) {
        self.cmd().args(args).assert().failure().code(code);
    }

    /// Stores `prod` (default, no base URL) and `dev` (local base URL).
    pub fn seed(&self) {
        self.run_json(&["add", "prod", "--secret", "sk-prod-xxxx"]);
        self.run_json(&[
            "add",
            "dev",
            "--secret",
            "sk-dev-yyyy",
            "--base-url",
            "http://localhost:8080",
            "--note",
            "local proxy",
        ]);
    }

    /// Writes an executable shell script into the temp dir.
    #[cfg(unix)]
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }
}
