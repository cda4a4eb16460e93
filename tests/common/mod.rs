#![allow(dead_code)]

pub mod fake_directory;
pub mod http_stub;
pub mod mock_data;

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Runs the roster binary with config and session storage in a temp directory
pub struct RosterTest {
    pub temp_dir: TempDir,
}

impl RosterTest {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp_dir.path().join("config")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join("data")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_roster"))
            .args(args)
            .env("ROSTER_CONFIG_DIR", self.config_dir())
            .env("ROSTER_DATA_DIR", self.data_dir())
            .env_remove("ROSTER_BASE_URL")
            .env_remove("ROSTER_LOG")
            .current_dir(self.temp_dir.path())
            .output()
            .expect("Failed to execute roster command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Store a session token the way `roster login` would
    pub fn write_session(&self, token: &str) {
        std::fs::create_dir_all(self.data_dir()).expect("Failed to create data directory");
        let body = serde_json::json!({ "token": token }).to_string();
        std::fs::write(self.data_dir().join("storage.json"), body)
            .expect("Failed to write session storage");
    }
}
