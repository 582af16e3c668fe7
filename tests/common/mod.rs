//! Common test utilities for warden integration tests.
//!
//! Each `TestEnv` points `WARDEN_DATA_DIR` at its own temporary directory so
//! tests never touch the user's configuration and can run in parallel.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the warden binary with isolated data directory.
    pub fn warden(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_warden"));
        cmd.env("WARDEN_DATA_DIR", self.data_dir.path());
        cmd.env("RUST_LOG", "warn");
        cmd
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.path().join("backups")
    }

    /// Register installed applications directly in the on-disk registry.
    pub fn install_apps(&self, package_ids: &[&str]) {
        let applications: Vec<_> = package_ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "package_id": id,
                    "name": id,
                    "internet_access": true,
                    "cellular_access": true,
                })
            })
            .collect();

        let dir = self.data_dir.path().join("data");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("applications.json"),
            serde_json::to_string_pretty(&serde_json::json!({ "applications": applications }))
                .unwrap(),
        )
        .unwrap();
    }

    pub fn read_data_file(&self, name: &str) -> serde_json::Value {
        let contents = fs::read_to_string(self.data_dir.path().join("data").join(name)).unwrap();
        serde_json::from_str(&contents).unwrap()
    }

    /// Write a file into the environment and return its path.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.data_dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
