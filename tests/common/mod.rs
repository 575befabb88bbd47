//! Common test utilities for readon integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's real `readon` data directory.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// The `readon()` method returns a `Command` that sets `READON_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an empty data directory.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the readon binary with isolated data directory.
    pub fn readon(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_readon"));
        cmd.env("READON_DATA_DIR", self.data_dir.path());
        cmd.env_remove("READON_LOG");
        cmd
    }

    /// Run a command that must succeed and parse its stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.readon().args(args).assert().success().get_output().stdout.clone();
        serde_json::from_slice(&output).unwrap()
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Path of the synced storage file.
    pub fn storage_file(&self) -> std::path::PathBuf {
        self.data_dir.path().join("sync-storage.json")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
