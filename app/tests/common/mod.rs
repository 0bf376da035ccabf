//! Test helper module for E2E tests
//!
//! Provides `TestFixture` for easy test setup with file operations and
//! running the `tt` CLI against a temp tree.

#![allow(dead_code)] // Test helpers may not be used in all test modules
#![allow(deprecated)] // cargo_bin() deprecation - the new API requires more investigation

use std::path::PathBuf;
use std::process::Output;

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;

/// Test fixture providing a temporary directory with helper methods
/// for file operations and running the `tt` CLI.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    /// Create a new test environment with a fresh temp directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Get the root path of the test directory
    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Add a source file with content (creates parent dirs automatically)
    pub fn add_file(&self, path: &str, content: &str) -> &Self {
        let file = self.dir.child(path);
        file.write_str(content).unwrap();
        self
    }

    /// Add a binary file with raw bytes
    pub fn add_binary(&self, path: &str, bytes: &[u8]) -> &Self {
        let file = self.dir.child(path);
        file.write_binary(bytes).unwrap();
        self
    }

    /// Delete a file from the test directory
    pub fn remove_file(&self, path: &str) -> &Self {
        std::fs::remove_file(self.root().join(path)).unwrap();
        self
    }

    /// Build a `tt` command rooted at the fixture directory
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tt").unwrap();
        cmd.current_dir(self.root());
        cmd
    }

    /// Run `tt scan --root <fixture root>` and return the raw output
    pub fn scan(&self) -> Output {
        self.cmd()
            .arg("scan")
            .arg("--root")
            .arg(self.root())
            .output()
            .unwrap()
    }

    /// Run `tt scan --root <fixture root> --json` and return parsed JSON
    pub fn scan_json(&self) -> serde_json::Value {
        let output = self
            .cmd()
            .arg("scan")
            .arg("--root")
            .arg(self.root())
            .arg("--json")
            .output()
            .unwrap();
        serde_json::from_slice(&output.stdout).unwrap()
    }
}
