//! Common test utilities for alloc-book integration tests.
//!
//! Provides `TestEnv`, a scratch directory that the binary runs in, so
//! allocation files never land in the developer's working tree.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with an isolated working directory.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Create a new, empty test environment.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment holding `book.json` with the given figures
    /// and every lecture unpinned.
    pub fn with_book(total_pages: i64, lectures: usize, prefaces: i64) -> Self {
        let env = Self::new();
        let page_list = vec![serde_json::Value::Null; lectures];
        env.write_book(&serde_json::json!({
            "prefaces": prefaces,
            "total_pages": total_pages,
            "page_list": page_list,
        }));
        env
    }

    /// Write raw JSON to `book.json`.
    pub fn write_book(&self, value: &serde_json::Value) {
        std::fs::write(self.book_path(), serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    /// Parse `book.json` as it is on disk.
    pub fn read_book(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.book_path()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    /// Get a Command for the alloc-book binary running inside the environment.
    pub fn alloc_book(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_alloc-book"));
        cmd.current_dir(self.dir.path());
        cmd.env_remove("ALLOC_BOOK_FILE");
        cmd.env_remove("ALLOC_BOOK_LOG");
        cmd
    }

    /// Run the binary on `book.json`, feeding `script` on stdin.
    pub fn session(&self, script: &str) -> assert_cmd::assert::Assert {
        self.alloc_book()
            .arg("book.json")
            .write_stdin(script)
            .assert()
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn book_path(&self) -> PathBuf {
        self.dir.path().join("book.json")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
