//! Shared fixture for end-to-end binary runs.
//!
//! Every scenario gets an isolated temp root. Config resolution is pinned
//! to `config.toml` inside that root: absent, runs start from built-in
//! defaults; a scenario that wants file-backed settings writes it first.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct E2EFixture {
    root: TempDir,
}

impl E2EFixture {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create fixture root"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dir");
        }
        std::fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// A binary invocation with config lookups pinned inside the root.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("lfmatch").expect("binary builds");
        cmd.env("LFMATCH_ROOT", self.root.path())
            .env("LFMATCH_CONFIG", self.root.path().join("config.toml"));
        cmd
    }

    pub fn robot_json(output: &std::process::Output) -> Value {
        serde_json::from_slice(&output.stdout).expect("robot output is JSON")
    }
}
