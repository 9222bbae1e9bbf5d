//! Shared helpers for integration tests.
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A scratch project with a `sasbconfig.json` at its root.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Creates a project with a minimal configuration: one macro folder and
    /// one Viya target.
    pub fn new() -> Self {
        let project = Self { dir: TempDir::new().expect("create temp dir") };
        project.write_config(
            r#"{
                "macroFolders": ["macros"],
                "targets": [
                    {
                        "name": "viya",
                        "serverUrl": "https://viya.example.com",
                        "serverType": "SASVIYA",
                        "appLoc": "/Public/app"
                    }
                ]
            }"#,
        );
        project
    }

    /// Creates an empty directory with no configuration at all.
    pub fn bare() -> Self {
        Self { dir: TempDir::new().expect("create temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_config(&self, json: &str) {
        fs::write(self.path().join("sasbconfig.json"), json).expect("write config");
    }

    /// Writes a file, creating parent directories as needed.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("create parents");
        fs::write(path, content).expect("write file");
    }

    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).expect("read file")
    }

    /// A `sasb` command rooted in this project.
    pub fn sasb(&self) -> Command {
        let mut cmd = Command::cargo_bin("sasb").expect("sasb binary");
        cmd.current_dir(self.path()).env("SASB_NO_PROGRESS", "true");
        cmd
    }
}
