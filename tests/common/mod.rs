//! Shared test utilities for end-to-end tests.
//!
//! This module provides a fixture that lays out a source repository, input
//! directories with manifests, and an output directory inside one temporary
//! directory.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_repo_file("CMake/a.cmake", "a")
//!         .with_manifest("Base", manifests::MINIMAL);
//!     fixture.command(&["Base"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::{git_available, patch_available};
    pub use super::TestFixture;
}

/// Common manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Copies the `CMake` directory only.
    pub const MINIMAL: &str = r#"{"paths": [{"path": "CMake"}]}"#;

    /// Declares nothing at all.
    pub const EMPTY: &str = "{}";

    /// Invalid JSON for error testing.
    pub const INVALID_JSON: &str = "{ \"paths\": [";
}

/// Whether `git` can be run.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

/// Whether `patch` can be run.
#[allow(dead_code)]
pub fn patch_available() -> bool {
    Command::new("patch").arg("--version").output().is_ok()
}

/// A temporary workspace holding `repo/`, input directories, and `out/`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a fixture with an empty repository directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("repo")
            .create_dir_all()
            .expect("Failed to create repo directory");
        Self { temp_dir }
    }

    /// Add a file to the source repository.
    pub fn with_repo_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("repo")
            .child(path)
            .write_str(content)
            .expect("Failed to write repo file");
        self
    }

    /// Add a `manifest.json` to the input directory `input`.
    pub fn with_manifest(self, input: &str, json: &str) -> Self {
        self.with_input_file(input, "manifest.json", json)
    }

    /// Add a resource file to the input directory `input`.
    pub fn with_input_file(self, input: &str, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(input)
            .child(path)
            .write_str(content)
            .expect("Failed to write input file");
        self
    }

    /// Commit the repository contents and tag the commit.
    #[allow(dead_code)]
    pub fn committed(self, tag: Option<&str>) -> Self {
        let repo = self.repo();
        git(&repo, &["init", "-q"]);
        git(&repo, &["add", "-A"]);
        git(&repo, &["commit", "-q", "--allow-empty", "-m", "initial"]);
        if let Some(tag) = tag {
            git(&repo, &["tag", "-a", tag, "-m", tag]);
        }
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn repo(&self) -> PathBuf {
        self.path().join("repo")
    }

    pub fn output(&self) -> PathBuf {
        self.path().join("out")
    }

    /// Path inside the output directory.
    pub fn out(&self, path: &str) -> PathBuf {
        self.output().join(path)
    }

    /// Read a file from the output directory.
    #[allow(dead_code)]
    pub fn read_out(&self, path: &str) -> String {
        std::fs::read_to_string(self.out(path)).expect("Failed to read output file")
    }

    /// A `catalyze` command with `-r`, each `-i`, and `-o` filled in.
    pub fn command(&self, inputs: &[&str]) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalyze");
        cmd.current_dir(self.path())
            .env_remove("CATALYZE_REPO")
            .env_remove("CATALYZE_PATCH")
            .arg("-r")
            .arg(self.repo());
        for input in inputs {
            cmd.arg("-i").arg(self.path().join(input));
        }
        cmd.arg("-o").arg(self.output());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}
