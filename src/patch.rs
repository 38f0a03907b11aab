//! Applying unified diffs with an external patch program
//!
//! The diff is streamed to the child's standard input, which is closed before
//! waiting so that large patches cannot deadlock.

use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// Runs a patch program (`<program> -p1`) in a working directory.
#[derive(Debug, Clone)]
pub struct Patcher {
    program: String,
}

impl Patcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Apply `diff` with `work_dir` as the patch root.
    ///
    /// `label` names the manifest path the patch belongs to and appears in
    /// the error on failure.
    pub fn apply(&self, work_dir: &Path, diff: &[u8], label: &str) -> Result<()> {
        debug!(
            "Applying patch for {} in {} ({} bytes)",
            label,
            work_dir.display(),
            diff.len()
        );

        let mut child = Command::new(&self.program)
            .arg("-p1")
            .current_dir(work_dir)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Patch {
                path: label.to_string(),
                message: format!("failed to run {}: {}", self.program, e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(diff) {
                Ok(()) => {}
                // The exit status reports why the child stopped reading.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                Err(e) => {
                    drop(stdin);
                    reap(&mut child);
                    return Err(Error::Patch {
                        path: label.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let status = child.wait().map_err(|e| Error::Patch {
            path: label.to_string(),
            message: e.to_string(),
        })?;
        if !status.success() {
            return Err(Error::Patch {
                path: label.to_string(),
                message: status.to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Patcher {
    fn default() -> Self {
        Self::new(crate::defaults::PATCH_PROGRAM)
    }
}

/// Stop a child that may still be waiting for input and collect its status.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
