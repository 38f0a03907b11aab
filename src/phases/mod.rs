//! The phases of a catalyze run.
//!
//! ## Overview
//!
//! A run turns a source repository into a reduced derivative tree:
//! 1. Transform - apply each manifest's path and module entries to the output tree
//! 2. Proxies - write filtered proxy configuration documents
//! 3. Build script - aggregate module and cache metadata into `cmake.sh`
//!
//! Manifests are processed strictly in input order. The `orchestrator` module
//! ties the phases together.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::git;
use crate::patch::Patcher;

pub mod build_script;
pub mod orchestrator;
pub mod proxies;
pub mod transform;

/// Settings shared by every phase of one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Root of the source repository.
    pub repo: PathBuf,
    /// Root of the generated tree.
    pub output: PathBuf,
    /// Program applying patches.
    pub patcher: Patcher,
    /// Directories whose inline patches are rooted at the directory itself.
    pub embedded_modules: Vec<String>,
}

impl RunContext {
    pub fn new(repo: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            output: output.into(),
            patcher: Patcher::default(),
            embedded_modules: crate::defaults::default_embedded_modules(),
        }
    }

    pub fn with_patcher(mut self, patcher: Patcher) -> Self {
        self.patcher = patcher;
        self
    }

    pub fn with_embedded_modules(mut self, modules: Vec<String>) -> Self {
        self.embedded_modules = modules;
        self
    }

    /// Working directory for an inline patch declared on `entry_path`.
    pub fn patch_root(&self, entry_path: &str) -> PathBuf {
        self.embedded_modules
            .iter()
            .find(|module| entry_path.starts_with(&format!("{}/", module)))
            .map(|module| self.output.join(module))
            .unwrap_or_else(|| self.output.clone())
    }
}

/// Resolve the source repository root.
///
/// An explicit, non-blank path wins. Otherwise the work tree containing
/// `fallback_dir` is asked for its top-level directory.
pub fn resolve_repo(explicit: Option<&str>, fallback_dir: &Path) -> Result<PathBuf> {
    match explicit.map(str::trim) {
        Some(repo) if !repo.is_empty() => Ok(PathBuf::from(repo)),
        _ => git::show_toplevel(fallback_dir),
    }
}

/// Directory containing the running executable.
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::io(&exe, std::io::Error::other("executable has no parent")))
}
