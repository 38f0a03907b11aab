//! On-disk copy primitives for building the output tree
//!
//! Copies are not transactional: a failure part way through leaves whatever
//! was already written in place.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path::{to_slash, ExclusionSet};

/// What a copy did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Number of files written.
    Copied(usize),
    /// The destination directory already existed and was left untouched.
    SkippedExisting,
    /// The source itself matched an exclusion.
    Excluded,
}

/// Create a directory and its parents; a no-op when it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Copy one file, creating parent directories and overwriting the target.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    ensure_parent(dest)?;
    fs::copy(src, dest).map_err(|e| Error::io(src, e))?;
    debug!("Copied {} -> {}", src.display(), dest.display());
    Ok(())
}

/// Copy a directory tree, pruning every walked entry that matches `exclude`.
///
/// `repo_rel` is the path of `src` relative to the repository root and is used
/// to build the repository-relative spelling of each entry. An existing
/// destination directory is never copied into.
pub fn copy_tree(
    src: &Path,
    dest: &Path,
    repo_rel: &str,
    exclude: &ExclusionSet,
) -> Result<CopyOutcome> {
    if dest.exists() {
        warn!(
            "Skipping copy of {}: {} already exists",
            src.display(),
            dest.display()
        );
        return Ok(CopyOutcome::SkippedExisting);
    }

    let walker = WalkDir::new(src)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
            let rel = to_slash(rel);
            let name = entry.file_name().to_string_lossy();
            let full = if repo_rel.is_empty() {
                rel.clone()
            } else {
                format!("{}/{}", repo_rel.trim_end_matches('/'), rel)
            };
            !exclude.matches(&name, &[rel.as_str(), full.as_str()])
        });

    let mut copied = 0;
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            Error::io(path, source)
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
            copied += 1;
        }
    }

    debug!(
        "Copied {} files from {} to {}",
        copied,
        src.display(),
        dest.display()
    );
    Ok(CopyOutcome::Copied(copied))
}

/// Copy a file or a directory tree from the repository to the output.
pub fn copy_path(
    src: &Path,
    dest: &Path,
    repo_rel: &str,
    exclude: &ExclusionSet,
) -> Result<CopyOutcome> {
    if src.is_dir() {
        return copy_tree(src, dest, repo_rel, exclude);
    }

    let name = src
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if exclude.matches(&name, &[repo_rel]) {
        debug!("Not copying excluded file {}", src.display());
        return Ok(CopyOutcome::Excluded);
    }

    copy_file(src, dest)?;
    Ok(CopyOutcome::Copied(1))
}

/// Remove a directory tree; a missing directory is not an error.
pub fn clear_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(dir, e)),
    }
}

/// Write a file readable, writable, and executable by its owner only.
pub fn write_executable(path: &Path, contents: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, contents).map_err(|e| Error::io(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o700);
        fs::set_permissions(path, perms).map_err(|e| Error::io(path, e))?;
    }

    Ok(())
}
