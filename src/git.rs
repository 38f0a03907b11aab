//! Version control queries against the source repository
//!
//! These use the system `git` command.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Run `git <args>` in `dir` and return its trimmed standard output.
fn git_output(dir: &Path, args: &[&str]) -> Result<String> {
    let command = format!("git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::Command {
            command: command.clone(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.trim().is_empty() {
            output.status.to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(Error::Command { command, message });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Top-level directory of the work tree containing `dir`.
pub fn show_toplevel(dir: &Path) -> Result<PathBuf> {
    git_output(dir, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
}

/// `git describe` of the repository, used as the build's version stamp.
pub fn describe(repo: &Path) -> Result<String> {
    git_output(repo, &["describe"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {:?} failed", args);
    }

    fn tagged_repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        git(temp.path(), &["init", "-q"]);
        fs::write(temp.path().join("README"), "readme").unwrap();
        git(temp.path(), &["add", "README"]);
        git(temp.path(), &["commit", "-q", "-m", "initial"]);
        git(temp.path(), &["tag", "-a", "v1.2.3", "-m", "release"]);
        temp
    }

    #[test]
    fn test_describe_tagged_repo() {
        if !git_available() {
            return;
        }
        let repo = tagged_repo();
        assert_eq!(describe(repo.path()).unwrap(), "v1.2.3");
    }

    #[test]
    fn test_show_toplevel_from_subdirectory() {
        if !git_available() {
            return;
        }
        let repo = tagged_repo();
        let sub = repo.path().join("a/b");
        fs::create_dir_all(&sub).unwrap();

        let top = show_toplevel(&sub).unwrap();
        assert_eq!(
            fs::canonicalize(top).unwrap(),
            fs::canonicalize(repo.path()).unwrap()
        );
    }

    #[test]
    fn test_describe_outside_repository_fails() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let err = describe(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Command { .. }));
        assert!(err.to_string().contains("git describe"));
    }

    #[test]
    fn test_missing_directory_fails() {
        let err = show_toplevel(Path::new("/nonexistent/catalyze/dir")).unwrap_err();
        assert!(err.to_string().contains("git rev-parse --show-toplevel"));
    }
}
