//! # Error Handling
//!
//! This module defines the centralized error type for `catalyze`. It uses the
//! `thiserror` library to describe every way a transformation run can fail.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. Variants carry the path or
//!   command involved so that the single-line message printed by the binary
//!   is enough to locate the problem.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Failures fall into three groups:
//!
//! - I/O errors: missing files and directories, permission failures.
//! - Format errors: unreadable or malformed manifests, proxy configuration
//!   documents with an unexpected root element.
//! - External process failures: `git` or `patch` exiting non-zero.
//!
//! None of them are recoverable. A run stops at the first error and leaves
//! whatever was already written in the output tree.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for catalyze operations
#[derive(Error, Debug)]
pub enum Error {
    /// A manifest could not be read or is not valid JSON.
    #[error("Failed to read manifest {}: {message}", path.display())]
    ManifestRead { path: PathBuf, message: String },

    /// A manifest parsed but violates the schema.
    #[error("Malformed manifest {}: {message}", path.display())]
    MalformedManifest { path: PathBuf, message: String },

    /// A replacement file is missing or is not a regular file.
    #[error("Invalid replacement {}: {message}", path.display())]
    ReplaceSource { path: PathBuf, message: String },

    /// A proxy configuration document could not be filtered.
    #[error("Proxy configuration error in {}: {message}", path.display())]
    ProxyConfig { path: PathBuf, message: String },

    /// An external command could not be run or reported failure.
    #[error("Command failed: {command} - {message}")]
    Command { command: String, message: String },

    /// Applying a patch failed.
    #[error("Failed to apply patch for: {path}: {message}")]
    Patch { path: String, message: String },

    /// An I/O error tied to a specific path.
    #[error("{}: {source}", path.display())]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::PathIo {
            path: path.into(),
            source,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
