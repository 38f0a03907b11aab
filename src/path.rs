//! Path utilities: manifest path validation and exclusion matching

use std::path::{Component, Path};

use glob::{MatchOptions, Pattern};

use crate::error::Result;

/// Check that a manifest path is non-empty, relative, and stays inside its root.
pub fn validate_relative(path: &str) -> std::result::Result<(), String> {
    if path.trim().is_empty() {
        return Err("path is empty".to_string());
    }
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(format!("path '{}' must not contain '..'", path));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("path '{}' must be relative", path));
            }
        }
    }
    Ok(())
}

/// A compiled set of exclusion patterns for one copy.
///
/// A walked entry is excluded when any pattern matches its file name, its
/// path relative to the copy root, or its path relative to the repository.
/// Wildcards in a pattern never cross a `/` when matched against a path.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    patterns: Vec<Pattern>,
}

impl ExclusionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and add a pattern.
    pub fn add(&mut self, pattern: &str) -> Result<()> {
        self.patterns.push(Pattern::new(pattern)?);
        Ok(())
    }

    /// Build a set from a list of patterns.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pattern in patterns {
            set.add(pattern.as_ref())?;
        }
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether an entry is excluded, given its file name and other
    /// slash-separated spellings of its path.
    pub fn matches(&self, name: &str, paths: &[&str]) -> bool {
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        self.patterns.iter().any(|pattern| {
            (!name.is_empty() && pattern.matches(name))
                || paths
                    .iter()
                    .filter(|path| !path.is_empty())
                    .any(|path| pattern.matches_with(path, options))
        })
    }
}

/// Render a relative path with forward slashes for pattern matching.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
