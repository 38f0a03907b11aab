//! # Manifest Schema and Loading
//!
//! This module defines the data structures that represent a `manifest.json`
//! document and the logic for loading one from each input directory.
//!
//! ## Key Components
//!
//! - **`Manifest`**: The parsed document: path entries, module entries, proxy
//!   filter requests, and build cache entries.
//!
//! - **`PathEntry`**: One unit of tree transformation. A relative path plus
//!   optional exclude, include, replace, and patch declarations.
//!
//! - **`LoadedManifest`**: A manifest paired with the directory it was loaded
//!   from. Replacement and patch files are resolved against that directory.
//!
//! ## Validation
//!
//! Every manifest is validated once, right after parsing. Paths must be
//! relative and must not climb out of their root, and a module that asks to
//! be wrapped must carry a name. Violations are reported as
//! `Error::MalformedManifest` before any file is touched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::MANIFEST_FILE;
use crate::error::{Error, Result};
use crate::path::validate_relative;

/// A reference to a single file or pattern by relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRef {
    pub path: String,
}

/// One item of an `include` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncludeItem {
    /// A class name standing for a header and source file pair.
    Class { class: String },
    /// A literal path relative to the entry.
    Path { path: String },
}

/// An inline unified diff, either as one string or as a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InlinePatch {
    Text(String),
    Lines(Vec<String>),
}

impl InlinePatch {
    /// The diff text handed to the patch program.
    pub fn contents(&self) -> String {
        match self {
            InlinePatch::Text(text) if text.ends_with('\n') => text.clone(),
            InlinePatch::Text(text) => format!("{}\n", text),
            InlinePatch::Lines(lines) => format!("{}\n", lines.join("\n")),
        }
    }
}

/// A file or directory transformation declared by a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Path relative to the repository root (and the output root).
    pub path: String,
    /// Glob patterns pruned from the copy.
    #[serde(default)]
    pub exclude: Option<Vec<PathRef>>,
    /// When present, only these items are copied.
    #[serde(default)]
    pub include: Option<Vec<IncludeItem>>,
    /// Files copied from the manifest directory over the output.
    #[serde(default)]
    pub replace: Option<Vec<PathRef>>,
    /// Inline diff applied after copying.
    #[serde(default)]
    pub patch: Option<InlinePatch>,
    /// Diff files, relative to the manifest directory, applied in order.
    #[serde(default)]
    pub patches: Option<Vec<PathRef>>,
}

/// A boolean-like manifest flag.
///
/// Manifests written by hand use `true`, `1`, or `"yes"` interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Flag {
    /// Whether the flag counts as set.
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(value) => *value,
            Flag::Number(value) => *value != 0.0,
            Flag::Text(value) => {
                let value = value.trim().to_ascii_lowercase();
                !matches!(value.as_str(), "" | "0" | "false" | "no" | "off")
            }
        }
    }
}

fn flag_set(flag: &Option<Flag>) -> bool {
    flag.as_ref().is_some_and(Flag::is_set)
}

/// A module: a path entry that can also request language wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    #[serde(flatten)]
    pub entry: PathEntry,
    /// Module name used in the generated build flags.
    #[serde(default)]
    pub name: Option<String>,
    /// Request client/server wrapping.
    #[serde(default)]
    pub cswrap: Option<Flag>,
    /// Request Python wrapping.
    #[serde(default)]
    pub pythonwrap: Option<Flag>,
}

impl ModuleEntry {
    /// Whether the module asks for client/server wrapping.
    pub fn wants_cs_wrap(&self) -> bool {
        flag_set(&self.cswrap)
    }

    /// Whether the module asks for Python wrapping.
    pub fn wants_python_wrap(&self) -> bool {
        flag_set(&self.pythonwrap)
    }
}

/// A request to reduce a proxy configuration document to the named proxies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyFilterSpec {
    /// Document path relative to the repository root.
    pub path: String,
    /// Proxy names to keep.
    pub proxies: Vec<String>,
}

/// A build cache value. Strings are emitted verbatim, other scalars as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheValue {
    Text(String),
    Other(serde_json::Value),
}

impl std::fmt::Display for CacheValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheValue::Text(text) => f.write_str(text),
            CacheValue::Other(value) => write!(f, "{}", value),
        }
    }
}

/// A typed build cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: CacheValue,
}

impl CacheEntry {
    /// Key under which later manifests override earlier ones.
    pub fn key(&self) -> String {
        format!("{}:{}", self.name, self.kind)
    }
}

/// The `cmake` section of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSection {
    #[serde(default)]
    pub cache: Vec<CacheEntry>,
}

/// A complete manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub paths: Vec<PathEntry>,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
    #[serde(default)]
    pub proxies: Vec<ProxyFilterSpec>,
    #[serde(default)]
    pub cmake: Option<BuildSection>,
}

impl Manifest {
    /// Cache entries declared by this manifest, in declaration order.
    pub fn cache_entries(&self) -> &[CacheEntry] {
        self.cmake
            .as_ref()
            .map(|section| section.cache.as_slice())
            .unwrap_or_default()
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (index, entry) in self.paths.iter().enumerate() {
            validate_entry(entry).map_err(|e| format!("paths[{}]: {}", index, e))?;
        }
        for (index, module) in self.modules.iter().enumerate() {
            validate_entry(&module.entry).map_err(|e| format!("modules[{}]: {}", index, e))?;
            let wrapped = module.wants_cs_wrap() || module.wants_python_wrap();
            if wrapped && module.name.as_deref().is_none_or(str::is_empty) {
                return Err(format!("modules[{}]: wrapped module has no name", index));
            }
        }
        for (index, spec) in self.proxies.iter().enumerate() {
            validate_relative(&spec.path).map_err(|e| format!("proxies[{}]: {}", index, e))?;
        }
        Ok(())
    }
}

fn validate_entry(entry: &PathEntry) -> std::result::Result<(), String> {
    validate_relative(&entry.path)?;
    for item in entry.include.iter().flatten() {
        match item {
            IncludeItem::Class { class } => validate_relative(class)?,
            IncludeItem::Path { path } => validate_relative(path)?,
        }
    }
    for file in entry.replace.iter().flatten() {
        validate_relative(&file.path)?;
    }
    for file in entry.patches.iter().flatten() {
        validate_relative(&file.path)?;
    }
    Ok(())
}

/// Parses a manifest document from a JSON string.
pub fn parse(json: &str) -> serde_json::Result<Manifest> {
    serde_json::from_str(json)
}

/// A manifest together with the input directory it came from.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    /// Base for replacement and patch files.
    pub dir: PathBuf,
    pub manifest: Manifest,
}

impl LoadedManifest {
    /// Base name of the input directory, used to name generated fragments.
    pub fn edition_name(&self) -> String {
        let dir = fs::canonicalize(&self.dir).unwrap_or_else(|_| self.dir.clone());
        dir.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Load and validate the manifest of one input directory.
pub fn load(dir: &Path) -> Result<LoadedManifest> {
    let path = dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path).map_err(|e| Error::ManifestRead {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let manifest = parse(&content).map_err(|e| Error::ManifestRead {
        path: path.clone(),
        message: e.to_string(),
    })?;
    manifest
        .validate()
        .map_err(|message| Error::MalformedManifest {
            path: path.clone(),
            message,
        })?;

    Ok(LoadedManifest {
        dir: dir.to_path_buf(),
        manifest,
    })
}

/// Load the manifests of all input directories, preserving their order.
pub fn load_all<P: AsRef<Path>>(dirs: &[P]) -> Result<Vec<LoadedManifest>> {
    dirs.iter().map(|dir| load(dir.as_ref())).collect()
}
