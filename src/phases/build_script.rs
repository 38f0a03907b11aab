//! Build script: generating `cmake.sh` from the metadata of all manifests
//!
//! Wrapped module names and cache entries are gathered in manifest order.
//! Names keep the position where they were first seen; a cache entry declared
//! again under the same `name:type` key keeps its position but takes the later
//! value. The version stamp comes from `git describe` in the source repository.

use std::collections::HashMap;
use std::path::PathBuf;

use log::info;

use crate::defaults::{
    BUILD_SCRIPT_FILE, BUILD_TOOL, CS_MODULES_FLAG, PYTHON_MODULES_FLAG, VERSION_FLAG,
};
use crate::error::Result;
use crate::filesystem::write_executable;
use crate::git;
use crate::manifest::{LoadedManifest, Manifest};

use super::RunContext;

/// Aggregated build metadata of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildMetadata {
    cs_modules: Vec<String>,
    python_modules: Vec<String>,
    cache: Vec<(String, String)>,
    cache_index: HashMap<String, usize>,
}

impl BuildMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one manifest's modules and cache entries.
    pub fn add_manifest(&mut self, manifest: &Manifest) {
        for module in &manifest.modules {
            let Some(name) = module.name.as_deref() else {
                continue;
            };
            if module.wants_cs_wrap() {
                push_unique(&mut self.cs_modules, name);
            }
            if module.wants_python_wrap() {
                push_unique(&mut self.python_modules, name);
            }
        }
        for entry in manifest.cache_entries() {
            self.set_cache(entry.key(), entry.value.to_string());
        }
    }

    /// Collect metadata from manifests in processing order.
    pub fn collect<'a, I>(manifests: I) -> Self
    where
        I: IntoIterator<Item = &'a Manifest>,
    {
        let mut metadata = Self::new();
        for manifest in manifests {
            metadata.add_manifest(manifest);
        }
        metadata
    }

    /// Set a cache entry; an existing key keeps its position.
    pub fn set_cache(&mut self, key: String, value: String) {
        match self.cache_index.get(&key) {
            Some(&index) => self.cache[index].1 = value,
            None => {
                self.cache_index.insert(key.clone(), self.cache.len());
                self.cache.push((key, value));
            }
        }
    }

    pub fn cache_value(&self, key: &str) -> Option<&str> {
        self.cache_index
            .get(key)
            .map(|&index| self.cache[index].1.as_str())
    }

    pub fn cache(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cache
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn cs_modules(&self) -> &[String] {
        &self.cs_modules
    }

    pub fn python_modules(&self) -> &[String] {
        &self.python_modules
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
    }
}

/// Render the script text.
pub fn render(metadata: &BuildMetadata, version: &str) -> String {
    let mut script = String::from("#!/bin/bash\n");
    script.push_str(&format!("{} \\\n", BUILD_TOOL));
    script.push_str(&format!(
        "  -D{}=\"{}\" \\\n",
        CS_MODULES_FLAG,
        metadata.cs_modules.join(";")
    ));
    script.push_str(&format!(
        "  -D{}=\"{}\" \\\n",
        PYTHON_MODULES_FLAG,
        metadata.python_modules.join(";")
    ));
    for (key, value) in metadata.cache() {
        script.push_str(&format!("  -D{}={} \\\n", key, value));
    }
    script.push_str(&format!("  -D{}=\"{}\" \\\n", VERSION_FLAG, version.trim()));
    script.push_str(" $@\n");
    script
}

/// Write the build script for `manifests` into the output directory.
pub fn generate(ctx: &RunContext, manifests: &[LoadedManifest]) -> Result<PathBuf> {
    let metadata = BuildMetadata::collect(manifests.iter().map(|loaded| &loaded.manifest));
    let version = git::describe(&ctx.repo)?;
    let path = ctx.output.join(BUILD_SCRIPT_FILE);
    write_executable(&path, &render(&metadata, &version))?;
    info!("Wrote {}", path.display());
    Ok(path)
}
