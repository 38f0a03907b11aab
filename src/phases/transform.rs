//! Transform: applying manifest path entries to the output tree
//!
//! Each `PathEntry` is processed in declaration order, `paths` before
//! `modules`:
//!
//! 1.  **Exclusions**: explicit `exclude` patterns, the entry's own path when it
//!     is replaced, and a `*` wildcard when an `include` list is present.
//!
//! 2.  **Includes**: included items are copied first. A `class` item copies the
//!     header and source pair for that class.
//!
//! 3.  **Bulk copy**: the entry's file or directory tree is copied, skipping
//!     anything excluded. A directory that already exists in the output is left
//!     alone, so later manifests can only add files to it.
//!
//! 4.  **Replace**: replacement files are copied from the manifest's own
//!     directory over the output.
//!
//! 5.  **Patch**: the inline patch, then each listed patch file, is applied.
//!
//! 6.  **Class fragment**: when classes were included, a build fragment named
//!     after the input directory lists their sources.

use std::fs;

use glob::Pattern;
use log::debug;

use crate::defaults::{FRAGMENT_SUFFIX, HEADER_SUFFIX, MODULE_SOURCES_VAR, SOURCE_SUFFIX};
use crate::error::{Error, Result};
use crate::filesystem::{copy_file, copy_path, ensure_parent};
use crate::manifest::{IncludeItem, LoadedManifest, PathEntry, PathRef};
use crate::path::ExclusionSet;

use super::RunContext;

/// Apply all path and module entries of one manifest.
pub fn execute(ctx: &RunContext, loaded: &LoadedManifest) -> Result<()> {
    let modules = loaded.manifest.modules.iter().map(|module| &module.entry);
    copy_paths(ctx, loaded, loaded.manifest.paths.iter().chain(modules))
}

/// Apply a sequence of entries declared by `loaded`.
pub fn copy_paths<'a, I>(ctx: &RunContext, loaded: &LoadedManifest, entries: I) -> Result<()>
where
    I: IntoIterator<Item = &'a PathEntry>,
{
    for entry in entries {
        apply_entry(ctx, loaded, entry)?;
    }
    Ok(())
}

/// Apply a single entry.
pub fn apply_entry(ctx: &RunContext, loaded: &LoadedManifest, entry: &PathEntry) -> Result<()> {
    let src = ctx.repo.join(&entry.path);
    let dest = ctx.output.join(&entry.path);
    ensure_parent(&dest)?;

    let mut exclude = ExclusionSet::new();
    for pattern in entry.exclude.iter().flatten() {
        exclude.add(&pattern.path)?;
    }
    if entry.replace.is_some() {
        exclude.add(&Pattern::escape(&entry.path))?;
    }

    let mut classes = Vec::new();
    if let Some(include) = &entry.include {
        exclude.add("*")?;
        classes = include_items(ctx, entry, include)?;
    }

    copy_path(&src, &dest, &entry.path, &exclude)?;

    for replacement in entry.replace.iter().flatten() {
        replace_file(ctx, loaded, replacement)?;
    }

    if let Some(patch) = &entry.patch {
        let root = ctx.patch_root(&entry.path);
        ctx.patcher
            .apply(&root, patch.contents().as_bytes(), &entry.path)?;
    }

    for patch in entry.patches.iter().flatten() {
        let patch_path = loaded.dir.join(&patch.path);
        let diff = fs::read(&patch_path).map_err(|e| Error::io(&patch_path, e))?;
        ctx.patcher.apply(&ctx.output, &diff, &entry.path)?;
    }

    if !classes.is_empty() {
        let fragment = dest.join(format!("{}.{}", loaded.edition_name(), FRAGMENT_SUFFIX));
        debug!("Writing class fragment {}", fragment.display());
        fs::write(&fragment, render_fragment(&classes)).map_err(|e| Error::io(&fragment, e))?;
    }

    Ok(())
}

/// Copy the explicitly included items of an entry and return the class names.
fn include_items(
    ctx: &RunContext,
    entry: &PathEntry,
    items: &[IncludeItem],
) -> Result<Vec<String>> {
    let src_base = ctx.repo.join(&entry.path);
    let dest_base = ctx.output.join(&entry.path);
    let mut classes = Vec::new();

    for item in items {
        match item {
            IncludeItem::Class { class } => {
                for suffix in [HEADER_SUFFIX, SOURCE_SUFFIX] {
                    let file = format!("{}.{}", class, suffix);
                    copy_file(&src_base.join(&file), &dest_base.join(&file))?;
                }
                classes.push(class.clone());
            }
            IncludeItem::Path { path } => {
                let repo_rel = format!("{}/{}", entry.path.trim_end_matches('/'), path);
                copy_path(
                    &src_base.join(path),
                    &dest_base.join(path),
                    &repo_rel,
                    &ExclusionSet::new(),
                )?;
            }
        }
    }

    Ok(classes)
}

/// Copy a replacement file from the manifest directory over the output.
fn replace_file(ctx: &RunContext, loaded: &LoadedManifest, replacement: &PathRef) -> Result<()> {
    let replace_with = loaded.dir.join(&replacement.path);
    if replace_with.is_dir() {
        return Err(Error::ReplaceSource {
            path: replace_with,
            message: "is a directory, only support replacing a file".to_string(),
        });
    }
    if !replace_with.exists() {
        return Err(Error::ReplaceSource {
            path: replace_with,
            message: "doesn't exist".to_string(),
        });
    }

    let output = ctx.output.join(&replacement.path);
    debug!("Replacing {} with {}", output.display(), replace_with.display());
    copy_file(&replace_with, &output)
}

/// Build fragment appending the class sources to the module source list.
pub fn render_fragment(classes: &[String]) -> String {
    let mut fragment = format!("list(APPEND {}\n", MODULE_SOURCES_VAR);
    for class in classes {
        fragment.push_str(&format!("  {}.{}\n", class, SOURCE_SUFFIX));
    }
    fragment.push_str("  )");
    fragment
}
