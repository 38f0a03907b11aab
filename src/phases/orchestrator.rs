//! Orchestrator for a complete catalyze run
//!
//! This module coordinates all phases to provide a clean API for the complete
//! transformation.

use std::path::{Path, PathBuf};

use log::info;

use super::{build_script, proxies, transform, RunContext};
use crate::error::Result;
use crate::filesystem::clear_dir;
use crate::manifest::{self, LoadedManifest};

/// Execute a complete run over `input_dirs`, in order.
///
/// 1. Clear the output directory
/// 2. Load and validate every manifest
/// 3. Transform the output tree, one manifest at a time
/// 4. Write the filtered proxy configuration files
/// 5. Generate the build script
///
/// Returns the path of the generated build script.
pub fn run<P: AsRef<Path>>(ctx: &RunContext, input_dirs: &[P]) -> Result<PathBuf> {
    clear_dir(&ctx.output)?;
    let manifests = manifest::load_all(input_dirs)?;
    process(ctx, &manifests)
}

/// Execute phases 3-5 for already loaded manifests.
pub fn process(ctx: &RunContext, manifests: &[LoadedManifest]) -> Result<PathBuf> {
    for loaded in manifests {
        info!("Processing {}", loaded.dir.display());
        transform::execute(ctx, loaded)?;
    }

    proxies::execute(ctx, manifests)?;
    build_script::generate(ctx, manifests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_clears_output_before_loading() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("stale.txt"), "stale").unwrap();

        let ctx = RunContext::new(temp.path().join("repo"), &output);
        let err = run(&ctx, &[temp.path().join("no-input")]).unwrap_err();

        assert!(matches!(err, Error::ManifestRead { .. }));
        assert!(!output.join("stale.txt").exists());
    }

    #[test]
    fn test_process_stops_at_first_failing_manifest() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join("repo");
        fs::create_dir_all(repo.join("Good")).unwrap();
        fs::write(repo.join("Good/a.txt"), "a").unwrap();

        let first = LoadedManifest {
            dir: temp.path().join("first"),
            manifest: manifest::parse(r#"{"paths": [{"path": "Missing"}]}"#).unwrap(),
        };
        let second = LoadedManifest {
            dir: temp.path().join("second"),
            manifest: manifest::parse(r#"{"paths": [{"path": "Good"}]}"#).unwrap(),
        };

        let ctx = RunContext::new(&repo, temp.path().join("out"));
        assert!(process(&ctx, &[first, second]).is_err());
        assert!(!temp.path().join("out/Good").exists());
    }
}
