//! Transform command implementation
//!
//! Resolves the run settings from the command line and executes the full
//! pipeline:
//! 1. Resolving the source repository root
//! 2. Clearing the output directory
//! 3. Loading the manifests of every input directory, in order
//! 4. Transforming the output tree
//! 5. Filtering proxy configuration files
//! 6. Generating the build script

use anyhow::Result;
use clap::Args;
use log::info;
use std::path::PathBuf;

use catalyze::defaults::{default_embedded_modules, PATCH_PROGRAM};
use catalyze::patch::Patcher;
use catalyze::phases::{executable_dir, orchestrator, resolve_repo, RunContext};

/// Arguments for a transformation run
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// The source repository; defaults to the repository containing this executable
    #[arg(short = 'r', long = "repo", value_name = "DIR", env = "CATALYZE_REPO")]
    pub repo: Option<String>,

    /// (repeatable) A directory containing manifest.json and its resources,
    /// given in the order of processing
    #[arg(short = 'i', long = "input", value_name = "DIR", required = true)]
    pub input_dirs: Vec<PathBuf>,

    /// The directory where the transformed sources will be written
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Program used to apply patches, invoked as `<PROGRAM> -p1`
    #[arg(long, value_name = "PROGRAM", env = "CATALYZE_PATCH", default_value = PATCH_PROGRAM)]
    pub patch_program: String,

    /// (repeatable) Embedded module directory whose inline patches are applied
    /// from inside that directory [default: VTK]
    #[arg(long = "embedded-module", value_name = "NAME")]
    pub embedded_modules: Vec<String>,
}

impl TransformArgs {
    fn context(&self, repo: PathBuf) -> RunContext {
        let embedded_modules = if self.embedded_modules.is_empty() {
            default_embedded_modules()
        } else {
            self.embedded_modules.clone()
        };
        RunContext::new(repo, &self.output_dir)
            .with_patcher(Patcher::new(&self.patch_program))
            .with_embedded_modules(embedded_modules)
    }
}

/// Execute a transformation run
pub fn execute(args: TransformArgs) -> Result<()> {
    let repo = resolve_repo(args.repo.as_deref(), &executable_dir()?)?;
    info!("Source repository: {}", repo.display());

    let ctx = args.context(repo);
    let script = orchestrator::run(&ctx, &args.input_dirs)?;

    info!(
        "Transformed sources written to {} (configure with {})",
        ctx.output.display(),
        script.display()
    );
    Ok(())
}
