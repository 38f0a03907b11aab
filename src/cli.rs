//! CLI argument parsing and logging setup

use anyhow::Result;
use clap::Parser;

use crate::commands;

/// Catalyze - Transform a source tree into a reduced distribution using manifests
#[derive(Parser, Debug)]
#[command(name = "catalyze")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    args: commands::transform::TransformArgs,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        commands::transform::execute(self.args)
    }
}

/// Initialize `env_logger`; `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running inside tests.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
