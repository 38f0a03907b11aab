//! # Catalyze CLI
//!
//! This is the binary entry point for the `catalyze` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the transformation described by the input manifests.
//! - Reporting any failure as a single `Error:` line and exiting with status -1.
//!
//! The core logic lives in the `catalyze` library crate.

mod cli;
mod commands;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(err) = cli.execute() {
        eprintln!("Error: {}", err);
        std::process::exit(-1);
    }
}
