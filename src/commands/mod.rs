//! # CLI Command Implementations
//!
//! `catalyze` has a single operation, implemented in `transform.rs`: an `Args`
//! struct derived with `clap` and an `execute` function that resolves the run
//! settings and calls into the `catalyze` library.

pub mod transform;
