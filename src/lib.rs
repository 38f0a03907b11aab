//! # Catalyze Library
//!
//! This library turns a large source repository into a reduced derivative
//! source distribution, driven by one or more `manifest.json` documents. It is
//! used by the `catalyze` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use catalyze::manifest;
//! use catalyze::phases::build_script::{render, BuildMetadata};
//!
//! let manifest = manifest::parse(r#"{
//!     "modules": [{"name": "vtkPVCatalyst", "path": "CoProcessing/Catalyst", "cswrap": true}],
//!     "cmake": {"cache": [{"name": "BUILD_TESTING", "type": "BOOL", "value": "OFF"}]}
//! }"#).unwrap();
//!
//! let metadata = BuildMetadata::collect([&manifest]);
//! let script = render(&metadata, "v4.1.0");
//! assert!(script.contains("-DPARAVIEW_CS_MODULES:STRING=\"vtkPVCatalyst\""));
//! assert!(script.contains("-DBUILD_TESTING:BOOL=OFF"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifests (`manifest`)**: The typed, validated schema of `manifest.json`:
//!   path entries, modules, proxy filter requests, and build cache entries.
//! - **Filesystem (`filesystem`, `path`)**: Copying files and directory trees
//!   from the repository while honoring exclusion patterns.
//! - **External tools (`git`, `patch`)**: Repository queries and patch
//!   application through the system `git` and `patch` commands.
//! - **Phases (`phases`)**: Tree transformation, proxy filtering, and build
//!   script generation, coordinated by `phases::orchestrator`.
//!
//! ## Execution Flow
//!
//! 1.  **Clear**: Remove any previous output directory.
//! 2.  **Load**: Read and validate the manifest of every input directory.
//! 3.  **Transform**: Apply each manifest's entries to the output tree, in order.
//! 4.  **Proxies**: Write the filtered proxy configuration documents.
//! 5.  **Build script**: Write `cmake.sh` with the aggregated build flags.
//!
//! Any error aborts the run immediately; nothing is rolled back.

pub mod defaults;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod manifest;
pub mod patch;
pub mod path;
pub mod phases;

#[cfg(test)]
mod metadata_proptest;
