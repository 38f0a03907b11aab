//! Default values and fixed names used across a transformation run.
//!
//! This module centralizes the file names, suffixes, and build flag names that
//! the generated tree and script depend on, so that every phase agrees on them.

/// Name of the manifest document expected in every input directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Name of the generated build configuration script in the output directory.
pub const BUILD_SCRIPT_FILE: &str = "cmake.sh";

/// Native build configuration tool invoked by the generated script.
pub const BUILD_TOOL: &str = "cmake";

/// Cache flag receiving the client/server wrapped module names.
pub const CS_MODULES_FLAG: &str = "PARAVIEW_CS_MODULES:STRING";

/// Cache flag receiving the Python wrapped module names.
pub const PYTHON_MODULES_FLAG: &str = "VTK_WRAP_PYTHON_MODULES:STRING";

/// Cache flag receiving the `git describe` version stamp.
pub const VERSION_FLAG: &str = "PARAVIEW_GIT_DESCRIBE";

/// Suffix of the header half of a class include.
pub const HEADER_SUFFIX: &str = "h";

/// Suffix of the source half of a class include.
pub const SOURCE_SUFFIX: &str = "cxx";

/// Suffix appended to the input directory name for class source fragments.
pub const FRAGMENT_SUFFIX: &str = "catalyst.cmake";

/// Build variable listing module sources in a class fragment.
pub const MODULE_SOURCES_VAR: &str = "Module_SRCS";

/// Required root element of a proxy configuration document.
pub const PROXY_ROOT: &str = "ServerManagerConfiguration";

/// Element grouping proxy definitions.
pub const PROXY_GROUP: &str = "ProxyGroup";

/// Proxy definition elements that can be retained, in output order.
pub const PROXY_TAGS: [&str; 3] = ["SourceProxy", "NullProxy", "Proxy"];

/// Program used to apply unified diffs.
pub const PATCH_PROGRAM: &str = "patch";

/// Embedded module directories whose inline patches are rooted at the module.
pub fn default_embedded_modules() -> Vec<String> {
    vec!["VTK".to_string()]
}
