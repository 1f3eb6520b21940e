//! Plugin system for project inference
//!
//! Plugins are how forge learns what lives in a workspace. Each plugin
//! declares a glob pattern for its marker files (`**/package.json`,
//! `**/Dockerfile`, …) and two pure functions: `create_nodes` synthesizes
//! project configurations from the matched files, and `create_dependencies`
//! contributes raw edges once every plugin's projects have been merged.
//!
//! The [`PluginRegistry`] owns the compiled-in plugin set, enforces id
//! uniqueness, and resolves the workspace configuration's plugin descriptors
//! into the ordered list handed to the inference engine.

mod builtin;
mod registry;
mod types;


pub use builtin::{DockerfilePlugin, PackageJsonPlugin, ProjectJsonPlugin};
pub use registry::{PluginRegistration, PluginRegistry};
pub use types::{CreateNodesResult, DependencyContext, PluginContext, WorkspacePlugin};
