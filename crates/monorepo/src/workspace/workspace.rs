//! Core workspace representation.

use crate::config::WorkspaceConfig;
use crate::error::{Error, Result};
use crate::graph::{build_project_graph, ProjectGraph};
use crate::inference::{InferenceEngine, InferenceResult};
use crate::plugins::PluginRegistry;
use std::path::{Path, PathBuf};

/// A rooted directory containing many projects plus its workspace
/// configuration.
///
/// The workspace is the entry point of the orchestration pipeline: it loads
/// the configuration once and drives inference and graph construction on
/// demand. Nothing is persisted — inference is recomputed each invocation.
///
/// # Examples
///
/// ```no_run
/// use forge_monorepo_tools::plugins::PluginRegistry;
/// use forge_monorepo_tools::workspace::Workspace;
/// use std::path::Path;
///
/// # fn example() -> forge_monorepo_tools::error::Result<()> {
/// let workspace = Workspace::discover(Path::new("/repo"))?;
/// let registry = PluginRegistry::with_builtin_plugins()?;
///
/// let graph = workspace.project_graph(&registry)?;
/// println!("{} project(s)", graph.project_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Absolute workspace root
    root: PathBuf,
    /// The loaded workspace configuration
    config: WorkspaceConfig,
}

impl Workspace {
    /// Discovers the workspace rooted at `root`.
    ///
    /// The root is canonicalized and its `forge.json` / `workspace.json`
    /// loaded (defaults apply when neither exists).
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the root is not an accessible
    /// directory or the configuration file is malformed.
    pub fn discover(root: &Path) -> Result<Self> {
        let root = root.canonicalize().map_err(|error| {
            Error::config(format!("Workspace root '{}' is not accessible: {error}", root.display()))
        })?;
        if !root.is_dir() {
            return Err(Error::config(format!(
                "Workspace root '{}' is not a directory",
                root.display()
            )));
        }
        let config = WorkspaceConfig::load(&root)?;
        Ok(Self { root, config })
    }

    /// Creates a workspace from parts already in hand.
    pub fn new(root: PathBuf, config: WorkspaceConfig) -> Self {
        Self { root, config }
    }

    /// The absolute workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The workspace configuration.
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Runs plugin inference over the workspace.
    ///
    /// The registry's plugins are resolved through the configuration's
    /// `plugins` list (or run in registration order when the list is empty).
    pub fn infer_projects(&self, registry: &PluginRegistry) -> Result<InferenceResult> {
        let registrations = registry.resolve(&self.config)?;
        InferenceEngine::new(&self.root, &self.config).run(&registrations)
    }

    /// Runs inference and builds the defaults-applied project graph.
    pub fn project_graph(&self, registry: &PluginRegistry) -> Result<ProjectGraph> {
        let inference = self.infer_projects(registry)?;
        build_project_graph(&inference, &self.config)
    }
}
