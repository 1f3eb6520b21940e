//! Plugin contract: the trait every inference plugin implements, and the
//! context and result types threaded through the two inference phases.

use crate::config::WorkspaceConfig;
use crate::error::Result;
use crate::graph::ProjectGraphEdge;
use crate::project::ProjectConfiguration;
use std::collections::BTreeMap;
use std::path::Path;

/// Context handed to [`WorkspacePlugin::create_nodes`].
pub struct PluginContext<'a> {
    /// Absolute workspace root
    pub workspace_root: &'a Path,
    /// The workspace configuration
    pub workspace_config: &'a WorkspaceConfig,
}

/// Context handed to [`WorkspacePlugin::create_dependencies`]; unlike the
/// node phase it carries the fully merged project map.
pub struct DependencyContext<'a> {
    /// Absolute workspace root
    pub workspace_root: &'a Path,
    /// The workspace configuration
    pub workspace_config: &'a WorkspaceConfig,
    /// Every project produced by the node phase, merged across plugins
    pub projects: &'a BTreeMap<String, ProjectConfiguration>,
}

/// Projects and external nodes contributed by one plugin's node phase.
#[derive(Debug, Clone, Default)]
pub struct CreateNodesResult {
    /// Projects by name; same-name projects from different plugins merge
    pub projects: BTreeMap<String, ProjectConfiguration>,
    /// Opaque non-project nodes, forwarded untouched to downstream tools
    pub external_nodes: BTreeMap<String, serde_json::Value>,
}

impl CreateNodesResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project keyed by its name.
    #[must_use]
    pub fn with_project(mut self, project: ProjectConfiguration) -> Self {
        self.projects.insert(project.name.clone(), project);
        self
    }
}

/// A project inference plugin.
///
/// Plugins must be deterministic given identical inputs and side-effect-free
/// with respect to the filesystem beyond reading the files they were given.
/// Both phases return `Result`: an error drops that plugin's contribution
/// for the phase (with a logged warning) and inference proceeds.
///
/// # Examples
///
/// ```
/// use forge_monorepo_tools::error::Result;
/// use forge_monorepo_tools::plugins::{CreateNodesResult, PluginContext, WorkspacePlugin};
/// use forge_monorepo_tools::project::{ProjectConfiguration, TargetConfiguration};
///
/// struct MakefilePlugin;
///
/// impl WorkspacePlugin for MakefilePlugin {
///     fn id(&self) -> &str {
///         "example/makefile"
///     }
///
///     fn create_nodes_pattern(&self) -> &str {
///         "**/Makefile"
///     }
///
///     fn create_nodes(
///         &self,
///         files: &[String],
///         _options: Option<&serde_json::Value>,
///         _context: &PluginContext<'_>,
///     ) -> Result<CreateNodesResult> {
///         let mut result = CreateNodesResult::new();
///         for file in files {
///             let root = file.trim_end_matches("Makefile").trim_end_matches('/');
///             let name = root.rsplit('/').next().unwrap_or("root").to_string();
///             let project = ProjectConfiguration::new(name, root)
///                 .with_target("build", TargetConfiguration::run_commands(["make"]));
///             result = result.with_project(project);
///         }
///         Ok(result)
///     }
/// }
/// ```
pub trait WorkspacePlugin: Send + Sync {
    /// Unique plugin id (e.g. `forge/package-json`).
    fn id(&self) -> &str;

    /// Glob pattern selecting this plugin's marker files.
    fn create_nodes_pattern(&self) -> &str;

    /// Default options, merged under any caller-supplied options.
    fn default_options(&self) -> Option<serde_json::Value> {
        None
    }

    /// Synthesizes projects from the matched files.
    ///
    /// Never called with an empty file list: the engine skips plugins whose
    /// pattern matched nothing.
    fn create_nodes(
        &self,
        files: &[String],
        options: Option<&serde_json::Value>,
        context: &PluginContext<'_>,
    ) -> Result<CreateNodesResult>;

    /// Contributes raw dependency edges once all projects are merged.
    ///
    /// The default implementation contributes nothing.
    fn create_dependencies(
        &self,
        options: Option<&serde_json::Value>,
        context: &DependencyContext<'_>,
    ) -> Result<Vec<ProjectGraphEdge>> {
        let _ = (options, context);
        Ok(Vec::new())
    }
}
