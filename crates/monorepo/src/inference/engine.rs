//! The two-phase inference engine.

use crate::config::WorkspaceConfig;
use crate::error::{Error, Result};
use crate::graph::ProjectGraphEdge;
use crate::plugins::{DependencyContext, PluginContext, PluginRegistration};
use crate::project::ProjectConfiguration;
use forge_standard_tools::error::FileSystemError;
use forge_standard_tools::filesystem::FileMatcher;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Everything inference produced: merged projects, raw dependency edges,
/// and the opaque external nodes plugins contributed.
///
/// Edges are raw at this point — validation (dangling targets, self-edges,
/// duplicates) happens when the project graph is built.
#[derive(Debug, Clone, Default)]
pub struct InferenceResult {
    /// Merged projects by name
    pub projects: BTreeMap<String, ProjectConfiguration>,
    /// Raw dependency edges in contribution order
    pub edges: Vec<ProjectGraphEdge>,
    /// Opaque non-project nodes, forwarded for downstream tools
    pub external_nodes: BTreeMap<String, serde_json::Value>,
}

/// Drives plugins over a workspace to produce an [`InferenceResult`].
///
/// # Examples
///
/// ```no_run
/// use forge_monorepo_tools::config::WorkspaceConfig;
/// use forge_monorepo_tools::inference::InferenceEngine;
/// use forge_monorepo_tools::plugins::PluginRegistry;
/// use std::path::Path;
///
/// # fn example() -> forge_monorepo_tools::error::Result<()> {
/// let root = Path::new("/repo");
/// let config = WorkspaceConfig::load(root)?;
/// let registry = PluginRegistry::with_builtin_plugins()?;
///
/// let result = InferenceEngine::new(root, &config).run(&registry.resolve(&config)?)?;
/// println!("inferred {} projects", result.projects.len());
/// # Ok(())
/// # }
/// ```
pub struct InferenceEngine<'a> {
    workspace_root: &'a Path,
    workspace_config: &'a WorkspaceConfig,
    matcher: FileMatcher,
}

impl<'a> InferenceEngine<'a> {
    /// Creates an engine for the given workspace.
    pub fn new(workspace_root: &'a Path, workspace_config: &'a WorkspaceConfig) -> Self {
        Self { workspace_root, workspace_config, matcher: FileMatcher::new() }
    }

    /// Replaces the file matcher (e.g. to extend the excluded directories).
    #[must_use]
    pub fn with_matcher(mut self, matcher: FileMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Runs both inference phases over the given plugins, in order.
    ///
    /// # Errors
    ///
    /// Fails only when the plugin set itself is malformed (duplicate ids)
    /// or the workspace root cannot be walked at all. Failures *inside* a
    /// plugin are logged and drop that plugin's contribution for the phase.
    #[allow(clippy::too_many_lines)]
    pub fn run(&self, plugins: &[PluginRegistration]) -> Result<InferenceResult> {
        ensure_unique_ids(plugins)?;

        let mut result = InferenceResult::default();

        // Phase 1: project nodes.
        for registration in plugins {
            let plugin = &registration.plugin;
            let id = plugin.id();

            let files = match self.matcher.match_files(self.workspace_root, plugin.create_nodes_pattern())
            {
                Ok(files) => files,
                Err(error @ FileSystemError::InvalidPattern { .. }) => {
                    log::warn!("Plugin '{id}' has an invalid pattern, skipping: {error}");
                    continue;
                }
                Err(error) => {
                    return Err(forge_standard_tools::error::Error::from(error).into());
                }
            };

            if files.is_empty() {
                log::debug!("Plugin '{id}' matched no files, skipping");
                continue;
            }

            let options = effective_options(plugin.default_options(), registration.options.as_ref());
            let context = PluginContext {
                workspace_root: self.workspace_root,
                workspace_config: self.workspace_config,
            };

            match plugin.create_nodes(&files, options.as_ref(), &context) {
                Ok(contribution) => {
                    log::debug!(
                        "Plugin '{id}' contributed {} project(s) from {} file(s)",
                        contribution.projects.len(),
                        files.len()
                    );
                    for (name, project) in contribution.projects {
                        match result.projects.get_mut(&name) {
                            Some(existing) => existing.merge(project),
                            None => {
                                result.projects.insert(name, project);
                            }
                        }
                    }
                    for (name, node) in contribution.external_nodes {
                        result.external_nodes.insert(name, node);
                    }
                }
                Err(error) => {
                    log::warn!("Plugin '{id}' failed during createNodes, contribution dropped: {error}");
                }
            }
        }

        // Phase 2: dependency edges against the fully merged projects.
        for registration in plugins {
            let plugin = &registration.plugin;
            let id = plugin.id();

            let options = effective_options(plugin.default_options(), registration.options.as_ref());
            let context = DependencyContext {
                workspace_root: self.workspace_root,
                workspace_config: self.workspace_config,
                projects: &result.projects,
            };

            match plugin.create_dependencies(options.as_ref(), &context) {
                Ok(edges) => {
                    log::debug!("Plugin '{id}' contributed {} edge(s)", edges.len());
                    result.edges.extend(edges);
                }
                Err(error) => {
                    log::warn!(
                        "Plugin '{id}' failed during createDependencies, contribution dropped: {error}"
                    );
                }
            }
        }

        Ok(result)
    }
}

/// A malformed plugin set is the one hard failure of inference.
fn ensure_unique_ids(plugins: &[PluginRegistration]) -> Result<()> {
    let mut ids = HashSet::new();
    for registration in plugins {
        let id = registration.plugin.id();
        if !ids.insert(id.to_string()) {
            return Err(Error::inference(format!("Duplicate plugin id '{id}'")));
        }
    }
    Ok(())
}

/// Computes a plugin's effective options.
///
/// Caller-supplied options override the plugin defaults key-by-key; keys
/// the defaults do not declare are ignored, and a supplied value whose JSON
/// type differs from the default's falls back to the default. A plugin with
/// no defaults receives the supplied options unchanged.
fn effective_options(
    defaults: Option<serde_json::Value>,
    supplied: Option<&serde_json::Value>,
) -> Option<serde_json::Value> {
    match (defaults, supplied) {
        (None, None) => None,
        (None, Some(supplied)) => Some(supplied.clone()),
        (Some(defaults), None) => Some(defaults),
        (Some(defaults), Some(supplied)) => Some(override_defaults(defaults, supplied)),
    }
}

fn override_defaults(defaults: serde_json::Value, supplied: &serde_json::Value) -> serde_json::Value {
    match (defaults, supplied) {
        (serde_json::Value::Object(mut defaults), serde_json::Value::Object(supplied)) => {
            for (key, default_value) in &mut defaults {
                if let Some(supplied_value) = supplied.get(key) {
                    if same_json_type(default_value, supplied_value) {
                        *default_value = supplied_value.clone();
                    } else {
                        log::debug!(
                            "Ignoring plugin option '{key}': type mismatch with the default"
                        );
                    }
                }
            }
            serde_json::Value::Object(defaults)
        }
        (defaults, supplied) => {
            if same_json_type(&defaults, supplied) {
                supplied.clone()
            } else {
                defaults
            }
        }
    }
}

fn same_json_type(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value;
    matches!(
        (a, b),
        (Value::Null, Value::Null)
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Array(_), Value::Array(_))
            | (Value::Object(_), Value::Object(_))
    )
}
