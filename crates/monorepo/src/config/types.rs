//! Workspace configuration model.

use crate::project::TargetConfiguration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Workspace configuration, read from `forge.json` / `workspace.json`.
///
/// # Examples
///
/// ```
/// use forge_monorepo_tools::config::WorkspaceConfig;
///
/// let config: WorkspaceConfig = serde_json::from_str(
///     r#"{
///         "version": 1,
///         "targetDefaults": {"build": {"cache": true, "dependsOn": ["^build"]}},
///         "workspaceLayout": {"appsDir": "apps", "libsDir": "libs"},
///         "affected": {"defaultBase": "main"}
///     }"#,
/// )
/// .unwrap();
/// assert!(config.target_defaults.contains_key("build"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceConfig {
    /// Configuration format version
    pub version: u32,

    /// Partial target configuration applied to every project target of the
    /// same name (project values win; see the project graph builder)
    pub target_defaults: BTreeMap<String, TargetConfiguration>,

    /// Reusable named input pattern lists
    pub named_inputs: BTreeMap<String, Vec<String>>,

    /// Plugins to run during inference, in order
    pub plugins: Vec<PluginDescriptor>,

    /// Directory conventions for applications and libraries
    pub workspace_layout: WorkspaceLayout,

    /// Settings for affected-project queries
    pub affected: AffectedConfig,
}

/// Directory conventions used to classify inferred projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceLayout {
    /// Directory containing applications
    pub apps_dir: String,
    /// Directory containing libraries
    pub libs_dir: String,
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self { apps_dir: "apps".to_string(), libs_dir: "libs".to_string() }
    }
}

/// Settings for affected-project queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AffectedConfig {
    /// Base revision compared against when computing the affected set
    pub default_base: String,
}

impl Default for AffectedConfig {
    fn default() -> Self {
        Self { default_base: "main".to_string() }
    }
}

/// A plugin entry in the workspace configuration: either a bare plugin id
/// or an id with plugin-specific options.
///
/// ```json
/// { "plugins": ["forge/package-json", {"plugin": "forge/docker", "options": {"tag": "latest"}}] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginDescriptor {
    /// Bare plugin id
    Id(String),
    /// Plugin id with caller-supplied options
    WithOptions {
        /// Plugin id
        plugin: String,
        /// Options merged over the plugin's defaults
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<serde_json::Value>,
    },
}

impl PluginDescriptor {
    /// The plugin id this descriptor refers to.
    pub fn id(&self) -> &str {
        match self {
            PluginDescriptor::Id(id) => id,
            PluginDescriptor::WithOptions { plugin, .. } => plugin,
        }
    }

    /// The caller-supplied options, if any.
    pub fn options(&self) -> Option<&serde_json::Value> {
        match self {
            PluginDescriptor::Id(_) => None,
            PluginDescriptor::WithOptions { options, .. } => options.as_ref(),
        }
    }
}
