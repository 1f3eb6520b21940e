//! Plugin registration and descriptor resolution.

use super::builtin::{DockerfilePlugin, PackageJsonPlugin, ProjectJsonPlugin};
use super::types::WorkspacePlugin;
use crate::config::WorkspaceConfig;
use crate::error::{Error, Result};
use std::sync::Arc;

/// A plugin paired with the caller-supplied options from the workspace
/// configuration (merged over the plugin's defaults by the inference
/// engine).
#[derive(Clone)]
pub struct PluginRegistration {
    /// The plugin instance
    pub plugin: Arc<dyn WorkspacePlugin>,
    /// Caller-supplied options, if any
    pub options: Option<serde_json::Value>,
}

impl PluginRegistration {
    /// Registers a plugin with no caller-supplied options.
    pub fn new(plugin: Arc<dyn WorkspacePlugin>) -> Self {
        Self { plugin, options: None }
    }
}

/// Holds the available plugin instances and resolves workspace plugin
/// descriptors into the ordered list the inference engine consumes.
///
/// # Examples
///
/// ```
/// use forge_monorepo_tools::config::WorkspaceConfig;
/// use forge_monorepo_tools::plugins::PluginRegistry;
///
/// # fn example() -> forge_monorepo_tools::error::Result<()> {
/// let registry = PluginRegistry::with_builtin_plugins()?;
/// let registrations = registry.resolve(&WorkspaceConfig::default())?;
/// assert!(!registrations.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn WorkspacePlugin>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the compiled-in plugins.
    pub fn with_builtin_plugins() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(PackageJsonPlugin::new()))?;
        registry.register(Arc::new(ProjectJsonPlugin::new()))?;
        registry.register(Arc::new(DockerfilePlugin::new()))?;
        Ok(registry)
    }

    /// Registers a plugin instance.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a plugin with the same id is
    /// already registered.
    pub fn register(&mut self, plugin: Arc<dyn WorkspacePlugin>) -> Result<()> {
        let id = plugin.id().to_string();
        if self.plugins.iter().any(|existing| existing.id() == id) {
            return Err(Error::config(format!("Duplicate plugin id '{id}'")));
        }
        log::debug!("Registered plugin '{id}'");
        self.plugins.push(plugin);
        Ok(())
    }

    /// Looks up a registered plugin by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn WorkspacePlugin>> {
        self.plugins.iter().find(|plugin| plugin.id() == id).map(Arc::clone)
    }

    /// Returns every registered plugin in registration order.
    pub fn plugins(&self) -> &[Arc<dyn WorkspacePlugin>] {
        &self.plugins
    }

    /// Resolves the workspace configuration's plugin list.
    ///
    /// When the configuration names no plugins, every registered plugin runs
    /// in registration order with its default options. Otherwise the
    /// descriptors select and order the plugins, carrying any per-plugin
    /// options along.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a descriptor names an unknown
    /// plugin id.
    pub fn resolve(&self, config: &WorkspaceConfig) -> Result<Vec<PluginRegistration>> {
        if config.plugins.is_empty() {
            return Ok(self.plugins.iter().map(Arc::clone).map(PluginRegistration::new).collect());
        }

        let mut registrations = Vec::with_capacity(config.plugins.len());
        for descriptor in &config.plugins {
            let plugin = self.get(descriptor.id()).ok_or_else(|| {
                Error::config(format!("Unknown plugin '{}' in workspace configuration", descriptor.id()))
            })?;
            registrations.push(PluginRegistration {
                plugin,
                options: descriptor.options().cloned(),
            });
        }
        Ok(registrations)
    }
}
