//! Built-in inference plugins
//!
//! Compiled-in plugins covering the marker files forge understands out of
//! the box. Each conforms to the [`WorkspacePlugin`] contract and can be
//! replaced or reordered through the workspace configuration's `plugins`
//! list.

use super::types::{CreateNodesResult, DependencyContext, PluginContext, WorkspacePlugin};
use crate::error::Result;
use crate::graph::{DependencyType, ProjectGraphEdge};
use crate::project::{ProjectConfiguration, ProjectType, TargetConfiguration};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// The workspace-relative directory containing `file`, normalized to `.`
/// for files at the workspace root.
fn project_root_of(file: &str) -> String {
    match file.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => ".".to_string(),
    }
}

/// A fallback project name derived from the project root's directory name.
fn directory_name(root: &str, workspace_root: &Path) -> String {
    if root == "." {
        return workspace_root
            .file_name()
            .map_or_else(|| "root".to_string(), |name| name.to_string_lossy().into_owned());
    }
    root.rsplit('/').next().unwrap_or(root).to_string()
}

/// Classifies a project by where it lives relative to the workspace layout.
fn project_type_for_root(root: &str, context: &PluginContext<'_>) -> ProjectType {
    let apps_dir = &context.workspace_config.workspace_layout.apps_dir;
    if root == apps_dir.as_str() || root.starts_with(&format!("{apps_dir}/")) {
        ProjectType::Application
    } else {
        ProjectType::Library
    }
}

/// The manifest file for a project, relative to the workspace root.
fn manifest_path(project_root: &str, file_name: &str) -> String {
    if project_root == "." {
        file_name.to_string()
    } else {
        format!("{project_root}/{file_name}")
    }
}

/// The subset of a `package.json` this plugin reads.
#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: Option<String>,
    #[serde(default)]
    scripts: BTreeMap<String, String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    fn read(workspace_root: &Path, relative: &str) -> Option<Self> {
        let path = workspace_root.join(relative);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                log::warn!("Failed to read {relative}: {error}");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(manifest) => Some(manifest),
            Err(error) => {
                log::warn!("Skipping malformed {relative}: {error}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PackageJsonOptions {
    package_manager: String,
}

impl Default for PackageJsonOptions {
    fn default() -> Self {
        Self { package_manager: "npm".to_string() }
    }
}

/// Infers projects from `package.json` manifests.
///
/// Each manifest becomes a project rooted at its directory: the package
/// name (or the directory name) becomes the project name, and every script
/// becomes a shell target running `<packageManager> run <script>`. The
/// dependency phase emits a static edge for every `dependencies` /
/// `devDependencies` entry that names another workspace project.
pub struct PackageJsonPlugin;

impl PackageJsonPlugin {
    /// Creates the plugin.
    pub fn new() -> Self {
        Self
    }

    fn options_from(options: Option<&serde_json::Value>) -> PackageJsonOptions {
        options
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }
}

impl Default for PackageJsonPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspacePlugin for PackageJsonPlugin {
    fn id(&self) -> &str {
        "forge/package-json"
    }

    fn create_nodes_pattern(&self) -> &str {
        "**/package.json"
    }

    fn default_options(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({ "packageManager": "npm" }))
    }

    fn create_nodes(
        &self,
        files: &[String],
        options: Option<&serde_json::Value>,
        context: &PluginContext<'_>,
    ) -> Result<CreateNodesResult> {
        let options = Self::options_from(options);
        let mut result = CreateNodesResult::new();

        for file in files {
            let Some(manifest) = PackageManifest::read(context.workspace_root, file) else {
                continue;
            };

            let root = project_root_of(file);
            let name = manifest
                .name
                .unwrap_or_else(|| directory_name(&root, context.workspace_root));

            let mut project = ProjectConfiguration::new(name, root.as_str())
                .with_project_type(project_type_for_root(&root, context));
            for script in manifest.scripts.keys() {
                let command = format!("{} run {script}", options.package_manager);
                project = project
                    .with_target(script.clone(), TargetConfiguration::run_commands([command]));
            }

            result = result.with_project(project);
        }

        Ok(result)
    }

    fn create_dependencies(
        &self,
        _options: Option<&serde_json::Value>,
        context: &DependencyContext<'_>,
    ) -> Result<Vec<ProjectGraphEdge>> {
        let mut edges = Vec::new();

        for (name, project) in context.projects {
            let manifest_file = manifest_path(&project.root, "package.json");
            if !context.workspace_root.join(&manifest_file).is_file() {
                continue;
            }
            let Some(manifest) = PackageManifest::read(context.workspace_root, &manifest_file)
            else {
                continue;
            };

            for dependency in manifest.dependencies.keys().chain(manifest.dev_dependencies.keys())
            {
                if dependency != name && context.projects.contains_key(dependency) {
                    edges.push(
                        ProjectGraphEdge::new(name.clone(), dependency.clone(), DependencyType::Static)
                            .with_source_file(manifest_file.clone()),
                    );
                }
            }
        }

        Ok(edges)
    }
}

/// The shape of a `project.json` file: a project configuration minus the
/// root (derived from the file's location) with everything optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProjectJsonFile {
    name: Option<String>,
    source_root: Option<String>,
    project_type: Option<ProjectType>,
    tags: Vec<String>,
    targets: BTreeMap<String, TargetConfiguration>,
    named_inputs: BTreeMap<String, Vec<String>>,
    implicit_dependencies: Vec<String>,
}

impl ProjectJsonFile {
    fn read(workspace_root: &Path, relative: &str) -> Option<Self> {
        let path = workspace_root.join(relative);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                log::warn!("Failed to read {relative}: {error}");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(file) => Some(file),
            Err(error) => {
                log::warn!("Skipping malformed {relative}: {error}");
                None
            }
        }
    }
}

/// Infers projects from explicit `project.json` files.
///
/// This is the escape hatch from inference: anything the marker-file
/// plugins guessed can be overridden here, since same-name projects merge
/// with the later plugin winning on conflicting targets.
pub struct ProjectJsonPlugin;

impl ProjectJsonPlugin {
    /// Creates the plugin.
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProjectJsonPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspacePlugin for ProjectJsonPlugin {
    fn id(&self) -> &str {
        "forge/project-json"
    }

    fn create_nodes_pattern(&self) -> &str {
        "**/project.json"
    }

    fn create_nodes(
        &self,
        files: &[String],
        _options: Option<&serde_json::Value>,
        context: &PluginContext<'_>,
    ) -> Result<CreateNodesResult> {
        let mut result = CreateNodesResult::new();

        for file in files {
            let Some(parsed) = ProjectJsonFile::read(context.workspace_root, file) else {
                continue;
            };

            let root = project_root_of(file);
            let name =
                parsed.name.unwrap_or_else(|| directory_name(&root, context.workspace_root));
            let project_type =
                parsed.project_type.unwrap_or_else(|| project_type_for_root(&root, context));

            let mut project =
                ProjectConfiguration::new(name, root.as_str()).with_project_type(project_type);
            project.source_root = parsed.source_root;
            project.tags = parsed.tags;
            project.targets = parsed.targets;
            project.named_inputs = parsed.named_inputs;

            result = result.with_project(project);
        }

        Ok(result)
    }

    fn create_dependencies(
        &self,
        _options: Option<&serde_json::Value>,
        context: &DependencyContext<'_>,
    ) -> Result<Vec<ProjectGraphEdge>> {
        let mut edges = Vec::new();

        for (name, project) in context.projects {
            let file = manifest_path(&project.root, "project.json");
            if !context.workspace_root.join(&file).is_file() {
                continue;
            }
            let Some(parsed) = ProjectJsonFile::read(context.workspace_root, &file) else {
                continue;
            };

            for dependency in parsed.implicit_dependencies {
                if dependency != *name {
                    edges.push(
                        ProjectGraphEdge::new(name.clone(), dependency, DependencyType::Implicit)
                            .with_source_file(file.clone()),
                    );
                }
            }
        }

        Ok(edges)
    }
}

/// Contributes a `docker-build` target to every project rooted at a
/// `Dockerfile`'s directory.
///
/// When another plugin already inferred a project with the same name, the
/// target merges into it; otherwise a standalone project named after the
/// directory materializes.
pub struct DockerfilePlugin;

impl DockerfilePlugin {
    /// Creates the plugin.
    pub fn new() -> Self {
        Self
    }
}

impl Default for DockerfilePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspacePlugin for DockerfilePlugin {
    fn id(&self) -> &str {
        "forge/docker"
    }

    fn create_nodes_pattern(&self) -> &str {
        "**/Dockerfile"
    }

    fn create_nodes(
        &self,
        files: &[String],
        _options: Option<&serde_json::Value>,
        context: &PluginContext<'_>,
    ) -> Result<CreateNodesResult> {
        let mut result = CreateNodesResult::new();

        for file in files {
            let root = project_root_of(file);
            let name = directory_name(&root, context.workspace_root);

            let build = TargetConfiguration::run_commands([
                "docker build -t {projectName} {projectRoot}".to_string(),
            ]);
            let project = ProjectConfiguration::new(name, root.as_str())
                .with_project_type(project_type_for_root(&root, context))
                .with_target("docker-build", build);

            result = result.with_project(project);
        }

        Ok(result)
    }
}
