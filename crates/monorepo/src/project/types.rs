//! Core project model types.

use crate::error::{Error, Result};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Kind of project within the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// A deployable application
    Application,
    /// A shared library
    #[default]
    Library,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectType::Application => write!(f, "application"),
            ProjectType::Library => write!(f, "library"),
        }
    }
}

/// A parsed `dependsOn` entry.
///
/// The configuration surface uses a small string DSL (`"^build"`,
/// `"api:compile"`, `"compile"`); it is parsed into this variant eagerly at
/// configuration load so downstream code never re-interprets strings.
///
/// # Examples
///
/// ```
/// use forge_monorepo_tools::project::DependencyRef;
///
/// let upstream: DependencyRef = "^build".parse().unwrap();
/// assert_eq!(upstream, DependencyRef::UpstreamOf { target: "build".to_string() });
///
/// let cross: DependencyRef = "api:compile".parse().unwrap();
/// assert_eq!(cross.to_string(), "api:compile");
///
/// let local: DependencyRef = "compile".parse().unwrap();
/// assert_eq!(local, DependencyRef::Local { target: "compile".to_string() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyRef {
    /// The same-named target in every direct project dependency (`"^X"`)
    UpstreamOf {
        /// Target name resolved in each upstream project
        target: String,
    },
    /// A specific target in a specific project (`"proj:X"`)
    Project {
        /// Project the target belongs to
        project: String,
        /// Target name within that project
        target: String,
    },
    /// Another target within the same project (`"X"`)
    Local {
        /// Target name within the same project
        target: String,
    },
}

impl FromStr for DependencyRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::config("Empty dependency reference"));
        }

        if let Some(target) = s.strip_prefix('^') {
            Self::validate_segment(s, target)?;
            return Ok(DependencyRef::UpstreamOf { target: target.to_string() });
        }

        if let Some((project, target)) = s.split_once(':') {
            Self::validate_segment(s, project)?;
            Self::validate_segment(s, target)?;
            return Ok(DependencyRef::Project {
                project: project.to_string(),
                target: target.to_string(),
            });
        }

        Self::validate_segment(s, s)?;
        Ok(DependencyRef::Local { target: s.to_string() })
    }
}

impl DependencyRef {
    /// The colon is reserved as the project/target separator; neither half
    /// of a reference may contain it, and neither may be empty.
    fn validate_segment(reference: &str, segment: &str) -> Result<()> {
        if segment.is_empty() {
            return Err(Error::config(format!("Invalid dependency reference '{reference}'")));
        }
        if segment.contains(':') {
            return Err(Error::config(format!(
                "Invalid dependency reference '{reference}': ':' is reserved"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyRef::UpstreamOf { target } => write!(f, "^{target}"),
            DependencyRef::Project { project, target } => write!(f, "{project}:{target}"),
            DependencyRef::Local { target } => write!(f, "{target}"),
        }
    }
}

impl Serialize for DependencyRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DependencyRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|error: Error| D::Error::custom(error.to_string()))
    }
}

/// Configuration of a single target on a project.
///
/// `options` is a plain key-value map: each executor (and each plugin that
/// synthesizes targets) reads the keys it recognizes and ignores the rest.
/// The accessors on this type cover the keys the shell executor understands.
///
/// # Examples
///
/// ```
/// use forge_monorepo_tools::project::TargetConfiguration;
/// use serde_json::json;
///
/// let target: TargetConfiguration = serde_json::from_value(json!({
///     "executor": "run-commands",
///     "options": {"commands": ["npm run build"], "cwd": "apps/web"},
///     "dependsOn": ["^build"],
///     "cache": true,
/// }))
/// .unwrap();
///
/// assert_eq!(target.command_list(), vec!["npm run build".to_string()]);
/// assert_eq!(target.cwd(), Some("apps/web".to_string()));
/// assert!(target.cache());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetConfiguration {
    /// Executor id; `None` and the `run-commands` family mean "invoke the shell"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,

    /// Executor options (recognized keys: `commands`, `cwd`, `parallel`, `env`)
    pub options: serde_json::Map<String, serde_json::Value>,

    /// Named option-map overrides
    pub configurations: BTreeMap<String, serde_json::Map<String, serde_json::Value>>,

    /// Parsed dependency references
    pub depends_on: Vec<DependencyRef>,

    /// Input patterns feeding this target
    pub inputs: Vec<String>,

    /// Output globs produced by this target
    pub outputs: Vec<String>,

    /// Whether results of this target are cacheable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,

    /// Whether this target may run alongside others (defaults to true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<bool>,
}

impl TargetConfiguration {
    /// Creates a shell target running the given commands.
    pub fn run_commands<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commands: Vec<serde_json::Value> =
            commands.into_iter().map(|c| serde_json::Value::String(c.into())).collect();
        let mut options = serde_json::Map::new();
        options.insert("commands".to_string(), serde_json::Value::Array(commands));
        Self { executor: Some("run-commands".to_string()), options, ..Self::default() }
    }

    /// Adds a parsed dependency reference.
    #[must_use]
    pub fn with_depends_on(mut self, reference: DependencyRef) -> Self {
        self.depends_on.push(reference);
        self
    }

    /// Sets an executor option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// The command list from `options.commands`.
    ///
    /// Accepts a list of strings or a single string (wrapped into a list);
    /// non-string list entries are skipped. Absent or empty yields an empty
    /// list.
    pub fn command_list(&self) -> Vec<String> {
        match self.options.get("commands") {
            Some(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|value| value.as_str().map(ToString::to_string))
                .collect(),
            Some(serde_json::Value::String(command)) => vec![command.clone()],
            _ => Vec::new(),
        }
    }

    /// The working directory from `options.cwd`, if it is a string.
    pub fn cwd(&self) -> Option<String> {
        self.options.get("cwd").and_then(|value| value.as_str()).map(ToString::to_string)
    }

    /// The `options.parallel` flag; defaults to false.
    pub fn parallel(&self) -> bool {
        self.options.get("parallel").and_then(serde_json::Value::as_bool).unwrap_or(false)
    }

    /// Environment overrides from `options.env`; non-string entries skipped.
    pub fn env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        if let Some(serde_json::Value::Object(entries)) = self.options.get("env") {
            for (key, value) in entries {
                match value.as_str() {
                    Some(value) => {
                        env.insert(key.clone(), value.to_string());
                    }
                    None => {
                        log::debug!("Skipping non-string env entry '{key}'");
                    }
                }
            }
        }
        env
    }

    /// Whether this target's results are cacheable; defaults to false.
    pub fn cache(&self) -> bool {
        self.cache.unwrap_or(false)
    }

    /// Whether this target may run alongside others; defaults to true.
    pub fn parallelism(&self) -> bool {
        self.parallelism.unwrap_or(true)
    }
}

/// Configuration of a project within the workspace.
///
/// Projects materialize during inference and are immutable thereafter; the
/// merge semantics on [`ProjectConfiguration::merge`] define what happens
/// when several plugins contribute the same project name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfiguration {
    /// Globally unique project name
    pub name: String,

    /// Workspace-relative root path, normalized with forward slashes
    pub root: String,

    /// Source root; defaults to `<root>/src`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,

    /// Whether the project is an application or a library
    #[serde(default)]
    pub project_type: ProjectType,

    /// Free-form tags used for filtering
    #[serde(default)]
    pub tags: Vec<String>,

    /// Targets by name
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfiguration>,

    /// Named input patterns scoped to this project
    #[serde(default)]
    pub named_inputs: BTreeMap<String, Vec<String>>,
}

impl ProjectConfiguration {
    /// Creates a project with the given name and root.
    ///
    /// The root is normalized: backslashes become forward slashes, leading
    /// `./` and trailing `/` are stripped, and an empty root becomes `.`.
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: Self::normalize_root(&root.into()),
            source_root: None,
            project_type: ProjectType::default(),
            tags: Vec::new(),
            targets: BTreeMap::new(),
            named_inputs: BTreeMap::new(),
        }
    }

    /// Sets the project type.
    #[must_use]
    pub fn with_project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a target.
    #[must_use]
    pub fn with_target(mut self, name: impl Into<String>, target: TargetConfiguration) -> Self {
        self.targets.insert(name.into(), target);
        self
    }

    /// Whether the project defines the given target.
    pub fn has_target(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// The effective source root (`sourceRoot` or `<root>/src`).
    pub fn source_root(&self) -> String {
        match &self.source_root {
            Some(source_root) => source_root.clone(),
            None if self.root == "." => "src".to_string(),
            None => format!("{}/src", self.root),
        }
    }

    /// Merges a later plugin's contribution for the same project name.
    ///
    /// Targets are unioned with the later plugin winning on conflicting
    /// target names; tags are unioned deduplicating while preserving first
    /// appearance; `root`, `sourceRoot`, and `projectType` retain their
    /// first-seen values. Named inputs union with the later plugin winning
    /// per key. Merging an empty contribution is an identity.
    pub fn merge(&mut self, later: ProjectConfiguration) {
        for (name, target) in later.targets {
            self.targets.insert(name, target);
        }
        for tag in later.tags {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        for (name, inputs) in later.named_inputs {
            self.named_inputs.insert(name, inputs);
        }
    }

    /// Normalizes a workspace-relative root path.
    pub fn normalize_root(root: &str) -> String {
        let mut normalized = root.replace('\\', "/");
        while let Some(stripped) = normalized.strip_prefix("./") {
            normalized = stripped.to_string();
        }
        while normalized.ends_with('/') {
            normalized.pop();
        }
        if normalized.is_empty() {
            normalized.push('.');
        }
        normalized
    }
}
