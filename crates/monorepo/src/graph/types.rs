//! Project graph node and edge types.

use crate::project::{ProjectConfiguration, ProjectType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a dependency between two projects was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    /// Derived from source or manifest analysis
    Static,
    /// Declared explicitly (e.g. `implicitDependencies`)
    Implicit,
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyType::Static => write!(f, "static"),
            DependencyType::Implicit => write!(f, "implicit"),
        }
    }
}

/// A raw dependency edge between two projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGraphEdge {
    /// The depending project
    pub source: String,
    /// The project depended upon
    pub target: String,
    /// How the dependency was established
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
    /// The file the dependency was discovered in, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl ProjectGraphEdge {
    /// Creates an edge.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        dependency_type: DependencyType,
    ) -> Self {
        Self { source: source.into(), target: target.into(), dependency_type, source_file: None }
    }

    /// Records the file the dependency was discovered in.
    #[must_use]
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }
}

/// A node in the project graph, wrapping the project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGraphNode {
    /// The project's type, lifted out of the configuration for queries
    pub project_type: ProjectType,
    /// The full (defaults-applied) project configuration
    pub config: ProjectConfiguration,
}

impl ProjectGraphNode {
    /// Wraps a project configuration.
    pub fn new(config: ProjectConfiguration) -> Self {
        Self { project_type: config.project_type, config }
    }

    /// The project name.
    pub fn name(&self) -> &str {
        &self.config.name
    }
}
