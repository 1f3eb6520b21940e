//! Project graph construction: target defaults and edge validation.

use super::project_graph::ProjectGraph;
use super::types::{DependencyType, ProjectGraphNode};
use crate::config::WorkspaceConfig;
use crate::error::{Error, Result};
use crate::inference::InferenceResult;
use crate::project::{ProjectConfiguration, TargetConfiguration};
use std::collections::{BTreeMap, HashSet};

/// Builds the project graph from an inference result.
///
/// Workspace `targetDefaults` are folded into every project target of the
/// same name (project values win), then the raw edge list is validated:
/// edges to unknown projects are dropped with a warning, self-edges are
/// dropped, and duplicates collapse by `(source, target, type)`.
///
/// # Errors
///
/// Returns a configuration error when a project or target name contains a
/// colon — the colon is reserved as the task id separator.
pub fn build_project_graph(
    inference: &InferenceResult,
    config: &WorkspaceConfig,
) -> Result<ProjectGraph> {
    let mut nodes = BTreeMap::new();
    for (name, project) in &inference.projects {
        if name.contains(':') {
            return Err(Error::config(format!(
                "Project name '{name}' contains ':', which is reserved"
            )));
        }
        if let Some(target) = project.targets.keys().find(|target| target.contains(':')) {
            return Err(Error::config(format!(
                "Target name '{target}' of project '{name}' contains ':', which is reserved"
            )));
        }

        let mut project = project.clone();
        apply_target_defaults(&mut project, &config.target_defaults);
        nodes.insert(name.clone(), ProjectGraphNode::new(project));
    }

    let mut seen: HashSet<(String, String, DependencyType)> = HashSet::new();
    let mut edges = Vec::new();
    for edge in &inference.edges {
        if !nodes.contains_key(&edge.source) || !nodes.contains_key(&edge.target) {
            log::warn!(
                "Dropping dependency edge {} -> {}: project not in graph",
                edge.source,
                edge.target
            );
            continue;
        }
        if edge.source == edge.target {
            log::debug!("Dropping self-edge on project '{}'", edge.source);
            continue;
        }
        if !seen.insert((edge.source.clone(), edge.target.clone(), edge.dependency_type)) {
            continue;
        }
        edges.push(edge.clone());
    }

    Ok(ProjectGraph::from_parts(nodes, edges))
}

/// Folds workspace target defaults into a project's targets.
fn apply_target_defaults(
    project: &mut ProjectConfiguration,
    defaults: &BTreeMap<String, TargetConfiguration>,
) {
    for (name, target) in &mut project.targets {
        if let Some(default) = defaults.get(name) {
            *target = merge_target(default, target);
        }
    }
}

/// Merges a target default with a project-level target configuration.
///
/// Field-by-field, the project value wins; `dependsOn`, `inputs`, and
/// `outputs` union with the project values appended (deduplicating while
/// preserving order); `options` and `configurations` deep-merge with the
/// project values winning.
fn merge_target(default: &TargetConfiguration, project: &TargetConfiguration) -> TargetConfiguration {
    let mut configurations = default.configurations.clone();
    for (name, overlay) in &project.configurations {
        let merged = match configurations.get(name) {
            Some(base) => deep_merge_maps(base, overlay),
            None => overlay.clone(),
        };
        configurations.insert(name.clone(), merged);
    }

    TargetConfiguration {
        executor: project.executor.clone().or_else(|| default.executor.clone()),
        options: deep_merge_maps(&default.options, &project.options),
        configurations,
        depends_on: union_preserving_order(&default.depends_on, &project.depends_on),
        inputs: union_preserving_order(&default.inputs, &project.inputs),
        outputs: union_preserving_order(&default.outputs, &project.outputs),
        cache: project.cache.or(default.cache),
        parallelism: project.parallelism.or(default.parallelism),
    }
}

/// Deep-merges two JSON maps; overlay values win, nested objects recurse.
fn deep_merge_maps(
    base: &serde_json::Map<String, serde_json::Value>,
    overlay: &serde_json::Map<String, serde_json::Value>,
) -> serde_json::Map<String, serde_json::Value> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let combined = match (merged.get(key), value) {
            (Some(serde_json::Value::Object(base)), serde_json::Value::Object(overlay)) => {
                serde_json::Value::Object(deep_merge_maps(base, overlay))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    merged
}

/// Unions two lists, appending overlay values and deduplicating while
/// preserving first appearance.
fn union_preserving_order<T: Clone + PartialEq>(base: &[T], overlay: &[T]) -> Vec<T> {
    let mut union = base.to_vec();
    for value in overlay {
        if !union.contains(value) {
            union.push(value.clone());
        }
    }
    union
}
