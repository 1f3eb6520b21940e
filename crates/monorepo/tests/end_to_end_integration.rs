//! End-to-end scenarios: real workspaces on disk, the full pipeline from
//! inference through layered execution.

use forge_monorepo_tools::config::WorkspaceConfig;
use forge_monorepo_tools::graph::build_project_graph;
use forge_monorepo_tools::inference::InferenceEngine;
use forge_monorepo_tools::lifecycle::LifecycleConfig;
use forge_monorepo_tools::plugins::PluginRegistry;
use forge_monorepo_tools::project::ProjectType;
use forge_monorepo_tools::tasks::{ExecutionPlanner, TaskGraphBuilder, TaskRequest, TaskStatus};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// The workspace from the classic two-package monorepo: an app depending on
/// a library, both inferred from `package.json` manifests.
fn npm_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "apps/web/package.json",
        r#"{"name": "web", "scripts": {"build": "tsc"}, "dependencies": {"util": "*"}}"#,
    );
    write(
        dir.path(),
        "libs/util/package.json",
        r#"{"name": "util", "scripts": {"build": "tsc"}}"#,
    );
    dir
}

/// A workspace of `project.json` projects whose targets run real shell
/// commands, suitable for execution tests.
fn shell_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "apps/web/project.json",
        r#"{
            "name": "web",
            "projectType": "application",
            "implicitDependencies": ["util"],
            "targets": {
                "compile": {"options": {"commands": ["echo compiling web"]}},
                "test": {"options": {"commands": ["echo testing web"]}},
                "package": {"options": {"commands": ["echo packaging web"]}}
            }
        }"#,
    );
    write(
        dir.path(),
        "libs/util/project.json",
        r#"{
            "name": "util",
            "targets": {
                "compile": {"options": {"commands": ["echo compiling util"]}},
                "test": {"options": {"commands": ["echo testing util"]}},
                "package": {"options": {"commands": ["echo packaging util"]}}
            }
        }"#,
    );
    dir
}

fn infer(root: &Path, config: &WorkspaceConfig) -> forge_monorepo_tools::inference::InferenceResult {
    let registry = PluginRegistry::with_builtin_plugins().unwrap();
    let registrations = registry.resolve(config).unwrap();
    InferenceEngine::new(root, config).run(&registrations).unwrap()
}

#[test]
fn infers_the_two_package_monorepo() {
    let dir = npm_workspace();
    let config = WorkspaceConfig::default();

    let inference = infer(dir.path(), &config);
    let graph = build_project_graph(&inference, &config).unwrap();

    assert_eq!(graph.project_count(), 2);

    let web = graph.get_project("web").unwrap();
    assert_eq!(web.project_type, ProjectType::Application);
    assert_eq!(web.config.root, "apps/web");
    assert!(web.config.has_target("build"));

    let util = graph.get_project("util").unwrap();
    assert_eq!(util.project_type, ProjectType::Library);
    assert!(util.config.has_target("build"));

    let deps = graph.get_dependencies("web");
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].target, "util");
}

#[test]
fn target_defaults_from_forge_json_wire_cross_project_builds() {
    let dir = npm_workspace();
    write(
        dir.path(),
        "forge.json",
        r#"{"version": 1, "targetDefaults": {"build": {"dependsOn": ["^build"], "cache": true}}}"#,
    );

    let config = WorkspaceConfig::load(dir.path()).unwrap();
    let inference = infer(dir.path(), &config);
    let graph = build_project_graph(&inference, &config).unwrap();

    let lifecycle = LifecycleConfig::default();
    let tasks =
        TaskGraphBuilder::new(&graph, &lifecycle).build(&TaskRequest::new(["build"])).unwrap();

    assert_eq!(tasks.task_count(), 2);
    let web_build = tasks.get_task("web:build").unwrap();
    assert_eq!(web_build.dependencies, BTreeSet::from(["util:build".to_string()]));
    assert!(web_build.cache);

    // web:build must land in a later layer than util:build.
    let layers = tasks.layers().unwrap();
    assert_eq!(layers, vec![vec!["util:build".to_string()], vec!["web:build".to_string()]]);
}

#[tokio::test]
async fn runs_the_lifecycle_expansion_end_to_end() {
    let dir = shell_workspace();
    let config = WorkspaceConfig::default();
    let inference = infer(dir.path(), &config);
    let graph = build_project_graph(&inference, &config).unwrap();

    // The implicit web -> util edge came from project.json.
    assert_eq!(graph.get_dependencies("web").len(), 1);

    let lifecycle = LifecycleConfig::default();
    let tasks = TaskGraphBuilder::new(&graph, &lifecycle)
        .build(&TaskRequest::new(["package"]).with_projects(["web"]))
        .unwrap();

    // Lifecycle expansion: package pulls in test and compile.
    let ids: Vec<&str> = tasks.tasks().keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["web:compile", "web:package", "web:test"]);

    let results =
        ExecutionPlanner::new().execute(&tasks, &graph, dir.path(), false).await.unwrap();

    assert_eq!(results.success_count, 3);
    assert_eq!(results.failure_count, 0);
    assert_eq!(results.results["web:package"].status, TaskStatus::Completed);
    assert_eq!(results.results["web:compile"].stdout, "compiling web");

    // Layering invariant over the executed graph.
    let layers = tasks.layers().unwrap();
    let layer_of =
        |id: &str| layers.iter().position(|layer| layer.iter().any(|l| l == id)).unwrap();
    for task in tasks.tasks().values() {
        for dependency in &task.dependencies {
            assert!(layer_of(dependency) < layer_of(&task.id));
        }
    }
}

#[tokio::test]
async fn affected_runs_touch_only_dependents() {
    let dir = shell_workspace();
    let config = WorkspaceConfig::default();
    let inference = infer(dir.path(), &config);
    let graph = build_project_graph(&inference, &config).unwrap();

    let lifecycle = LifecycleConfig::default();
    let tasks = TaskGraphBuilder::new(&graph, &lifecycle)
        .build(&TaskRequest::new(["compile"]).with_affected(["util"]))
        .unwrap();

    // util changed: both util itself and its dependent web compile.
    let ids: Vec<&str> = tasks.tasks().keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["util:compile", "web:compile"]);

    let results =
        ExecutionPlanner::new().execute(&tasks, &graph, dir.path(), false).await.unwrap();
    assert_eq!(results.success_count, 2);
}

#[test]
fn inference_and_planning_are_deterministic() {
    let dir = shell_workspace();
    let config = WorkspaceConfig::default();

    let first_inference = infer(dir.path(), &config);
    let second_inference = infer(dir.path(), &config);
    assert_eq!(first_inference.projects, second_inference.projects);
    assert_eq!(first_inference.edges, second_inference.edges);

    let lifecycle = LifecycleConfig::default();
    let first_graph = build_project_graph(&first_inference, &config).unwrap();
    let second_graph = build_project_graph(&second_inference, &config).unwrap();

    let request = TaskRequest::new(["package"]);
    let first_tasks =
        TaskGraphBuilder::new(&first_graph, &lifecycle).build(&request).unwrap();
    let second_tasks =
        TaskGraphBuilder::new(&second_graph, &lifecycle).build(&request).unwrap();

    assert_eq!(first_tasks.tasks(), second_tasks.tasks());
    assert_eq!(first_tasks.layers().unwrap(), second_tasks.layers().unwrap());
}

#[test]
fn docker_and_package_json_projects_merge_by_name() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "apps/api/package.json",
        r#"{"name": "api", "scripts": {"build": "tsc"}}"#,
    );
    write(dir.path(), "apps/api/Dockerfile", "FROM scratch\n");

    let config = WorkspaceConfig::default();
    let inference = infer(dir.path(), &config);
    let graph = build_project_graph(&inference, &config).unwrap();

    // One project carrying both plugins' targets.
    assert_eq!(graph.project_count(), 1);
    let api = graph.get_project("api").unwrap();
    assert!(api.config.has_target("build"));
    assert!(api.config.has_target("docker-build"));
}

#[test]
fn project_graph_cycles_survive_building_but_fail_ordering() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "libs/a/project.json",
        r#"{"name": "a", "implicitDependencies": ["b"], "targets": {"t": {"options": {"commands": ["true"]}}}}"#,
    );
    write(
        dir.path(),
        "libs/b/project.json",
        r#"{"name": "b", "implicitDependencies": ["a"], "targets": {"t": {"options": {"commands": ["true"]}}}}"#,
    );

    let config = WorkspaceConfig::default();
    let inference = infer(dir.path(), &config);
    let graph = build_project_graph(&inference, &config).unwrap();

    assert_eq!(graph.project_count(), 2);
    match graph.topological_sort() {
        Err(forge_monorepo_tools::error::Error::Cycle { path }) => {
            assert_eq!(path.first(), path.last());
            assert!(path.contains(&"a".to_string()));
            assert!(path.contains(&"b".to_string()));
        }
        other => panic!("expected a cycle error, got {other:?}"),
    }
}
