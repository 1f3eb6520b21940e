//! Tests for project graph construction and queries.

use super::*;
use crate::config::WorkspaceConfig;
use crate::error::Error;
use crate::inference::InferenceResult;
use crate::project::{DependencyRef, ProjectConfiguration, ProjectType, TargetConfiguration};
use serde_json::json;

fn inference_of(
    projects: Vec<ProjectConfiguration>,
    edges: Vec<ProjectGraphEdge>,
) -> InferenceResult {
    let mut inference = InferenceResult::default();
    for project in projects {
        inference.projects.insert(project.name.clone(), project);
    }
    inference.edges = edges;
    inference
}

fn simple_graph(edges: Vec<(&str, &str)>) -> ProjectGraph {
    let mut names: Vec<&str> = edges.iter().flat_map(|(s, t)| [*s, *t]).collect();
    names.sort_unstable();
    names.dedup();
    let projects = names.into_iter().map(|n| ProjectConfiguration::new(n, format!("libs/{n}")));
    let edges = edges
        .into_iter()
        .map(|(s, t)| ProjectGraphEdge::new(s, t, DependencyType::Static))
        .collect();
    build_project_graph(&inference_of(projects.collect(), edges), &WorkspaceConfig::default())
        .unwrap()
}

#[test]
fn nodes_record_the_project_type() {
    let projects = vec![
        ProjectConfiguration::new("web", "apps/web").with_project_type(ProjectType::Application),
        ProjectConfiguration::new("util", "libs/util"),
    ];
    let graph =
        build_project_graph(&inference_of(projects, vec![]), &WorkspaceConfig::default()).unwrap();

    assert!(graph.has_project("web"));
    assert_eq!(graph.get_project("web").unwrap().project_type, ProjectType::Application);
    assert_eq!(graph.get_projects_by_type(ProjectType::Application).len(), 1);
    assert_eq!(graph.get_projects_by_type(ProjectType::Library).len(), 1);
    assert_eq!(graph.project_count(), 2);
}

#[test]
fn tags_are_queryable() {
    let projects = vec![
        ProjectConfiguration::new("web", "apps/web").with_tag("scope:web").with_tag("team:ui"),
        ProjectConfiguration::new("util", "libs/util").with_tag("team:ui"),
    ];
    let graph =
        build_project_graph(&inference_of(projects, vec![]), &WorkspaceConfig::default()).unwrap();

    assert_eq!(graph.get_projects_by_tag("team:ui").len(), 2);
    assert_eq!(graph.get_projects_by_tag("scope:web").len(), 1);
    assert!(graph.get_projects_by_tag("missing").is_empty());
}

#[test]
fn dangling_self_and_duplicate_edges_are_dropped() {
    let projects = vec![
        ProjectConfiguration::new("a", "libs/a"),
        ProjectConfiguration::new("b", "libs/b"),
    ];
    let edges = vec![
        ProjectGraphEdge::new("a", "b", DependencyType::Static),
        ProjectGraphEdge::new("a", "b", DependencyType::Static), // duplicate
        ProjectGraphEdge::new("a", "b", DependencyType::Implicit), // distinct type survives
        ProjectGraphEdge::new("a", "a", DependencyType::Static), // self-edge
        ProjectGraphEdge::new("a", "ghost", DependencyType::Static), // dangling
        ProjectGraphEdge::new("ghost", "b", DependencyType::Static), // dangling
    ];
    let graph =
        build_project_graph(&inference_of(projects, edges), &WorkspaceConfig::default()).unwrap();

    let deps = graph.get_dependencies("a");
    assert_eq!(deps.len(), 2);
    assert!(deps.iter().all(|edge| edge.target == "b"));
}

#[test]
fn reserved_colon_in_names_is_a_config_error() {
    let projects = vec![ProjectConfiguration::new("bad:name", "libs/bad")];
    let result = build_project_graph(&inference_of(projects, vec![]), &WorkspaceConfig::default());
    assert!(matches!(result, Err(Error::Config(_))));

    let projects = vec![ProjectConfiguration::new("ok", "libs/ok")
        .with_target("bad:target", TargetConfiguration::default())];
    let result = build_project_graph(&inference_of(projects, vec![]), &WorkspaceConfig::default());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn transitive_queries_follow_edge_direction() {
    // web -> util -> base, api -> util
    let graph = simple_graph(vec![("web", "util"), ("util", "base"), ("api", "util")]);

    assert_eq!(graph.get_transitive_dependencies("web"), vec!["base", "util"]);
    assert_eq!(graph.get_transitive_dependencies("base"), Vec::<String>::new());
    assert_eq!(graph.get_transitive_dependents("base"), vec!["api", "util", "web"]);
    assert_eq!(graph.get_transitive_dependents("web"), Vec::<String>::new());
    assert_eq!(graph.get_transitive_dependencies("nonexistent"), Vec::<String>::new());
}

#[test]
fn transitive_queries_terminate_on_cycles() {
    let graph = simple_graph(vec![("a", "b"), ("b", "a")]);

    assert_eq!(graph.get_transitive_dependencies("a"), vec!["b"]);
    assert_eq!(graph.get_transitive_dependents("a"), vec!["b"]);
}

#[test]
fn topological_sort_layers_dependencies_first() {
    let graph = simple_graph(vec![("web", "util"), ("util", "base"), ("api", "util")]);

    let layers = graph.topological_sort().unwrap();
    assert_eq!(
        layers,
        vec![
            vec!["base".to_string()],
            vec!["util".to_string()],
            vec!["api".to_string(), "web".to_string()],
        ]
    );
}

#[test]
fn cyclic_graphs_build_but_fail_topological_sort() {
    // Cycles are allowed in the project graph for reporting; ordering
    // operations surface them.
    let graph = simple_graph(vec![("a", "b"), ("b", "a")]);

    match graph.topological_sort() {
        Err(Error::Cycle { path }) => {
            assert_eq!(path.len(), 3);
            assert_eq!(path.first(), path.last());
            assert!(path.contains(&"a".to_string()));
            assert!(path.contains(&"b".to_string()));
        }
        other => panic!("expected cycle error, got {other:?}"),
    }
}

mod visualization_tests {
    use super::*;

    #[test]
    fn dot_output_lists_nodes_and_edges() {
        let graph = simple_graph(vec![("web", "util")]);
        let dot = generate_dot(&graph, &DotOptions::default()).unwrap();

        assert!(dot.starts_with("digraph \"Project Graph\" {"));
        assert!(dot.contains("\"web\""));
        assert!(dot.contains("\"util\""));
        assert!(dot.contains("\"web\" -> \"util\" [label=\"static\"];"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn cycle_members_are_highlighted() {
        let graph = simple_graph(vec![("a", "b"), ("b", "a")]);
        let dot = generate_dot(&graph, &DotOptions::default()).unwrap();

        assert!(dot.contains("lightcoral"));
    }

    #[test]
    fn edge_labels_can_be_disabled() {
        let graph = simple_graph(vec![("web", "util")]);
        let options = DotOptions { label_edges: false, ..DotOptions::default() };
        let dot = generate_dot(&graph, &options).unwrap();

        assert!(dot.contains("\"web\" -> \"util\";"));
        assert!(!dot.contains("label=\"static\""));
    }
}

mod target_defaults {
    use super::*;

    fn graph_with_defaults(
        project_target: TargetConfiguration,
        default_target: TargetConfiguration,
    ) -> ProjectGraph {
        let mut config = WorkspaceConfig::default();
        config.target_defaults.insert("build".to_string(), default_target);

        let projects =
            vec![ProjectConfiguration::new("web", "apps/web").with_target("build", project_target)];
        build_project_graph(&inference_of(projects, vec![]), &config).unwrap()
    }

    fn resolved_build(graph: &ProjectGraph) -> &TargetConfiguration {
        &graph.get_project("web").unwrap().config.targets["build"]
    }

    #[test]
    fn project_values_win_field_by_field() {
        let mut default_target = TargetConfiguration::default();
        default_target.executor = Some("forge:run-commands".to_string());
        default_target.cache = Some(true);
        default_target.parallelism = Some(false);

        let mut project_target = TargetConfiguration::run_commands(["tsc"]);
        project_target.cache = Some(false);

        let graph = graph_with_defaults(project_target, default_target);
        let build = resolved_build(&graph);

        // The project declared an executor, so it wins; its cache value
        // wins; the default fills in parallelism.
        assert_eq!(build.executor.as_deref(), Some("run-commands"));
        assert_eq!(build.cache, Some(false));
        assert_eq!(build.parallelism, Some(false));
    }

    #[test]
    fn absent_project_fields_take_the_default() {
        let mut default_target = TargetConfiguration::default();
        default_target.executor = Some("run-commands".to_string());
        default_target.cache = Some(true);

        let graph = graph_with_defaults(TargetConfiguration::default(), default_target);
        let build = resolved_build(&graph);

        assert_eq!(build.executor.as_deref(), Some("run-commands"));
        assert_eq!(build.cache, Some(true));
    }

    #[test]
    fn list_fields_union_with_project_values_appended() {
        let mut default_target = TargetConfiguration::default();
        default_target.depends_on = vec![DependencyRef::UpstreamOf { target: "build".to_string() }];
        default_target.inputs = vec!["default".to_string(), "shared".to_string()];
        default_target.outputs = vec!["dist".to_string()];

        let mut project_target = TargetConfiguration::default();
        project_target.depends_on = vec![
            DependencyRef::UpstreamOf { target: "build".to_string() },
            DependencyRef::Local { target: "codegen".to_string() },
        ];
        project_target.inputs = vec!["shared".to_string(), "production".to_string()];

        let graph = graph_with_defaults(project_target, default_target);
        let build = resolved_build(&graph);

        assert_eq!(
            build.depends_on,
            vec![
                DependencyRef::UpstreamOf { target: "build".to_string() },
                DependencyRef::Local { target: "codegen".to_string() },
            ]
        );
        assert_eq!(build.inputs, vec!["default", "shared", "production"]);
        assert_eq!(build.outputs, vec!["dist"]);
    }

    #[test]
    fn options_deep_merge_with_project_winning() {
        let default_target: TargetConfiguration = serde_json::from_value(json!({
            "options": {
                "commands": ["default build"],
                "env": {"NODE_ENV": "production", "CI": "true"}
            },
            "configurations": {"ci": {"verbose": true}}
        }))
        .unwrap();

        let project_target: TargetConfiguration = serde_json::from_value(json!({
            "options": {
                "commands": ["project build"],
                "env": {"NODE_ENV": "development"}
            },
            "configurations": {"ci": {"parallel": false}, "local": {"watch": true}}
        }))
        .unwrap();

        let graph = graph_with_defaults(project_target, default_target);
        let build = resolved_build(&graph);

        assert_eq!(build.command_list(), vec!["project build".to_string()]);
        let env = build.env();
        assert_eq!(env.get("NODE_ENV").map(String::as_str), Some("development"));
        assert_eq!(env.get("CI").map(String::as_str), Some("true"));

        assert_eq!(build.configurations["ci"].get("verbose"), Some(&json!(true)));
        assert_eq!(build.configurations["ci"].get("parallel"), Some(&json!(false)));
        assert_eq!(build.configurations["local"].get("watch"), Some(&json!(true)));
    }

    #[test]
    fn defaults_only_apply_to_matching_target_names() {
        let mut config = WorkspaceConfig::default();
        let mut default_target = TargetConfiguration::default();
        default_target.cache = Some(true);
        config.target_defaults.insert("build".to_string(), default_target);

        let projects = vec![ProjectConfiguration::new("web", "apps/web")
            .with_target("lint", TargetConfiguration::run_commands(["eslint ."]))];
        let graph = build_project_graph(&inference_of(projects, vec![]), &config).unwrap();

        let lint = &graph.get_project("web").unwrap().config.targets["lint"];
        assert_eq!(lint.cache, None);
    }
}
