//! The `forge graph` command: print the project dependency graph.

use forge_monorepo_tools::error::{Error, Result};
use forge_monorepo_tools::graph::{generate_dot, DotOptions};
use forge_monorepo_tools::workspace::Workspace;

/// Prints the dependency edges, either as plain text or GraphViz DOT.
pub fn execute(workspace: &Workspace, dot: bool) -> Result<i32> {
    let graph = super::load_project_graph(workspace)?;

    if dot {
        let rendered = generate_dot(&graph, &DotOptions::default())
            .map_err(|error| Error::config(format!("Failed to render graph: {error}")))?;
        print!("{rendered}");
        return Ok(0);
    }

    for node in graph.projects() {
        let edges = graph.get_dependencies(node.name());
        if edges.is_empty() {
            println!("{}", node.name());
            continue;
        }
        for edge in edges {
            match &edge.source_file {
                Some(file) => {
                    println!(
                        "{} -> {}  ({}, via {file})",
                        edge.source, edge.target, edge.dependency_type
                    );
                }
                None => println!("{} -> {}  ({})", edge.source, edge.target, edge.dependency_type),
            }
        }
    }
    Ok(0)
}
