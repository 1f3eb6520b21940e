//! Generate GraphViz DOT representations of the project graph.

use super::project_graph::ProjectGraph;
use crate::project::ProjectType;
use std::collections::HashSet;
use std::fmt::Write;

/// Options for generating DOT graph output
#[derive(Debug, Clone)]
pub struct DotOptions {
    /// Title of the graph
    pub title: String,
    /// Whether to highlight projects involved in dependency cycles
    pub highlight_cycles: bool,
    /// Whether to label edges with their dependency type
    pub label_edges: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self { title: "Project Graph".to_string(), highlight_cycles: true, label_edges: true }
    }
}

/// Node style definitions for the DOT output
#[derive(Debug, Clone, Copy)]
enum NodeStyle {
    /// Application project
    Application,
    /// Library project
    Library,
    /// Project that is part of a cycle
    Cycle,
}

impl NodeStyle {
    fn attributes(self) -> &'static str {
        match self {
            Self::Application => "[shape=box, style=filled, fillcolor=lightblue]",
            Self::Library => "[shape=box, style=filled, fillcolor=lightyellow]",
            Self::Cycle => "[shape=box, style=filled, fillcolor=lightcoral, penwidth=2]",
        }
    }
}

/// Generate the DOT form of a project graph.
///
/// # Examples
///
/// ```no_run
/// use forge_monorepo_tools::graph::{generate_dot, DotOptions};
///
/// # fn example(graph: &forge_monorepo_tools::graph::ProjectGraph) {
/// let dot = generate_dot(graph, &DotOptions::default()).unwrap_or_default();
/// println!("{dot}");
/// # }
/// ```
pub fn generate_dot(graph: &ProjectGraph, options: &DotOptions) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "digraph \"{}\" {{", options.title)?;
    writeln!(output, "  rankdir=LR;")?;
    writeln!(output, "  node [fontname=\"Helvetica\"];")?;
    writeln!(output, "  edge [fontname=\"Helvetica\"];")?;

    let nodes_in_cycles: HashSet<String> = if options.highlight_cycles {
        graph.find_cycle().unwrap_or_default().into_iter().collect()
    } else {
        HashSet::new()
    };

    writeln!(output, "  // Nodes")?;
    for node in graph.projects() {
        let style = if nodes_in_cycles.contains(node.name()) {
            NodeStyle::Cycle
        } else {
            match node.project_type {
                ProjectType::Application => NodeStyle::Application,
                ProjectType::Library => NodeStyle::Library,
            }
        };
        writeln!(output, "  \"{}\" {};", node.name(), style.attributes())?;
    }

    writeln!(output, "  // Edges")?;
    for node in graph.projects() {
        for edge in graph.get_dependencies(node.name()) {
            if options.label_edges {
                writeln!(
                    output,
                    "  \"{}\" -> \"{}\" [label=\"{}\"];",
                    edge.source, edge.target, edge.dependency_type
                )?;
            } else {
                writeln!(output, "  \"{}\" -> \"{}\";", edge.source, edge.target)?;
            }
        }
    }

    writeln!(output, "}}")?;
    Ok(output)
}
