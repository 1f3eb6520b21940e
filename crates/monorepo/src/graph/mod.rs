//! Typed, queryable project graph.
//!
//! The project graph is built once from the inference result (with the
//! workspace's `targetDefaults` folded into every project) and is read-only
//! afterwards. Cycles are allowed in the graph itself — they surface when a
//! traversal that requires an order ([`ProjectGraph::topological_sort`])
//! encounters them.

mod builder;
mod project_graph;
mod types;
mod visualization;

#[cfg(test)]
mod tests;

pub use builder::build_project_graph;
pub use project_graph::ProjectGraph;
pub use types::{DependencyType, ProjectGraphEdge, ProjectGraphNode};
pub use visualization::{generate_dot, DotOptions};
