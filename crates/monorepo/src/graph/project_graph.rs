//! The queryable project graph.

use super::types::{DependencyType, ProjectGraphEdge, ProjectGraphNode};
use crate::error::{Error, Result};
use crate::project::ProjectType;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Typed graph of projects and their dependencies.
///
/// Edges point from the depending project to the project it depends on.
/// The graph is immutable after construction and safe to share across the
/// planning and execution stages.
///
/// # Examples
///
/// ```no_run
/// use forge_monorepo_tools::graph::ProjectGraph;
///
/// # fn example(graph: &ProjectGraph) -> forge_monorepo_tools::error::Result<()> {
/// if let Some(web) = graph.get_project("web") {
///     println!("web lives in {}", web.config.root);
/// }
/// for dependency in graph.get_dependencies("web") {
///     println!("web -> {} ({})", dependency.target, dependency.dependency_type);
/// }
/// for layer in graph.topological_sort()? {
///     println!("layer: {layer:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    /// The internal graph structure; edge weights carry the dependency type
    graph: DiGraph<String, DependencyType>,

    /// Mapping from project names to their node indices
    node_indices: HashMap<String, NodeIndex>,

    /// All nodes by project name
    nodes: BTreeMap<String, ProjectGraphNode>,

    /// Outgoing edges by source project name
    edges: BTreeMap<String, Vec<ProjectGraphEdge>>,
}

impl ProjectGraph {
    /// Assembles a graph from validated nodes and edges.
    ///
    /// Callers are expected to have dropped dangling, self, and duplicate
    /// edges already (see [`build_project_graph`](super::build_project_graph)).
    pub(crate) fn from_parts(
        nodes: BTreeMap<String, ProjectGraphNode>,
        edge_list: Vec<ProjectGraphEdge>,
    ) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for name in nodes.keys() {
            let index = graph.add_node(name.clone());
            node_indices.insert(name.clone(), index);
        }

        let mut edges: BTreeMap<String, Vec<ProjectGraphEdge>> = BTreeMap::new();
        for edge in edge_list {
            let (Some(&source), Some(&target)) =
                (node_indices.get(&edge.source), node_indices.get(&edge.target))
            else {
                continue;
            };
            graph.add_edge(source, target, edge.dependency_type);
            edges.entry(edge.source.clone()).or_default().push(edge);
        }

        Self { graph, node_indices, nodes, edges }
    }

    /// Looks up a project by name.
    pub fn get_project(&self, name: &str) -> Option<&ProjectGraphNode> {
        self.nodes.get(name)
    }

    /// Whether the graph contains the named project.
    pub fn has_project(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Every project node, ordered by name.
    pub fn projects(&self) -> impl Iterator<Item = &ProjectGraphNode> {
        self.nodes.values()
    }

    /// Every project name, ordered.
    pub fn project_names(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Number of projects in the graph.
    pub fn project_count(&self) -> usize {
        self.nodes.len()
    }

    /// Projects carrying the given tag, ordered by name.
    pub fn get_projects_by_tag(&self, tag: &str) -> Vec<&ProjectGraphNode> {
        self.nodes.values().filter(|node| node.config.tags.iter().any(|t| t == tag)).collect()
    }

    /// Projects of the given type, ordered by name.
    pub fn get_projects_by_type(&self, project_type: ProjectType) -> Vec<&ProjectGraphNode> {
        self.nodes.values().filter(|node| node.project_type == project_type).collect()
    }

    /// Direct outgoing edges of the named project.
    pub fn get_dependencies(&self, name: &str) -> &[ProjectGraphEdge] {
        self.edges.get(name).map_or(&[], Vec::as_slice)
    }

    /// Every project reachable from `name` along dependency edges, sorted.
    ///
    /// Cycles are broken by stopping at already-visited nodes; reaching the
    /// starting project again is logged once.
    pub fn get_transitive_dependencies(&self, name: &str) -> Vec<String> {
        self.transitive(name, Direction::Outgoing)
    }

    /// Every project that transitively depends on `name`, sorted.
    pub fn get_transitive_dependents(&self, name: &str) -> Vec<String> {
        self.transitive(name, Direction::Incoming)
    }

    /// BFS over the graph in the given direction, excluding the start node.
    fn transitive(&self, name: &str, direction: Direction) -> Vec<String> {
        let Some(&start) = self.node_indices.get(name) else {
            return Vec::new();
        };

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut cycle_logged = false;
        visited.insert(start);
        queue.push_back(start);

        while let Some(index) = queue.pop_front() {
            for neighbor in self.graph.neighbors_directed(index, direction) {
                if neighbor == start && !cycle_logged {
                    cycle_logged = true;
                    log::warn!("Dependency cycle through project '{name}' detected during traversal");
                }
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited.remove(&start);
        let mut reachable: Vec<String> =
            visited.into_iter().map(|index| self.graph[index].clone()).collect();
        reachable.sort();
        reachable
    }

    /// Groups the projects into dependency layers.
    ///
    /// Layer 0 contains projects with no dependencies; every later layer
    /// contains projects whose dependencies all live in earlier layers.
    /// Projects within a layer are ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a cycle error (including the offending path) when the graph
    /// is cyclic.
    pub fn topological_sort(&self) -> Result<Vec<Vec<String>>> {
        let dependencies: BTreeMap<&str, HashSet<&str>> = self
            .nodes
            .keys()
            .map(|name| {
                let deps = self
                    .get_dependencies(name)
                    .iter()
                    .map(|edge| edge.target.as_str())
                    .collect();
                (name.as_str(), deps)
            })
            .collect();

        let mut layers = Vec::new();
        let mut resolved: HashSet<&str> = HashSet::new();

        while resolved.len() < dependencies.len() {
            let ready: Vec<&str> = dependencies
                .iter()
                .filter(|(name, deps)| {
                    !resolved.contains(*name) && deps.iter().all(|dep| resolved.contains(dep))
                })
                .map(|(name, _)| *name)
                .collect();

            if ready.is_empty() {
                let path = self.find_cycle().unwrap_or_default();
                return Err(Error::cycle(path));
            }

            resolved.extend(ready.iter().copied());
            layers.push(ready.into_iter().map(ToString::to_string).collect());
        }

        Ok(layers)
    }

    /// Finds one dependency cycle, returned as a path with the entry node
    /// repeated at the end (e.g. `["a", "b", "a"]`).
    pub(crate) fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks: HashMap<&str, Mark> =
            self.nodes.keys().map(|name| (name.as_str(), Mark::Unvisited)).collect();

        // Iterative DFS keeping the current path so the cycle can be
        // reconstructed once an in-progress node is re-entered.
        for start in self.nodes.keys() {
            if marks.get(start.as_str()) != Some(&Mark::Unvisited) {
                continue;
            }

            let mut path: Vec<&str> = vec![start.as_str()];
            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            marks.insert(start.as_str(), Mark::InProgress);

            while let Some(top) = stack.last_mut() {
                let name = top.0;
                let next = top.1;
                top.1 += 1;

                let deps = self.get_dependencies(name);
                if next < deps.len() {
                    let dep = deps[next].target.as_str();
                    match marks.get(dep).copied() {
                        Some(Mark::InProgress) => {
                            let entry = path.iter().position(|&n| n == dep).unwrap_or(0);
                            let mut cycle: Vec<String> =
                                path[entry..].iter().map(ToString::to_string).collect();
                            cycle.push(dep.to_string());
                            return Some(cycle);
                        }
                        Some(Mark::Unvisited) => {
                            marks.insert(dep, Mark::InProgress);
                            path.push(dep);
                            stack.push((dep, 0));
                        }
                        _ => {}
                    }
                } else {
                    marks.insert(name, Mark::Done);
                    path.pop();
                    stack.pop();
                }
            }
        }

        None
    }
}
