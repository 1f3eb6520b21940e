//! Task dependency graph: layering and cycle detection.

use super::task::Task;
use crate::error::{Error, Result};
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap, HashSet};

/// An immutable graph of tasks keyed by task id.
///
/// Dependencies point from a task to the tasks that must reach a terminal
/// state first. Every dependency id is guaranteed to resolve to a task in
/// the same graph: ids that do not are pruned at construction with a logged
/// warning.
///
/// # Examples
///
/// ```no_run
/// use forge_monorepo_tools::tasks::TaskGraph;
///
/// # fn example(graph: &TaskGraph) -> forge_monorepo_tools::error::Result<()> {
/// for layer in graph.layers()? {
///     // Tasks within one layer have no mutual dependencies.
///     println!("{} task(s): {layer:?}", layer.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TaskGraph {
    /// The internal graph structure
    graph: DiGraph<String, ()>,

    /// All tasks by id
    tasks: BTreeMap<String, Task>,
}

impl TaskGraph {
    /// Builds a graph from tasks, pruning dependencies on unknown ids.
    pub fn from_tasks(task_list: Vec<Task>) -> Self {
        let mut tasks: BTreeMap<String, Task> = BTreeMap::new();
        for task in task_list {
            tasks.insert(task.id.clone(), task);
        }

        let known: HashSet<String> = tasks.keys().cloned().collect();
        for task in tasks.values_mut() {
            task.dependencies.retain(|dependency| {
                let keep = known.contains(dependency);
                if !keep {
                    log::warn!(
                        "Pruning dependency '{dependency}' of task '{}': no such task",
                        task.id
                    );
                }
                keep
            });
        }

        let mut graph = DiGraph::new();
        let mut node_indices: HashMap<String, NodeIndex> = HashMap::new();
        for id in tasks.keys() {
            let index = graph.add_node(id.clone());
            node_indices.insert(id.clone(), index);
        }
        for task in tasks.values() {
            let from = node_indices[&task.id];
            for dependency in &task.dependencies {
                let to = node_indices[dependency];
                // Dependency points at the task that must run first.
                graph.add_edge(from, to, ());
            }
        }

        Self { graph, tasks }
    }

    /// Looks up a task by id.
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// All tasks by id.
    pub fn tasks(&self) -> &BTreeMap<String, Task> {
        &self.tasks
    }

    /// Number of tasks in the graph.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the graph holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Fails with a cycle error (including the offending path) when the
    /// graph is cyclic.
    pub fn ensure_acyclic(&self) -> Result<()> {
        if algo::toposort(&self.graph, None).is_err() {
            let path = self.find_cycle().unwrap_or_default();
            return Err(Error::cycle(path));
        }
        Ok(())
    }

    /// Groups the tasks into execution layers.
    ///
    /// Layer 0 contains tasks with no dependencies; every later layer
    /// contains tasks whose dependencies all live in earlier layers. Tasks
    /// within a layer are ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a cycle error when layering stalls with tasks remaining.
    pub fn layers(&self) -> Result<Vec<Vec<String>>> {
        let mut layers = Vec::new();
        let mut resolved: HashSet<&str> = HashSet::new();

        while resolved.len() < self.tasks.len() {
            let ready: Vec<&str> = self
                .tasks
                .values()
                .filter(|task| {
                    !resolved.contains(task.id.as_str())
                        && task.dependencies.iter().all(|dep| resolved.contains(dep.as_str()))
                })
                .map(|task| task.id.as_str())
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

    /// Finds one dependency cycle as a path with the entry repeated at the
    /// end (e.g. `["a:t", "b:t", "a:t"]`).
    fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks: HashMap<&str, Mark> =
            self.tasks.keys().map(|id| (id.as_str(), Mark::Unvisited)).collect();

        for start in self.tasks.keys() {
            if marks.get(start.as_str()) != Some(&Mark::Unvisited) {
                continue;
            }

            let mut path: Vec<&str> = vec![start.as_str()];
            let mut stack: Vec<(&str, Vec<&str>, usize)> = vec![(
                start.as_str(),
                self.dependency_ids(start),
                0,
            )];
            marks.insert(start.as_str(), Mark::InProgress);

            while let Some(top) = stack.last_mut() {
                let name = top.0;
                let next = top.2;
                top.2 += 1;

                if next < top.1.len() {
                    let dependency = top.1[next];
                    match marks.get(dependency).copied() {
                        Some(Mark::InProgress) => {
                            let entry = path.iter().position(|&n| n == dependency).unwrap_or(0);
                            let mut cycle: Vec<String> =
                                path[entry..].iter().map(ToString::to_string).collect();
                            cycle.push(dependency.to_string());
                            return Some(cycle);
                        }
                        Some(Mark::Unvisited) => {
                            marks.insert(dependency, Mark::InProgress);
                            path.push(dependency);
                            stack.push((dependency, self.dependency_ids(dependency), 0));
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

    /// The dependency ids of a task, borrowed from the task map.
    fn dependency_ids(&self, id: &str) -> Vec<&str> {
        self.tasks
            .get(id)
            .map(|task| task.dependencies.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
