//! Task graph construction from requested targets.

use super::graph::TaskGraph;
use super::task::Task;
use crate::error::Result;
use crate::graph::ProjectGraph;
use crate::lifecycle::LifecycleConfig;
use crate::project::DependencyRef;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// What to run: requested target names, an optional restriction to a
/// project subset, and an optional affected set.
///
/// When an affected set is given, the initial project set is the affected
/// projects plus their transitive dependents, intersected with the
/// restriction.
#[derive(Debug, Clone, Default)]
pub struct TaskRequest {
    /// Target names to run
    pub targets: Vec<String>,
    /// Restriction to a subset of projects
    pub projects: Option<BTreeSet<String>>,
    /// Projects affected by a change, expanded to their dependents
    pub affected: Option<BTreeSet<String>>,
}

impl TaskRequest {
    /// Creates a request for the given targets across all projects.
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            projects: None,
            affected: None,
        }
    }

    /// Restricts the request to the given projects.
    #[must_use]
    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects = Some(projects.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the affected project set.
    #[must_use]
    pub fn with_affected<I, S>(mut self, affected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected = Some(affected.into_iter().map(Into::into).collect());
        self
    }
}

/// Expands a [`TaskRequest`] into an acyclic [`TaskGraph`].
///
/// Construction proceeds in four steps:
///
/// 1. every `(candidate project, requested target)` pair that exists
///    becomes a task, transitively expanded with its lifecycle
///    prerequisites;
/// 2. local edges connect each task to its prerequisite tasks within the
///    same project;
/// 3. `dependsOn` references add cross-project and local edges,
///    synthesizing missing tasks (with their own prerequisite expansion)
///    where the referenced target exists;
/// 4. phase-matching rules add cross-project edges into tasks that already
///    exist — rules never synthesize.
///
/// # Examples
///
/// ```no_run
/// use forge_monorepo_tools::lifecycle::LifecycleConfig;
/// use forge_monorepo_tools::tasks::{TaskGraphBuilder, TaskRequest};
///
/// # fn example(graph: &forge_monorepo_tools::graph::ProjectGraph)
/// # -> forge_monorepo_tools::error::Result<()> {
/// let lifecycle = LifecycleConfig::default();
/// let tasks = TaskGraphBuilder::new(graph, &lifecycle)
///     .build(&TaskRequest::new(["package"]).with_projects(["web"]))?;
/// println!("{} task(s)", tasks.task_count());
/// # Ok(())
/// # }
/// ```
pub struct TaskGraphBuilder<'a> {
    project_graph: &'a ProjectGraph,
    lifecycle: &'a LifecycleConfig,
}

impl<'a> TaskGraphBuilder<'a> {
    /// Creates a builder over a project graph and lifecycle configuration.
    pub fn new(project_graph: &'a ProjectGraph, lifecycle: &'a LifecycleConfig) -> Self {
        Self { project_graph, lifecycle }
    }

    /// Builds the task graph for a request.
    ///
    /// Requested targets that exist in no candidate project produce a
    /// warning and contribute nothing; an entirely unknown request yields
    /// an empty graph, not an error.
    ///
    /// # Errors
    ///
    /// Returns a cycle error (with the offending path) when the expanded
    /// graph is cyclic.
    pub fn build(&self, request: &TaskRequest) -> Result<TaskGraph> {
        let candidates = self.candidate_projects(request);

        let mut tasks: BTreeMap<String, Task> = BTreeMap::new();
        let mut pending: VecDeque<String> = VecDeque::new();

        // Steps 1 and 2: requested tasks plus lifecycle expansion.
        for target in &request.targets {
            let mut matched = false;
            for project in &candidates {
                let node = match self.project_graph.get_project(project) {
                    Some(node) => node,
                    None => continue,
                };
                if node.config.has_target(target) {
                    matched = true;
                    self.create_with_prerequisites(project, target, &mut tasks, &mut pending);
                } else {
                    log::debug!("Project '{project}' has no target '{target}', skipping");
                }
            }
            if !matched {
                log::warn!("Requested target '{target}' does not exist in any selected project");
            }
        }

        // Step 3: dependsOn references, synthesizing where needed.
        while let Some(task_id) = pending.pop_front() {
            let Some(task) = tasks.get(&task_id) else { continue };
            let references = task.configuration.depends_on.clone();
            let project = task.project.clone();

            for reference in references {
                self.apply_depends_on(&task_id, &project, &reference, &mut tasks, &mut pending);
            }
        }

        // Step 4: phase-matching rules over the final task set.
        self.apply_phase_rules(&mut tasks);

        let graph = TaskGraph::from_tasks(tasks.into_values().collect());
        graph.ensure_acyclic()?;
        Ok(graph)
    }

    /// The ordered project set the request selects.
    fn candidate_projects(&self, request: &TaskRequest) -> Vec<String> {
        let mut selected: BTreeSet<String> = match &request.affected {
            Some(affected) => {
                let mut selected = BTreeSet::new();
                for project in affected {
                    if !self.project_graph.has_project(project) {
                        log::warn!("Affected project '{project}' is not in the graph, ignoring");
                        continue;
                    }
                    selected.insert(project.clone());
                    selected.extend(self.project_graph.get_transitive_dependents(project));
                }
                selected
            }
            None => self.project_graph.project_names().into_iter().collect(),
        };

        if let Some(restriction) = &request.projects {
            selected.retain(|project| restriction.contains(project));
        }

        selected.into_iter().collect()
    }

    /// Creates the task for `project:target` (if absent) along with its
    /// transitively expanded lifecycle prerequisites and local edges.
    ///
    /// Newly created tasks are queued for `dependsOn` processing.
    fn create_with_prerequisites(
        &self,
        project: &str,
        target: &str,
        tasks: &mut BTreeMap<String, Task>,
        pending: &mut VecDeque<String>,
    ) {
        let mut stack = vec![target.to_string()];

        while let Some(current) = stack.pop() {
            let task_id = Task::id_for(project, &current);
            if !tasks.contains_key(&task_id) {
                let Some(node) = self.project_graph.get_project(project) else { return };
                let Some(configuration) = node.config.targets.get(&current) else { continue };
                tasks.insert(task_id.clone(), Task::new(project, &current, configuration.clone()));
                pending.push_back(task_id.clone());
            }

            let Some(node) = self.project_graph.get_project(project) else { return };
            for prerequisite in self.lifecycle.expanded_prerequisites(&current) {
                if !node.config.has_target(&prerequisite) {
                    continue;
                }
                let prerequisite_id = Task::id_for(project, &prerequisite);
                if !tasks.contains_key(&prerequisite_id) {
                    stack.push(prerequisite.clone());
                }
                if let Some(task) = tasks.get_mut(&task_id) {
                    task.dependencies.insert(prerequisite_id);
                }
            }
        }
    }

    /// Applies one `dependsOn` reference of `task_id`.
    fn apply_depends_on(
        &self,
        task_id: &str,
        project: &str,
        reference: &DependencyRef,
        tasks: &mut BTreeMap<String, Task>,
        pending: &mut VecDeque<String>,
    ) {
        match reference {
            DependencyRef::UpstreamOf { target } => {
                let upstream: Vec<String> = self
                    .project_graph
                    .get_dependencies(project)
                    .iter()
                    .map(|edge| edge.target.clone())
                    .collect();
                for dependency_project in upstream {
                    self.add_task_edge(task_id, &dependency_project, target, tasks, pending);
                }
            }
            DependencyRef::Project { project: other, target } => {
                self.add_task_edge(task_id, other, target, tasks, pending);
            }
            DependencyRef::Local { target } => {
                self.add_task_edge(task_id, project, target, tasks, pending);
            }
        }
    }

    /// Adds an edge `task_id -> to_project:to_target`, synthesizing the
    /// referenced task (with prerequisite expansion) when the target exists
    /// in the referenced project.
    fn add_task_edge(
        &self,
        task_id: &str,
        to_project: &str,
        to_target: &str,
        tasks: &mut BTreeMap<String, Task>,
        pending: &mut VecDeque<String>,
    ) {
        let dependency_id = Task::id_for(to_project, to_target);
        if dependency_id == task_id {
            return;
        }

        if !tasks.contains_key(&dependency_id) {
            let exists = self
                .project_graph
                .get_project(to_project)
                .is_some_and(|node| node.config.has_target(to_target));
            if !exists {
                log::debug!(
                    "Dropping dependsOn '{dependency_id}' of task '{task_id}': no such target"
                );
                return;
            }
            self.create_with_prerequisites(to_project, to_target, tasks, pending);
        }

        if let Some(task) = tasks.get_mut(task_id) {
            task.dependencies.insert(dependency_id);
        }
    }

    /// Adds phase-matching edges into tasks that already exist.
    fn apply_phase_rules(&self, tasks: &mut BTreeMap<String, Task>) {
        let ids: Vec<String> = tasks.keys().cloned().collect();

        for task_id in ids {
            let Some(task) = tasks.get(&task_id) else { continue };
            let project = task.project.clone();
            let target = task.target.clone();

            let mut new_edges: Vec<String> = Vec::new();
            for rule in self.lifecycle.rules_for(&target) {
                if !rule.condition.matches(&target) {
                    continue;
                }
                for edge in self.project_graph.get_dependencies(&project) {
                    let upstream_id = Task::id_for(&edge.target, &rule.upstream_phase);
                    if upstream_id != task_id && tasks.contains_key(&upstream_id) {
                        new_edges.push(upstream_id);
                    }
                }
            }

            if let Some(task) = tasks.get_mut(&task_id) {
                task.dependencies.extend(new_edges);
            }
        }
    }
}
