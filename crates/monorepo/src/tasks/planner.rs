//! Layered execution planning.

use super::executor::{ShellTaskExecutor, TaskExecutor};
use super::graph::TaskGraph;
use super::task::{TaskExecution, TaskStatus};
use crate::error::Result;
use crate::graph::ProjectGraph;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Aggregated results of one planned execution.
#[derive(Debug, Clone)]
pub struct ExecutionResults {
    /// Results by task id. Tasks in layers that never started (because an
    /// earlier layer failed) are absent — not marked skipped.
    pub results: BTreeMap<String, TaskExecution>,
    /// Wall-clock duration of the whole run
    pub total_duration: Duration,
    /// Number of tasks that completed successfully
    pub success_count: usize,
    /// Number of tasks that failed
    pub failure_count: usize,
}

impl ExecutionResults {
    /// Whether any executed task failed.
    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }
}

/// Drives a task graph to completion: topological layers, parallel workers
/// within each layer, a strict barrier between layers, and fail-fast at the
/// layer boundary (the failing layer completes; later layers never start).
///
/// # Examples
///
/// ```no_run
/// use forge_monorepo_tools::tasks::ExecutionPlanner;
/// use std::path::Path;
///
/// # async fn example(
/// #     tasks: &forge_monorepo_tools::tasks::TaskGraph,
/// #     graph: &forge_monorepo_tools::graph::ProjectGraph,
/// # ) -> forge_monorepo_tools::error::Result<()> {
/// let planner = ExecutionPlanner::new().with_max_parallel(4);
/// let results = planner.execute(tasks, graph, Path::new("/repo"), false).await?;
/// for (id, execution) in &results.results {
///     println!("{id}: {}", execution.status);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ExecutionPlanner {
    executor: Arc<dyn TaskExecutor>,
    max_parallel: usize,
}

impl ExecutionPlanner {
    /// Creates a planner with the built-in shell executor and one worker
    /// per CPU core.
    #[must_use]
    pub fn new() -> Self {
        Self::with_executor(Arc::new(ShellTaskExecutor::new()))
    }

    /// Creates a planner around a custom task executor.
    pub fn with_executor(executor: Arc<dyn TaskExecutor>) -> Self {
        Self { executor, max_parallel: num_cpus::get() }
    }

    /// Bounds the number of tasks in flight within a layer.
    #[must_use]
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Executes the task graph layer by layer.
    ///
    /// All dependencies of a task are guaranteed to have reached a terminal
    /// state before it is dispatched; no ordering holds among tasks within
    /// one layer. After a layer with a failure completes, later layers are
    /// not scheduled and their tasks are absent from the results.
    ///
    /// # Errors
    ///
    /// Returns a cycle error when the task graph cannot be layered. Task
    /// failures are not errors: they are reported in the results.
    pub async fn execute(
        &self,
        task_graph: &TaskGraph,
        project_graph: &ProjectGraph,
        workspace_root: &Path,
        verbose: bool,
    ) -> Result<ExecutionResults> {
        let started = Instant::now();
        let layers = task_graph.layers()?;

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let mut results = BTreeMap::new();
        let mut success_count = 0;
        let mut failure_count = 0;

        for (index, layer) in layers.iter().enumerate() {
            log::info!("Executing layer {}/{} ({} task(s))", index + 1, layers.len(), layer.len());

            let executions = layer.iter().filter_map(|id| task_graph.get_task(id)).map(|task| {
                let semaphore = Arc::clone(&semaphore);
                async move {
                    let _permit = semaphore.acquire().await.ok();
                    let execution = self
                        .executor
                        .execute_task(task, project_graph, workspace_root, verbose)
                        .await;
                    (task.id.clone(), execution)
                }
            });

            let mut layer_failed = false;
            for (id, execution) in futures::future::join_all(executions).await {
                match execution.status {
                    TaskStatus::Completed => {
                        success_count += 1;
                        log::info!("{id}: completed in {:?}", execution.duration());
                    }
                    TaskStatus::Failed => {
                        failure_count += 1;
                        layer_failed = true;
                        match &execution.error {
                            Some(error) => log::error!("{id}: failed ({error})"),
                            None => log::error!("{id}: failed (exit {})", execution.exit_code),
                        }
                    }
                    TaskStatus::Skipped => {
                        log::info!("{id}: skipped");
                    }
                }
                results.insert(id, execution);
            }

            if layer_failed {
                log::error!(
                    "Layer {} finished with failures; later layers will not run",
                    index + 1
                );
                break;
            }
        }

        Ok(ExecutionResults {
            results,
            total_duration: started.elapsed(),
            success_count,
            failure_count,
        })
    }
}

impl Default for ExecutionPlanner {
    fn default() -> Self {
        Self::new()
    }
}
