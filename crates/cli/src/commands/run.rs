//! The `forge run` command: inference → graphs → layered execution.

use super::{EXIT_INTERRUPTED, EXIT_TASK_FAILURE};
use forge_monorepo_tools::error::Result;
use forge_monorepo_tools::lifecycle::LifecycleConfig;
use forge_monorepo_tools::tasks::{
    ExecutionPlanner, ShellTaskExecutor, TaskGraphBuilder, TaskRequest,
};
use forge_monorepo_tools::workspace::Workspace;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs the requested targets and reports the exit code.
pub async fn execute(
    workspace: &Workspace,
    targets: Vec<String>,
    projects: Vec<String>,
    parallel: Option<usize>,
    verbose: bool,
) -> Result<i32> {
    let graph = super::load_project_graph(workspace)?;

    let lifecycle = LifecycleConfig::default();
    let mut request = TaskRequest::new(targets);
    if !projects.is_empty() {
        request = request.with_projects(projects);
    }
    let tasks = TaskGraphBuilder::new(&graph, &lifecycle).build(&request)?;

    if tasks.is_empty() {
        println!("No tasks matched the request.");
        return Ok(0);
    }
    println!("Running {} task(s)...", tasks.task_count());

    // Ctrl-C propagates to every in-flight child through the token.
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(error) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("Could not install interrupt handler: {error}");
    }

    let executor = ShellTaskExecutor::new().with_cancellation_token(cancel.clone());
    let mut planner = ExecutionPlanner::with_executor(Arc::new(executor));
    if let Some(parallel) = parallel {
        planner = planner.with_max_parallel(parallel);
    }

    let results = planner.execute(&tasks, &graph, workspace.root(), verbose).await?;

    for (task_id, execution) in &results.results {
        let status = match &execution.error {
            Some(error) => format!("{} ({error})", execution.status),
            None => execution.status.to_string(),
        };
        println!("  {task_id}: {status}");
    }
    println!(
        "{} succeeded, {} failed, {} total in {:?}",
        results.success_count,
        results.failure_count,
        results.results.len(),
        results.total_duration
    );

    if cancel.is_cancelled() {
        return Ok(EXIT_INTERRUPTED);
    }
    if results.has_failures() {
        return Ok(EXIT_TASK_FAILURE);
    }
    Ok(0)
}
