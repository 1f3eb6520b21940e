//! Command handlers.

mod graph;
mod projects;
mod run;

use crate::cli::{Cli, Command};
use forge_monorepo_tools::error::Result;
use forge_monorepo_tools::graph::ProjectGraph;
use forge_monorepo_tools::plugins::PluginRegistry;
use forge_monorepo_tools::workspace::Workspace;

/// Exit code reported when the user interrupts a run.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Exit code reported when any task fails.
pub const EXIT_TASK_FAILURE: i32 = 1;

/// Routes a parsed invocation to its handler, returning the exit code.
pub async fn dispatch(arguments: Cli) -> Result<i32> {
    let workspace = Workspace::discover(&arguments.root)?;

    match arguments.command {
        Command::Run { targets, projects, parallel } => {
            run::execute(&workspace, targets, projects, parallel, arguments.verbose).await
        }
        Command::Projects => projects::execute(&workspace),
        Command::Graph { dot } => graph::execute(&workspace, dot),
    }
}

/// Builds the project graph — the shared front half of every command.
fn load_project_graph(workspace: &Workspace) -> Result<ProjectGraph> {
    let registry = PluginRegistry::with_builtin_plugins()?;
    workspace.project_graph(&registry)
}
