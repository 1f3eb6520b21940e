//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The forge build orchestrator.
#[derive(Debug, Parser)]
#[command(name = "forge", version, about = "Monorepo build orchestrator")]
pub struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Stream task output line-by-line and raise log verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one or more targets across the workspace
    Run {
        /// Target names to run (e.g. `build`, `test`)
        #[arg(required = true)]
        targets: Vec<String>,

        /// Restrict execution to the given projects (repeatable)
        #[arg(long = "project")]
        projects: Vec<String>,

        /// Maximum number of tasks in flight within a layer
        #[arg(long)]
        parallel: Option<usize>,
    },

    /// List the inferred projects
    Projects,

    /// Print the project dependency graph
    Graph {
        /// Emit GraphViz DOT instead of plain edges
        #[arg(long)]
        dot: bool,
    },
}
