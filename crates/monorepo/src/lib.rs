#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::panic)]

//! # Forge Monorepo Tools
//!
//! The core of the forge build orchestrator. Given a workspace of
//! heterogeneous projects, this crate infers a typed project graph from
//! marker files, expands requested targets into a lifecycle-aware task
//! graph, and executes the resulting DAG of shell commands in topological
//! layers.
//!
//! ## Pipeline
//!
//! ```text
//! workspace root
//!   │  FileMatcher resolves each plugin's glob
//!   ▼
//! plugins ── create_nodes / create_dependencies ──► InferenceResult
//!   │                                                 (projects, edges)
//!   ▼
//! ProjectGraph ── targetDefaults applied, edges validated
//!   │
//!   ▼
//! TaskGraphBuilder ── lifecycle prerequisites, dependsOn, phase rules
//!   │
//!   ▼
//! ExecutionPlanner ── topological layers, bounded parallelism, fail-fast
//!   │
//!   ▼
//! ExecutionResults (per-task exit codes and captured output)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use forge_monorepo_tools::lifecycle::LifecycleConfig;
//! use forge_monorepo_tools::plugins::PluginRegistry;
//! use forge_monorepo_tools::tasks::{ExecutionPlanner, TaskGraphBuilder, TaskRequest};
//! use forge_monorepo_tools::workspace::Workspace;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = Workspace::discover(Path::new("/repo"))?;
//! let registry = PluginRegistry::with_builtin_plugins()?;
//! let graph = workspace.project_graph(&registry)?;
//!
//! let lifecycle = LifecycleConfig::default();
//! let tasks = TaskGraphBuilder::new(&graph, &lifecycle)
//!     .build(&TaskRequest::new(["build"]))?;
//!
//! let results = ExecutionPlanner::new()
//!     .execute(&tasks, &graph, workspace.root(), false)
//!     .await?;
//! println!("{} succeeded, {} failed", results.success_count, results.failure_count);
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod graph;
pub mod inference;
pub mod lifecycle;
pub mod plugins;
pub mod project;
pub mod tasks;
pub mod workspace;

// Essential result and error types
pub use crate::error::{Error, Result};

// Workspace configuration and facade
pub use crate::config::WorkspaceConfig;
pub use crate::workspace::Workspace;

// Project model
pub use crate::project::{DependencyRef, ProjectConfiguration, ProjectType, TargetConfiguration};

// Inference
pub use crate::inference::{InferenceEngine, InferenceResult};
pub use crate::plugins::{PluginRegistry, WorkspacePlugin};

// Graphs
pub use crate::graph::{build_project_graph, DependencyType, ProjectGraph, ProjectGraphEdge};

// Lifecycle
pub use crate::lifecycle::{LifecycleConfig, PhaseCondition, PhaseMatchingRule};

// Tasks and execution
pub use crate::tasks::{
    ExecutionPlanner, ExecutionResults, ShellTaskExecutor, Task, TaskExecution, TaskExecutor,
    TaskGraph, TaskGraphBuilder, TaskRequest, TaskStatus,
};
