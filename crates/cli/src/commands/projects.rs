//! The `forge projects` command: list the inferred projects.

use forge_monorepo_tools::error::Result;
use forge_monorepo_tools::workspace::Workspace;

/// Prints one line per project: name, type, root, and tags.
pub fn execute(workspace: &Workspace) -> Result<i32> {
    let graph = super::load_project_graph(workspace)?;

    if graph.project_count() == 0 {
        println!("No projects found under {}.", workspace.root().display());
        return Ok(0);
    }

    for node in graph.projects() {
        let tags = if node.config.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", node.config.tags.join(", "))
        };
        println!("{}  ({}, {}){tags}", node.name(), node.project_type, node.config.root);
    }
    Ok(0)
}
