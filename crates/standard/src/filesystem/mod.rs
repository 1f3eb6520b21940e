//! # Workspace file matching
//!
//! ## What
//! This module resolves glob patterns against a workspace tree, returning
//! workspace-relative paths of the regular files that match. It is the
//! discovery primitive behind plugin-driven project inference.
//!
//! ## How
//! [`FileMatcher`] walks the workspace root with `walkdir` (symlinks are
//! never followed), prunes well-known VCS and build directories during the
//! walk, and matches the relativized path of each regular file against a
//! compiled `glob` pattern with literal path separators.
//!
//! ## Why
//! Project inference runs one pattern per plugin over potentially large
//! workspaces; pruning excluded directories at traversal time keeps the walk
//! proportional to the interesting part of the tree, and suppressing
//! per-directory I/O errors keeps a single unreadable entry from aborting
//! discovery.

mod matcher;

#[cfg(test)]
mod tests;

pub use matcher::{FileMatcher, DEFAULT_EXCLUDED_DIRS};
