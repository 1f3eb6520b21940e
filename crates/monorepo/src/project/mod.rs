//! Project and target data model.
//!
//! The types in this module are produced by plugins during inference,
//! merged by the inference engine, and consumed read-only by every later
//! stage. A project is a named unit of code rooted somewhere in the
//! workspace; a target is a named action on a project bound to an executor
//! and an option map; a [`DependencyRef`] is the eagerly parsed form of a
//! target's `dependsOn` entry.

mod types;


pub use types::{DependencyRef, ProjectConfiguration, ProjectType, TargetConfiguration};
