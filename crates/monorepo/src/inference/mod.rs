//! Plugin-driven project inference.
//!
//! The inference engine drives the registered plugins over the workspace in
//! two phases: every plugin first synthesizes projects from its matched
//! marker files, then — once all projects are merged — contributes raw
//! dependency edges against the full project map. A failing plugin loses
//! its contribution for that phase; it never aborts inference.

mod engine;


pub use engine::{InferenceEngine, InferenceResult};
