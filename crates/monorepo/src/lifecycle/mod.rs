//! Lifecycle configuration: phase ordering, prerequisites, and
//! phase-matching rules.
//!
//! A lifecycle is a total order on a set of phase names (the default
//! `build` lifecycle orders `clean < compile < test < package < publish <
//! deploy`). Prerequisites say which earlier phases must run before a phase
//! within the same project; phase-matching rules add cross-project task
//! edges when a condition on the downstream task holds. Distinct
//! lifecycles live side-by-side; their phases do not interact unless a
//! rule says so.

mod config;


pub use config::{Lifecycle, LifecycleConfig, PhaseCondition, PhaseMatchingRule};
