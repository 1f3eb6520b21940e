//! Lifecycle phases, prerequisites, and matching rules.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A named, ordered list of phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Lifecycle name (e.g. `build`, `release`)
    pub name: String,
    /// Phase names in execution order
    pub phases: Vec<String>,
}

impl Lifecycle {
    /// Creates a lifecycle from ordered phase names.
    pub fn new<I, S>(name: impl Into<String>, phases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { name: name.into(), phases: phases.into_iter().map(Into::into).collect() }
    }
}

/// Condition guarding a phase-matching rule, evaluated against the
/// downstream task's target name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseCondition {
    /// Rule always applies
    Always,
    /// Downstream target name contains the substring `integration`
    IfIntegrationTest,
    /// Downstream target embeds its dependencies (`package` or `build`)
    IfEmbedsDependency,
    /// Downstream target needs dependencies at runtime (`test` or `run`)
    IfRuntimeDependency,
    /// Rule never applies
    Never,
}

impl PhaseCondition {
    /// Evaluates the condition against the downstream task's target name.
    pub fn matches(self, downstream_target: &str) -> bool {
        match self {
            PhaseCondition::Always => true,
            PhaseCondition::IfIntegrationTest => downstream_target.contains("integration"),
            PhaseCondition::IfEmbedsDependency => {
                downstream_target == "package" || downstream_target == "build"
            }
            PhaseCondition::IfRuntimeDependency => {
                downstream_target == "test" || downstream_target == "run"
            }
            PhaseCondition::Never => false,
        }
    }
}

/// A cross-project rule: when the condition holds for a downstream task,
/// an edge is added to the upstream phase in each project dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseMatchingRule {
    /// The phase targeted in the upstream project
    pub upstream_phase: String,
    /// The guarding condition
    pub condition: PhaseCondition,
}

impl PhaseMatchingRule {
    /// Creates a rule.
    pub fn new(upstream_phase: impl Into<String>, condition: PhaseCondition) -> Self {
        Self { upstream_phase: upstream_phase.into(), condition }
    }
}

/// The full lifecycle configuration: lifecycles, prerequisites, and
/// phase-matching rules.
///
/// # Examples
///
/// ```
/// use forge_monorepo_tools::lifecycle::LifecycleConfig;
///
/// let lifecycle = LifecycleConfig::default();
///
/// // `test` requires `compile` within the same project.
/// assert_eq!(lifecycle.expanded_prerequisites("test"), vec!["compile".to_string()]);
///
/// // `package` pulls in everything ordered between its prerequisite and
/// // itself, so `test` runs too — but `clean` does not.
/// assert_eq!(
///     lifecycle.expanded_prerequisites("package"),
///     vec!["compile".to_string(), "test".to_string()]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifecycleConfig {
    /// Lifecycles, side-by-side
    lifecycles: Vec<Lifecycle>,
    /// Phase name → phases that must run before it within the same project
    prerequisites: BTreeMap<String, BTreeSet<String>>,
    /// Phase name → cross-project matching rules
    phase_matching_rules: BTreeMap<String, Vec<PhaseMatchingRule>>,
}

impl Default for LifecycleConfig {
    /// The default configuration: a single `build` lifecycle with
    /// `clean < compile < test < package < publish < deploy`, the standard
    /// prerequisites, and no phase-matching rules.
    fn default() -> Self {
        Self::empty()
            .with_lifecycle(Lifecycle::new(
                "build",
                ["clean", "compile", "test", "package", "publish", "deploy"],
            ))
            .with_prerequisite("test", "compile")
            .with_prerequisite("package", "compile")
            .with_prerequisite("publish", "package")
            .with_prerequisite("deploy", "publish")
    }
}

impl LifecycleConfig {
    /// Creates a configuration with no lifecycles, prerequisites, or rules.
    pub fn empty() -> Self {
        Self {
            lifecycles: Vec::new(),
            prerequisites: BTreeMap::new(),
            phase_matching_rules: BTreeMap::new(),
        }
    }

    /// Adds a lifecycle.
    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycles.push(lifecycle);
        self
    }

    /// Declares that `phase` requires `prerequisite` within the same project.
    #[must_use]
    pub fn with_prerequisite(
        mut self,
        phase: impl Into<String>,
        prerequisite: impl Into<String>,
    ) -> Self {
        self.prerequisites.entry(phase.into()).or_default().insert(prerequisite.into());
        self
    }

    /// Adds a phase-matching rule for `phase`.
    #[must_use]
    pub fn with_rule(mut self, phase: impl Into<String>, rule: PhaseMatchingRule) -> Self {
        self.phase_matching_rules.entry(phase.into()).or_default().push(rule);
        self
    }

    /// The configured lifecycles.
    pub fn lifecycles(&self) -> &[Lifecycle] {
        &self.lifecycles
    }

    /// Whether any lifecycle declares the given phase.
    pub fn is_phase(&self, name: &str) -> bool {
        self.position_of(name).is_some()
    }

    /// The order index of a phase within its lifecycle.
    pub fn phase_index(&self, name: &str) -> Option<usize> {
        self.position_of(name).map(|(_, index)| index)
    }

    /// The matching rules declared for a phase (empty when none).
    pub fn rules_for(&self, phase: &str) -> &[PhaseMatchingRule] {
        self.phase_matching_rules.get(phase).map_or(&[], Vec::as_slice)
    }

    /// The expanded prerequisite phases of `phase`, ordered by phase index.
    ///
    /// Each declared prerequisite in the same lifecycle contributes itself
    /// plus every phase ordered between it and `phase`; a declared
    /// prerequisite in another lifecycle (or outside any lifecycle)
    /// contributes only itself. Phases across lifecycles do not otherwise
    /// interact.
    pub fn expanded_prerequisites(&self, phase: &str) -> Vec<String> {
        let Some(declared) = self.prerequisites.get(phase) else {
            return Vec::new();
        };

        let own_position = self.position_of(phase);
        let mut expanded: Vec<String> = Vec::new();

        for prerequisite in declared {
            match (own_position, self.position_of(prerequisite)) {
                (Some((lifecycle, phase_index)), Some((other_lifecycle, start)))
                    if lifecycle == other_lifecycle && start < phase_index =>
                {
                    for interval_phase in &self.lifecycles[lifecycle].phases[start..phase_index] {
                        if !expanded.contains(interval_phase) {
                            expanded.push(interval_phase.clone());
                        }
                    }
                }
                _ => {
                    if !expanded.contains(prerequisite) {
                        expanded.push(prerequisite.clone());
                    }
                }
            }
        }

        // Order by phase index so local edges read naturally in logs.
        expanded.sort_by_key(|name| self.phase_index(name).unwrap_or(usize::MAX));
        expanded
    }

    /// Locates a phase: `(lifecycle index, phase index)`.
    fn position_of(&self, name: &str) -> Option<(usize, usize)> {
        for (lifecycle_index, lifecycle) in self.lifecycles.iter().enumerate() {
            if let Some(phase_index) = lifecycle.phases.iter().position(|phase| phase == name) {
                return Some((lifecycle_index, phase_index));
            }
        }
        None
    }
}
