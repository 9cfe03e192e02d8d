//! Hook registry: the catalog of hook kinds, in registration order.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use troika_core::error::AppError;
use troika_core::result::AppResult;

use super::definitions::{HookPayload, HookResult, Phase, Requirement};
use crate::discovery::{self, HookModule};

/// Trait for hook implementations.
pub trait Hook: Send + Sync + std::fmt::Debug {
    /// Returns the hook kind name.
    fn name(&self) -> &str;

    /// Phases this instance wants, when narrower than its spec's.
    ///
    /// `None` subscribes to every phase of the spec.
    fn phases(&self) -> Option<&[Phase]> {
        None
    }

    /// Handles a hook invocation.
    fn handle(&self, payload: &HookPayload) -> AppResult<HookResult>;
}

/// Builds a hook from a site-supplied requirement.
///
/// Must succeed for an empty requirement: that is the disabled state.
pub type HookFactory = Arc<dyn Fn(&Requirement) -> AppResult<Box<dyn Hook>> + Send + Sync>;

/// Describes one hook kind.
#[derive(Clone)]
pub struct HookSpec {
    /// Unique name, used as the key in site configuration blocks.
    pub name: String,
    /// Short human-readable description.
    pub description: String,
    /// Phases instances of this kind take part in.
    pub phases: Vec<Phase>,
    /// Constructor for instances.
    factory: HookFactory,
}

impl HookSpec {
    /// Creates a new hook spec.
    pub fn new<F>(name: impl Into<String>, phases: &[Phase], factory: F) -> Self
    where
        F: Fn(&Requirement) -> AppResult<Box<dyn Hook>> + Send + Sync + 'static,
    {
        Self::from_factory(name, phases, Arc::new(factory))
    }

    /// Creates a spec from an already shared factory.
    pub fn from_factory(name: impl Into<String>, phases: &[Phase], factory: HookFactory) -> Self {
        let mut phases = phases.to_vec();
        phases.sort();
        phases.dedup();
        Self {
            name: name.into(),
            description: String::new(),
            phases,
            factory,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns whether instances take part in a phase.
    pub fn participates_in(&self, phase: Phase) -> bool {
        self.phases.contains(&phase)
    }

    /// Builds an instance bound to a requirement.
    pub fn instantiate(&self, requirement: &Requirement) -> AppResult<Box<dyn Hook>> {
        (self.factory)(requirement)
    }
}

impl std::fmt::Debug for HookSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("phases", &self.phases)
            .field("factory", &"<factory>")
            .finish()
    }
}

/// Append-only registry of hook kinds.
///
/// Iteration follows registration order. Entries are never removed.
#[derive(Debug, Default)]
pub struct HookRegistry {
    /// Hook name → spec, in registration order.
    specs: IndexMap<String, HookSpec>,
    /// Whether module discovery has already run against this registry.
    discovered: bool,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook kind.
    ///
    /// Names are unique: a second registration under the same name is
    /// rejected with a `Conflict` error and the first one is kept.
    pub fn register(&mut self, spec: HookSpec) -> AppResult<()> {
        if self.specs.contains_key(&spec.name) {
            warn!(hook = %spec.name, "Rejected duplicate hook registration");
            return Err(AppError::conflict(format!(
                "Hook '{}' is already registered",
                spec.name
            )));
        }

        debug!(
            hook = %spec.name,
            phases = ?spec.phases,
            "Hook kind registered"
        );
        self.specs.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Populates the registry from a module namespace, once.
    ///
    /// Returns the number of hook kinds added. Calls after the first
    /// successful one return `Ok(0)` without touching the registry.
    ///
    /// Modules register into a staging copy that replaces the registry
    /// only once every module succeeded; a failed pass leaves the registry
    /// as it was.
    pub fn discover(&mut self, namespace: &[HookModule]) -> AppResult<usize> {
        if self.discovered {
            debug!("Hook modules already discovered, skipping");
            return Ok(0);
        }

        let mut staged = HookRegistry {
            specs: self.specs.clone(),
            discovered: false,
        };
        discovery::load_modules(namespace, &mut staged)?;

        let added = staged.specs.len() - self.specs.len();
        self.specs = staged.specs;
        self.discovered = true;
        Ok(added)
    }

    /// Returns whether discovery has completed.
    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    /// Gets a spec by name.
    pub fn get(&self, name: &str) -> Option<&HookSpec> {
        self.specs.get(name)
    }

    /// Checks whether a hook kind is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Returns the number of registered hook kinds.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns whether no hook kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Returns registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.specs.keys().map(String::as_str).collect()
    }

    /// Iterates over specs in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &HookSpec> {
        self.specs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ClosureHook;

    fn spec(name: &str) -> HookSpec {
        HookSpec::from_factory(
            name,
            &[Phase::AtExit],
            ClosureHook::factory(name, |_, payload| {
                Ok(HookResult::continue_execution(&payload.site))
            }),
        )
    }

    #[test]
    fn test_register_keeps_insertion_order() {
        let mut registry = HookRegistry::new();
        for name in ["zeta", "alpha", "mu"] {
            registry.register(spec(name)).expect("register");
        }
        assert_eq!(registry.names(), vec!["zeta", "alpha", "mu"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("alpha"));
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_duplicate_is_rejected_and_first_kept() {
        let mut registry = HookRegistry::new();
        registry
            .register(spec("notify").with_description("first"))
            .expect("first");

        let err = registry
            .register(spec("notify").with_description("second"))
            .expect_err("duplicate");
        assert_eq!(err.kind, troika_core::error::ErrorKind::Conflict);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("notify").map(|s| s.description.as_str()),
            Some("first")
        );
    }

    #[test]
    fn test_phases_are_normalised() {
        let spec = HookSpec::new(
            "trace",
            &[Phase::AtExit, Phase::AtStartup, Phase::AtExit],
            |_: &Requirement| Err(AppError::hook("unused")),
        );
        assert_eq!(spec.phases, vec![Phase::AtStartup, Phase::AtExit]);
        assert!(spec.participates_in(Phase::AtStartup));
        assert!(!spec.participates_in(Phase::PreSubmit));
    }

    #[test]
    fn test_instantiate_calls_factory() {
        let hook = spec("notify")
            .instantiate(&Requirement::empty())
            .expect("instantiate");
        assert_eq!(hook.name(), "notify");
    }
}
