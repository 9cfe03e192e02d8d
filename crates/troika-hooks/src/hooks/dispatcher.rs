//! Hook dispatcher: invokes a site's live hook instances at lifecycle phases.
//!
//! Only enabled instances subscribed to the fired phase run, in registry
//! order.
//!
//! For halting phases (`pre_submit`):
//! - If any hook returns `Halt` or fails, dispatch stops and the submission
//!   must be aborted.
//!
//! For the other phases (`at_startup`, `at_exit`):
//! - All subscribed hooks run regardless of individual results. Failures
//!   are logged and collected, so one broken hook does not starve the rest.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, warn};

use troika_core::error::AppError;
use troika_core::result::AppResult;

use super::definitions::{HookAction, HookPayload, HookResult, Phase, Requirement};
use super::registry::{Hook, HookSpec};

/// Lifecycle state of a hook instance. Never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    /// Bound to a requirement, not yet invoked.
    Instantiated,
    /// Invoked this many times.
    Invoked(usize),
}

/// A hook kind instantiated for one site.
#[derive(Debug)]
pub struct HookInstance {
    /// Hook kind name.
    name: String,
    /// Phases this instance subscribes to.
    phases: Vec<Phase>,
    /// Site-supplied requirement.
    requirement: Requirement,
    /// The live hook.
    hook: Box<dyn Hook>,
    /// Number of invocations so far.
    invocations: AtomicUsize,
}

impl HookInstance {
    /// Binds a constructed hook to its spec and requirement.
    ///
    /// The instance subscribes to the spec's phases, narrowed to the hook's
    /// own when it declares any.
    pub fn new(spec: &HookSpec, requirement: Requirement, hook: Box<dyn Hook>) -> Self {
        let phases = match hook.phases() {
            Some(own) => spec
                .phases
                .iter()
                .copied()
                .filter(|phase| own.contains(phase))
                .collect(),
            None => spec.phases.clone(),
        };

        Self {
            name: spec.name.clone(),
            phases,
            requirement,
            hook,
            invocations: AtomicUsize::new(0),
        }
    }

    /// Hook kind name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Phases this instance subscribes to.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Site-supplied requirement.
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// The underlying hook.
    pub fn hook(&self) -> &dyn Hook {
        self.hook.as_ref()
    }

    /// An instance is enabled when its requirement is non-empty.
    pub fn is_enabled(&self) -> bool {
        !self.requirement.is_empty()
    }

    /// Returns whether the instance subscribes to a phase.
    pub fn subscribes_to(&self, phase: Phase) -> bool {
        self.phases.contains(&phase)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HookState {
        match self.invocations.load(Ordering::Acquire) {
            0 => HookState::Instantiated,
            n => HookState::Invoked(n),
        }
    }

    fn invoke(&self, payload: &HookPayload) -> AppResult<HookResult> {
        self.invocations.fetch_add(1, Ordering::AcqRel);
        self.hook.handle(payload)
    }
}

/// A hook failure recorded during dispatch.
#[derive(Debug, Clone)]
pub struct HookFailure {
    /// Hook kind that failed.
    pub hook: String,
    /// The error it returned.
    pub error: AppError,
}

/// Aggregated result of dispatching a phase to all subscribed hooks.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    /// The phase that was fired.
    pub phase: Phase,
    /// Whether execution was halted.
    pub halted: bool,
    /// Halt reason (if halted).
    pub halt_reason: Option<String>,
    /// Hook that halted (if halted).
    pub halted_by: Option<String>,
    /// Results of hooks that returned normally.
    pub results: Vec<HookResult>,
    /// Hooks that returned an error.
    pub failures: Vec<HookFailure>,
}

impl DispatchResult {
    fn empty(phase: Phase) -> Self {
        Self {
            phase,
            halted: false,
            halt_reason: None,
            halted_by: None,
            results: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Names of the hooks that were invoked, in order.
    pub fn invoked(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.results.iter().map(|r| r.hook.as_str()).collect();
        names.extend(self.failures.iter().map(|f| f.hook.as_str()));
        names
    }
}

/// The live hook instances of one site, ready to be fired by the
/// submission workflow.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Site the hooks were set up for.
    site: String,
    /// One instance per registered hook kind, in registry order.
    instances: Vec<HookInstance>,
}

impl HookDispatcher {
    /// Creates a dispatcher over already built instances.
    pub fn new(site: impl Into<String>, instances: Vec<HookInstance>) -> Self {
        Self {
            site: site.into(),
            instances,
        }
    }

    /// Site the hooks were set up for.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// All instances, enabled or not, in registry order.
    pub fn instances(&self) -> &[HookInstance] {
        &self.instances
    }

    /// Gets an instance by hook kind name.
    pub fn get(&self, name: &str) -> Option<&HookInstance> {
        self.instances.iter().find(|i| i.name == name)
    }

    /// Enabled instances, in registry order.
    pub fn enabled(&self) -> impl Iterator<Item = &HookInstance> {
        self.instances.iter().filter(|i| i.is_enabled())
    }

    /// Names of the enabled hook kinds.
    pub fn enabled_names(&self) -> Vec<&str> {
        self.enabled().map(HookInstance::name).collect()
    }

    /// Fires a phase at every enabled hook subscribed to it.
    pub fn dispatch(&self, payload: &HookPayload) -> DispatchResult {
        let phase = payload.phase;
        let subscribers: Vec<&HookInstance> = self
            .enabled()
            .filter(|i| i.subscribes_to(phase))
            .collect();

        if subscribers.is_empty() {
            return DispatchResult::empty(phase);
        }

        debug!(
            phase = %phase,
            site = %self.site,
            hook_count = subscribers.len(),
            "Dispatching phase"
        );

        let can_halt = phase.can_halt();
        let mut dispatch = DispatchResult::empty(phase);

        for instance in subscribers {
            match instance.invoke(payload) {
                Ok(result) => {
                    match &result.action {
                        HookAction::Continue => {
                            debug!(phase = %phase, hook = %instance.name, "Hook returned Continue");
                        }
                        HookAction::Halt { reason } if can_halt => {
                            info!(
                                phase = %phase,
                                hook = %instance.name,
                                reason = %reason,
                                "Hook halted execution"
                            );
                            dispatch.halted = true;
                            dispatch.halt_reason = Some(reason.clone());
                            dispatch.halted_by = Some(instance.name.clone());
                            dispatch.results.push(result);
                            break;
                        }
                        HookAction::Halt { .. } => {
                            warn!(
                                phase = %phase,
                                hook = %instance.name,
                                "Hook returned Halt outside a halting phase, ignoring"
                            );
                        }
                    }
                    dispatch.results.push(result);
                }
                Err(e) if can_halt => {
                    info!(
                        phase = %phase,
                        hook = %instance.name,
                        error = %e,
                        "Hook failed, halting execution"
                    );
                    dispatch.halted = true;
                    dispatch.halt_reason = Some(e.message.clone());
                    dispatch.halted_by = Some(instance.name.clone());
                    dispatch.failures.push(HookFailure {
                        hook: instance.name.clone(),
                        error: e,
                    });
                    break;
                }
                Err(e) => {
                    warn!(
                        phase = %phase,
                        hook = %instance.name,
                        error = %e,
                        "Hook failed, continuing with remaining hooks"
                    );
                    dispatch.failures.push(HookFailure {
                        hook: instance.name.clone(),
                        error: e,
                    });
                }
            }
        }

        dispatch
    }

    /// Fires a phase and returns an error if it was halted.
    ///
    /// Use for `pre_submit`, where a halt must abort the submission.
    pub fn fire_or_halt(&self, payload: &HookPayload) -> AppResult<DispatchResult> {
        let result = self.dispatch(payload);

        if result.halted {
            let reason = result
                .halt_reason
                .clone()
                .unwrap_or_else(|| "Hook halted execution".to_string());
            let hook = result
                .halted_by
                .clone()
                .unwrap_or_else(|| "unknown".to_string());

            return Err(AppError::hook(format!(
                "Submission blocked by hook '{hook}': {reason}"
            )));
        }

        Ok(result)
    }

    /// Fires a phase without checking for halt (for `at_startup` / `at_exit`).
    pub fn fire_and_forget(&self, payload: &HookPayload) {
        let _ = self.dispatch(payload);
    }
}
