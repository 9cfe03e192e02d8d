//! `trace`: logs the payload of selected lifecycle phases.

use serde_json::json;
use tracing::info;

use crate::prelude::*;

/// Hook kind name.
pub const NAME: &str = "trace";

crate::hook_module!(MODULE, NAME, register);

/// Registers the `trace` hook kind.
pub fn register(registry: &mut HookRegistry) -> AppResult<()> {
    registry.register(
        HookSpec::new(NAME, &Phase::ALL, build)
            .with_description("Log the payload of the listed lifecycle phases"),
    )
}

fn build(requirement: &Requirement) -> AppResult<Box<dyn Hook>> {
    let phases = super::string_list(NAME, requirement)?
        .iter()
        .map(|name| name.parse::<Phase>())
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Box::new(Trace { phases }))
}

/// The `trace` hook.
#[derive(Debug, Clone)]
pub struct Trace {
    /// Phases to trace.
    phases: Vec<Phase>,
}

impl Hook for Trace {
    fn name(&self) -> &str {
        NAME
    }

    fn phases(&self) -> Option<&[Phase]> {
        Some(&self.phases)
    }

    fn handle(&self, payload: &HookPayload) -> AppResult<HookResult> {
        if !self.phases.contains(&payload.phase) {
            return Ok(HookResult::continue_execution(NAME));
        }

        let mut keys: Vec<&str> = payload.data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        info!(
            phase = %payload.phase,
            site = %payload.site,
            keys = ?keys,
            "Lifecycle phase reached"
        );

        Ok(HookResult::continue_with_output(
            NAME,
            json!({ "phase": payload.phase.as_str() }),
        ))
    }
}
