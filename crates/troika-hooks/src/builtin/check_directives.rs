//! `check_directives`: refuses to submit jobs that do not set required
//! directives.
//!
//! The workflow passes the job's directives as the `directives` object of
//! the `pre_submit` payload.

use tracing::debug;

use crate::prelude::*;

/// Hook kind name.
pub const NAME: &str = "check_directives";

crate::hook_module!(MODULE, NAME, register);

/// Registers the `check_directives` hook kind.
pub fn register(registry: &mut HookRegistry) -> AppResult<()> {
    registry.register(
        HookSpec::new(NAME, &[Phase::PreSubmit], build)
            .with_description("Halt submission when required directives are missing"),
    )
}

fn build(requirement: &Requirement) -> AppResult<Box<dyn Hook>> {
    Ok(Box::new(CheckDirectives {
        required: super::string_list(NAME, requirement)?,
    }))
}

/// The `check_directives` hook.
#[derive(Debug, Clone)]
pub struct CheckDirectives {
    /// Directive names every job must set.
    required: Vec<String>,
}

impl CheckDirectives {
    /// Required directives missing from the payload, in requirement order.
    pub fn missing<'a>(&'a self, payload: &HookPayload) -> Vec<&'a str> {
        let directives = payload.get_data("directives").and_then(|v| v.as_object());
        self.required
            .iter()
            .filter(|name| !directives.is_some_and(|d| d.contains_key(name.as_str())))
            .map(String::as_str)
            .collect()
    }
}

impl Hook for CheckDirectives {
    fn name(&self) -> &str {
        NAME
    }

    fn handle(&self, payload: &HookPayload) -> AppResult<HookResult> {
        let missing = self.missing(payload);
        if missing.is_empty() {
            debug!(site = %payload.site, "All required directives present");
            return Ok(HookResult::continue_execution(NAME));
        }

        Ok(HookResult::halt(
            NAME,
            &format!("Missing required directives: {}", missing.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hook(required: &[&str]) -> CheckDirectives {
        CheckDirectives {
            required: required.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_all_present_continues() {
        let payload = HookPayload::new(Phase::PreSubmit, "alpha").with_data(
            "directives",
            json!({"output": "job.out", "job_name": "fc"}),
        );
        let result = hook(&["output", "job_name"]).handle(&payload).expect("handle");
        assert_eq!(result.action, HookAction::Continue);
    }

    #[test]
    fn test_missing_halts_with_names() {
        let payload = HookPayload::new(Phase::PreSubmit, "alpha")
            .with_data("directives", json!({"output": "job.out"}));
        let result = hook(&["output", "walltime", "queue"])
            .handle(&payload)
            .expect("handle");
        assert_eq!(
            result.action,
            HookAction::Halt {
                reason: "Missing required directives: walltime, queue".to_string()
            }
        );
    }

    #[test]
    fn test_no_directives_payload_misses_everything() {
        let payload = HookPayload::new(Phase::PreSubmit, "alpha");
        assert_eq!(hook(&["output"]).missing(&payload), vec!["output"]);
    }

    #[test]
    fn test_construction_rejects_nested_values() {
        let requirement = Requirement::new(serde_yaml::from_str("[[output]]").expect("yaml"));
        assert!(build(&requirement).is_err());
    }
}
