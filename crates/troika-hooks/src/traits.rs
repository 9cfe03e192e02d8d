//! Closure-based hooks for quick hook kinds.

use std::sync::Arc;

use troika_core::result::AppResult;

use crate::hooks::definitions::{HookPayload, HookResult, Requirement};
use crate::hooks::registry::{Hook, HookFactory};

type HandlerFn = dyn Fn(&Requirement, &HookPayload) -> AppResult<HookResult> + Send + Sync;

/// A hook whose behaviour is a closure over its requirement.
pub struct ClosureHook {
    /// Hook kind name.
    name: String,
    /// Requirement the hook was built with.
    requirement: Requirement,
    /// Handler function.
    handler: Arc<HandlerFn>,
}

impl std::fmt::Debug for ClosureHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureHook")
            .field("name", &self.name)
            .field("requirement", &self.requirement)
            .field("handler", &"<closure>")
            .finish()
    }
}

impl ClosureHook {
    /// Creates a new closure-based hook.
    pub fn new<F>(name: &str, requirement: Requirement, handler: F) -> Self
    where
        F: Fn(&Requirement, &HookPayload) -> AppResult<HookResult> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            requirement,
            handler: Arc::new(handler),
        }
    }

    /// Builds a factory producing closure hooks that share `handler`.
    ///
    /// Construction never fails, whatever the requirement.
    pub fn factory<F>(name: &str, handler: F) -> HookFactory
    where
        F: Fn(&Requirement, &HookPayload) -> AppResult<HookResult> + Send + Sync + 'static,
    {
        let name = name.to_string();
        let handler: Arc<HandlerFn> = Arc::new(handler);
        Arc::new(
            move |requirement: &Requirement| -> AppResult<Box<dyn Hook>> {
                Ok(Box::new(ClosureHook {
                    name: name.clone(),
                    requirement: requirement.clone(),
                    handler: Arc::clone(&handler),
                }))
            },
        )
    }

    /// Requirement the hook was built with.
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

impl Hook for ClosureHook {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, payload: &HookPayload) -> AppResult<HookResult> {
        (self.handler)(&self.requirement, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::definitions::Phase;

    #[test]
    fn test_closure_sees_requirement_and_payload() {
        let hook = ClosureHook::new(
            "echo",
            Requirement::new(serde_yaml::Value::from("value")),
            |requirement, payload| {
                Ok(HookResult::continue_with_output(
                    "echo",
                    serde_json::json!({
                        "requirement": requirement.to_string(),
                        "site": payload.site,
                    }),
                ))
            },
        );

        let result = hook
            .handle(&HookPayload::new(Phase::AtStartup, "alpha"))
            .expect("handle");
        assert_eq!(
            result.output,
            Some(serde_json::json!({"requirement": "value", "site": "alpha"}))
        );
    }

    #[test]
    fn test_factory_binds_requirement() {
        let factory = ClosureHook::factory("echo", |requirement, _| {
            Ok(HookResult::continue_with_output(
                "echo",
                serde_json::json!(requirement.as_strings()),
            ))
        });
        let requirement = Requirement::new(serde_yaml::from_str("[a, b]").expect("yaml"));
        let hook = factory(&requirement).expect("construct");

        let result = hook
            .handle(&HookPayload::new(Phase::AtExit, "alpha"))
            .expect("handle");
        assert_eq!(hook.name(), "echo");
        assert_eq!(result.output, Some(serde_json::json!(["a", "b"])));
    }
}
