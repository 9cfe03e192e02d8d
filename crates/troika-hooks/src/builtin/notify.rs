//! `notify`: reports job completion to a list of recipients at exit.
//!
//! ```yaml
//! sites:
//!   alpha:
//!     notify: [user@example.com]
//! ```
//!
//! Message transport belongs to the submission workflow; this hook decides
//! who is told and what the notification contains.

use serde_json::json;
use tracing::info;

use crate::prelude::*;

/// Hook kind name.
pub const NAME: &str = "notify";

crate::hook_module!(MODULE, NAME, register);

/// Registers the `notify` hook kind.
pub fn register(registry: &mut HookRegistry) -> AppResult<()> {
    registry.register(
        HookSpec::new(NAME, &[Phase::AtExit], build)
            .with_description("Notify recipients when a job exits"),
    )
}

fn build(requirement: &Requirement) -> AppResult<Box<dyn Hook>> {
    Ok(Box::new(Notify::from_requirement(requirement)?))
}

/// The `notify` hook.
#[derive(Debug, Clone)]
pub struct Notify {
    /// Recipient addresses.
    recipients: Vec<String>,
}

impl Notify {
    /// Builds the hook from a list of addresses.
    pub fn from_requirement(requirement: &Requirement) -> AppResult<Self> {
        let recipients = super::string_list(NAME, requirement)?;
        if let Some(bad) = recipients.iter().find(|r| !r.contains('@')) {
            return Err(AppError::configuration(format!(
                "Hook '{NAME}': '{bad}' is not an e-mail address"
            )));
        }
        Ok(Self { recipients })
    }

    /// Recipient addresses.
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }
}

impl Hook for Notify {
    fn name(&self) -> &str {
        NAME
    }

    fn handle(&self, payload: &HookPayload) -> AppResult<HookResult> {
        let status = payload.get_data("status").cloned();
        let job = payload.get_data("job").cloned();

        info!(
            site = %payload.site,
            recipients = %self.recipients.join(", "),
            status = ?status,
            "Sending job notification"
        );

        Ok(HookResult::continue_with_output(
            NAME,
            json!({
                "recipients": self.recipients,
                "site": payload.site,
                "status": status,
                "job": job,
            }),
        ))
    }
}
