//! Built-in hook modules.
//!
//! [`NAMESPACE`] lists them in discovery order; the registry keeps that
//! order, and so does every site's dispatcher.

pub mod check_directives;
pub mod notify;
pub mod trace;

use serde_yaml::Value;

use troika_core::error::AppError;
use troika_core::result::AppResult;

use crate::discovery::HookModule;
use crate::hooks::definitions::Requirement;

/// The built-in hook namespace.
pub const NAMESPACE: &[HookModule] = &[notify::MODULE, check_directives::MODULE, trace::MODULE];

/// Reads a requirement that must be a list of strings.
///
/// An empty requirement yields an empty list and a lone string is a
/// one-item list.
pub(crate) fn string_list(hook: &str, requirement: &Requirement) -> AppResult<Vec<String>> {
    if requirement.is_empty() {
        return Ok(Vec::new());
    }

    let invalid = || AppError::configuration(format!("Hook '{hook}' expects a list of strings"));

    match requirement.value() {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Sequence(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}
