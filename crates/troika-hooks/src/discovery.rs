//! Module discovery: enumerates the hook modules of a namespace and lets
//! each one register its hook kind.
//!
//! A namespace is a static, ordered slice of [`HookModule`]s. Registration
//! is an explicit call made during discovery, so the registry order is the
//! namespace order on every run.

use tracing::{debug, error};

use troika_core::error::{AppError, ErrorKind};
use troika_core::result::AppResult;

use crate::hooks::registry::HookRegistry;

/// Registration function exported by a hook module.
pub type RegisterFn = fn(&mut HookRegistry) -> AppResult<()>;

/// One extension module in a hook namespace.
#[derive(Debug, Clone, Copy)]
pub struct HookModule {
    /// Module name, used in diagnostics.
    pub name: &'static str,
    /// Registers exactly one hook kind.
    pub register: RegisterFn,
}

impl HookModule {
    /// Creates a module descriptor.
    pub const fn new(name: &'static str, register: RegisterFn) -> Self {
        Self { name, register }
    }
}

/// Lazily enumerates the modules of a namespace, in order.
pub fn discover_modules(namespace: &[HookModule]) -> impl Iterator<Item = &HookModule> {
    namespace.iter().inspect(|module| {
        debug!(module = module.name, "Discovered hook module");
    })
}

/// Exhausts the discoverer over `namespace`, registering every module.
///
/// Any failure is fatal: hook modules are trusted, co-deployed code, so a
/// module that cannot register means a broken deployment. A module must
/// register exactly one hook kind.
pub fn load_modules(namespace: &[HookModule], registry: &mut HookRegistry) -> AppResult<()> {
    for module in discover_modules(namespace) {
        let before = registry.len();

        (module.register)(registry).map_err(|e| {
            error!(module = module.name, error = %e, "Hook module failed to register");
            AppError::with_source(
                ErrorKind::Hook,
                format!("Failed to load hook module '{}': {}", module.name, e.message),
                e,
            )
        })?;

        let added = registry.len() - before;
        if added != 1 {
            return Err(AppError::hook(format!(
                "Hook module '{}' registered {added} hook kinds, expected exactly one",
                module.name
            )));
        }
    }
    Ok(())
}
