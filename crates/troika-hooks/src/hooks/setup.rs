//! Hook setup: turns a site's configuration into live hook instances.

use tracing::{error, info, warn};

use troika_core::config::Config;
use troika_core::error::{AppError, ErrorKind};
use troika_core::result::AppResult;

use super::dispatcher::{HookDispatcher, HookInstance};
use super::registry::HookRegistry;
use crate::discovery::HookModule;

/// Sets up the hooks according to the site configuration.
///
/// Every registered hook kind is instantiated, in registry order, with the
/// requirement the site assigns to it (empty when the site does not mention
/// it). Kinds with a non-empty requirement are enabled.
///
/// Discovery over `namespace` runs at most once per registry, so calling
/// this for several sites in a row never registers a kind twice.
///
/// # Errors
///
/// - Site lookup errors (`Configuration`, `NotFound`) are returned as is.
/// - A discovery failure is returned as a `Hook` error.
/// - A hook that fails to construct is fatal and returned as a `Hook`
///   error naming the kind.
pub fn setup_hooks(
    config: &Config,
    site: &str,
    registry: &mut HookRegistry,
    namespace: &[HookModule],
) -> AppResult<HookDispatcher> {
    let site_config = config.get_site_config(site)?;
    registry.discover(namespace)?;

    for name in site_config.hook_names() {
        if !registry.contains(&name) {
            warn!(site = %site, hook = %name, "Site configuration names an unknown hook kind");
        }
    }

    let mut instances = Vec::with_capacity(registry.len());
    for spec in registry.specs() {
        let requirement = site_config.requirement(&spec.name);

        let hook = spec.instantiate(&requirement).map_err(|e| {
            error!(site = %site, hook = %spec.name, error = %e, "Hook construction failed");
            AppError::with_source(
                ErrorKind::Hook,
                format!("Failed to construct hook '{}': {}", spec.name, e.message),
                e,
            )
        })?;

        let instance = HookInstance::new(spec, requirement, hook);
        if instance.is_enabled() {
            info!(
                site = %site,
                hook = %spec.name,
                requirement = %instance.requirement(),
                "Enabled hook"
            );
        }
        instances.push(instance);
    }

    let dispatcher = HookDispatcher::new(site, instances);
    info!(
        site = %site,
        enabled = ?dispatcher.enabled_names(),
        "Hooks set up"
    );
    Ok(dispatcher)
}
