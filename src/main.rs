//! Troika hooks: shows which hooks each configured site enables.
//!
//! Reads the configuration named by `TROIKA_CONFIG_FILE`, sets every site up
//! against the built-in hook namespace and prints one line per site.

use troika_core::config::{CONFIG_FILE_ENV, Config, ConfigSource};
use troika_core::error::AppError;
use troika_core::logging::init_logging;
use troika_hooks::builtin::NAMESPACE;
use troika_hooks::{HookRegistry, setup_hooks};

fn main() {
    let source = match ConfigSource::resolve(None, std::env::var_os(CONFIG_FILE_ENV)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let description = source.describe();

    let config = match Config::load(Some(source)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from '{}': {}", description, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.logging().and_then(|logging| init_logging(&logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }
    tracing::debug!(source = %description, "Using configuration file");

    if let Err(e) = run(&config) {
        tracing::error!("Hook setup failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Sets up hooks for every site and prints the enabled ones.
fn run(config: &Config) -> Result<(), AppError> {
    let mut registry = HookRegistry::new();

    for site in config.site_names()? {
        let dispatcher = setup_hooks(config, &site, &mut registry, NAMESPACE)?;
        let enabled = dispatcher.enabled_names();
        if enabled.is_empty() {
            println!("{}: (no hooks enabled)", site);
        } else {
            println!("{}: {}", site, enabled.join(", "));
        }
    }

    Ok(())
}
