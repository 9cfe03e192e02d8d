//! Site configuration store.
//!
//! The configuration is a YAML document loaded once per process. It must
//! contain a top-level `sites` mapping from site name to a mapping of
//! hook-kind name → requirement:
//!
//! ```yaml
//! sites:
//!   alpha:
//!     notify: [user@example.com]
//!   beta: {}
//! logging:
//!   level: debug
//! ```
//!
//! Mappings keep file order, so site and hook listings are reproducible.

pub mod requirement;
pub mod site;
pub mod source;

use std::ffi::OsString;
use std::str::FromStr;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{AppError, ErrorKind};
use crate::logging::LoggingConfig;
use crate::result::AppResult;

pub use requirement::Requirement;
pub use site::{SiteConfig, SiteLookup};
pub use source::{CONFIG_FILE_ENV, ConfigSource};

const SITES_KEY: &str = "sites";
const LOGGING_KEY: &str = "logging";

/// Loaded configuration. Immutable after load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    data: Mapping,
}

impl Config {
    /// Loads the configuration.
    ///
    /// With no explicit source, the path is read from the
    /// `TROIKA_CONFIG_FILE` environment variable.
    ///
    /// # Errors
    ///
    /// - `Invocation` if no source can be resolved.
    /// - `Configuration` if the text is not valid YAML or its top level is
    ///   not a mapping. The message carries the parser diagnostic.
    /// - `Io` if the file cannot be opened or read.
    pub fn load(source: Option<ConfigSource>) -> AppResult<Self> {
        Self::load_from(source, std::env::var_os(CONFIG_FILE_ENV))
    }

    /// Loads the configuration, with `env_value` standing in for the
    /// `TROIKA_CONFIG_FILE` environment variable.
    pub fn load_from(source: Option<ConfigSource>, env_value: Option<OsString>) -> AppResult<Self> {
        let source = ConfigSource::resolve(source, env_value)?;
        debug!(source = %source.describe(), "Using configuration file");

        let text = source.read_to_string()?;
        text.parse()
    }

    /// Builds a configuration from an already-parsed YAML value.
    ///
    /// A null document is an empty configuration.
    pub fn from_value(value: Value) -> AppResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(data) => Ok(Self { data }),
            other => Err(AppError::configuration(format!(
                "Configuration must be a mapping at the top level, found {}",
                kind_name(&other)
            ))),
        }
    }

    /// Looks up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Whether a top-level key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Raw top-level mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.data
    }

    /// Looks up a site, distinguishing a missing site from a broken file.
    pub fn lookup_site<'a>(&'a self, name: &'a str) -> SiteLookup<'a> {
        let sites = match self.sites() {
            Ok(sites) => sites,
            Err(reason) => return SiteLookup::Malformed(reason),
        };

        match sites.get(name) {
            Some(Value::Mapping(block)) => SiteLookup::Found(SiteConfig::new(name, block)),
            Some(Value::Null) => SiteLookup::Found(SiteConfig::empty(name)),
            Some(other) => SiteLookup::Malformed(format!(
                "Site '{name}' must be a mapping of hook names, found {}",
                kind_name(other)
            )),
            None => SiteLookup::NotFound {
                site: name.to_string(),
                known: string_keys(sites),
            },
        }
    }

    /// Returns the configuration block of the given site.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no `sites` are defined (or they are malformed).
    /// - `NotFound` if the requested site is not defined.
    pub fn get_site_config<'a>(&'a self, name: &'a str) -> AppResult<SiteConfig<'a>> {
        match self.lookup_site(name) {
            SiteLookup::Found(site) => Ok(site),
            SiteLookup::Malformed(reason) => Err(AppError::configuration(reason)),
            SiteLookup::NotFound { site, known } => {
                let known = if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                };
                Err(AppError::not_found(format!(
                    "Site '{site}' is not defined (known sites: {known})"
                )))
            }
        }
    }

    /// Names of the defined sites, in file order.
    pub fn site_names(&self) -> AppResult<Vec<String>> {
        self.sites()
            .map(string_keys)
            .map_err(AppError::configuration)
    }

    /// Logging settings from the optional `logging` section.
    pub fn logging(&self) -> AppResult<LoggingConfig> {
        match self.data.get(LOGGING_KEY) {
            None | Some(Value::Null) => Ok(LoggingConfig::default()),
            Some(value) => serde_yaml::from_value(value.clone()).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Invalid 'logging' section: {e}"),
                    e,
                )
            }),
        }
    }

    fn sites(&self) -> Result<&Mapping, String> {
        match self.data.get(SITES_KEY) {
            Some(Value::Mapping(sites)) => Ok(sites),
            Some(other) => Err(format!(
                "'sites' must be a mapping of site names, found {}",
                kind_name(other)
            )),
            None => Err("No 'sites' defined in configuration".to_string()),
        }
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(text: &str) -> AppResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(value)
    }
}

fn string_keys(mapping: &Mapping) -> Vec<String> {
    mapping
        .keys()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::logging::LogFormat;

    fn config(yaml: &str) -> Config {
        yaml.parse().expect("valid configuration")
    }

    #[test]
    fn test_missing_sites_is_configuration_error() {
        let cfg = config("logging: {level: debug}\n");
        let err = cfg.get_site_config("alpha").expect_err("no sites key");
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(!err.is_not_found());
        assert!(err.message.contains("No 'sites' defined"));
    }

    #[test]
    fn test_empty_document_has_no_sites() {
        let cfg = config("");
        assert!(cfg.as_mapping().is_empty());
        let err = cfg.get_site_config("alpha").expect_err("no sites key");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unknown_site_is_not_found() {
        let cfg = config("sites:\n  alpha: {}\n  beta: {}\n");
        let err = cfg.get_site_config("gamma").expect_err("unknown site");
        assert!(err.is_not_found());
        assert!(!err.is_configuration());
        assert!(err.message.contains("alpha, beta"));
    }

    #[test]
    fn test_lookup_site_is_tagged() {
        let cfg = config("sites:\n  alpha:\n    notify: [a@b.c]\n");
        assert!(matches!(cfg.lookup_site("alpha"), SiteLookup::Found(_)));
        assert!(matches!(
            cfg.lookup_site("beta"),
            SiteLookup::NotFound { ref known, .. } if known == &["alpha".to_string()]
        ));
        assert!(matches!(
            Config::default().lookup_site("alpha"),
            SiteLookup::Malformed(_)
        ));
    }

    #[test]
    fn test_sites_not_a_mapping_is_malformed() {
        let cfg = config("sites: [alpha, beta]\n");
        let err = cfg.get_site_config("alpha").expect_err("list of sites");
        assert!(err.is_configuration());
        assert!(cfg.site_names().is_err());
    }

    #[test]
    fn test_site_block_not_a_mapping_is_malformed() {
        let cfg = config("sites:\n  alpha: [notify]\n");
        let err = cfg.get_site_config("alpha").expect_err("list block");
        assert!(err.is_configuration());
        assert!(err.message.contains("alpha"));
    }

    #[test]
    fn test_null_site_block_is_empty() {
        let cfg = config("sites:\n  alpha:\n");
        let site = cfg.get_site_config("alpha").expect("declared site");
        assert!(site.is_empty());
        assert!(site.requirement("notify").is_empty());
    }

    #[test]
    fn test_site_requirements() {
        let cfg = config("sites:\n  alpha:\n    notify: [user@example.com]\n    trace: []\n");
        let site = cfg.get_site_config("alpha").expect("site");
        assert_eq!(site.name(), "alpha");
        assert_eq!(site.hook_names(), vec!["notify", "trace"]);
        assert_eq!(
            site.requirement("notify").as_strings(),
            vec!["user@example.com"]
        );
        assert!(site.contains("trace"));
        assert!(site.requirement("trace").is_empty());
        assert!(!site.contains("check_directives"));
        assert!(site.requirement("check_directives").is_empty());
    }

    #[test]
    fn test_site_names_keep_file_order() {
        let cfg = config("sites:\n  zeta: {}\n  alpha: {}\n  mu: {}\n");
        assert_eq!(
            cfg.site_names().expect("sites"),
            vec!["zeta", "alpha", "mu"]
        );
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        let err = "- a\n- b\n".parse::<Config>().expect_err("list document");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_syntax_error_carries_parser_message() {
        let text = "sites:\n  alpha: [unterminated\n";
        let parser_message = serde_yaml::from_str::<Value>(text)
            .expect_err("invalid yaml")
            .to_string();
        let err = text.parse::<Config>().expect_err("invalid yaml");
        assert!(err.is_configuration());
        assert!(err.message.contains(&parser_message));
    }

    #[test]
    fn test_load_from_stream() {
        let source = ConfigSource::named_stream(
            "inline",
            std::io::Cursor::new("sites:\n  alpha:\n    notify: [a@b.c]\n"),
        );
        let cfg = Config::load(Some(source)).expect("load");
        assert!(cfg.contains_key("sites"));
        assert!(cfg.get("sites").is_some());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "sites:\n  alpha:\n    trace: [at_exit]").expect("write");

        let cfg = Config::load(Some(ConfigSource::path(file.path()))).expect("load");
        let site = cfg.get_site_config("alpha").expect("site");
        assert_eq!(site.requirement("trace").as_strings(), vec!["at_exit"]);
    }

    #[test]
    fn test_load_without_any_source_is_invocation_error() {
        let err = Config::load_from(None, None).expect_err("no source");
        assert!(err.is_invocation());
        assert!(err.message.contains(CONFIG_FILE_ENV));

        let err = Config::load_from(None, Some(OsString::new())).expect_err("empty env");
        assert!(err.is_invocation());
    }

    #[test]
    fn test_load_falls_back_to_env_path() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "sites:\n  beta:\n    notify: [ops@example.com]").expect("write");

        let cfg = Config::load_from(None, Some(file.path().as_os_str().to_owned())).expect("load");
        assert_eq!(cfg.site_names().expect("sites"), vec!["beta"]);
    }

    #[test]
    fn test_load_invalid_file_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "sites: {{alpha: [").expect("write");

        let err = Config::load(Some(ConfigSource::path(file.path()))).expect_err("bad yaml");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_logging_section() {
        let cfg = config("sites: {}\nlogging:\n  level: debug\n  format: json\n");
        let logging = cfg.logging().expect("logging");
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);

        let defaults = config("sites: {}\n").logging().expect("defaults");
        assert_eq!(defaults, LoggingConfig::default());
    }

    #[test]
    fn test_invalid_logging_section() {
        let err = config("logging: [loud]\n")
            .logging()
            .expect_err("list is not a logging section");
        assert!(err.is_configuration());
    }
}
