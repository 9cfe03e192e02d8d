//! Integration tests for configuration loading.

use std::io::{Cursor, Write};

use tempfile::NamedTempFile;

use troika_core::config::{Config, ConfigSource};
use troika_core::error::ErrorKind;
use troika_hooks::builtin::NAMESPACE;
use troika_hooks::{HookRegistry, setup_hooks};

#[test]
fn test_no_source_is_invocation_error() {
    let err = Config::load_from(None, None).expect_err("no source");
    assert_eq!(err.kind, ErrorKind::Invocation);
    assert!(err.message.contains("TROIKA_CONFIG_FILE"));
}

#[test]
fn test_explicit_source_wins_over_env() {
    let dir = tempfile::tempdir().expect("temp dir");
    let env_path = dir.path().join("absent.yaml").into_os_string();

    let config = Config::load_from(
        Some(ConfigSource::stream(Cursor::new("sites:\n  alpha:\n"))),
        Some(env_path),
    )
    .expect("explicit stream");
    assert_eq!(config.site_names().expect("sites"), vec!["alpha"]);
}

#[test]
fn test_invalid_syntax_keeps_parser_message() {
    let text = "sites:\n  alpha: [unclosed\n";
    let parser_message = serde_yaml::from_str::<serde_yaml::Value>(text)
        .expect_err("invalid yaml")
        .to_string();

    let err = Config::load(Some(ConfigSource::stream(Cursor::new(text))))
        .expect_err("invalid config");
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert!(
        err.message.contains(&parser_message),
        "{} does not contain {}",
        err.message,
        parser_message
    );
}

#[test]
fn test_file_source_end_to_end() {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "sites:").expect("write");
    writeln!(file, "  alpha:").expect("write");
    writeln!(file, "    notify: [user@example.com]").expect("write");

    let config = Config::load(Some(ConfigSource::path(file.path()))).expect("load");
    let mut registry = HookRegistry::new();
    let dispatcher = setup_hooks(&config, "alpha", &mut registry, NAMESPACE).expect("setup");
    assert_eq!(dispatcher.enabled_names(), vec!["notify"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Config::load(Some(ConfigSource::path(dir.path().join("absent.yaml"))))
        .expect_err("missing file");
    assert_eq!(err.kind, ErrorKind::Io);
}
