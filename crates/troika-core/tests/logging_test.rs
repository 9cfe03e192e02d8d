//! Global subscriber installation. Kept in its own test binary so no other
//! test runs under the subscriber it installs.

use troika_core::error::ErrorKind;
use troika_core::logging::{LogFormat, LoggingConfig, init_logging};

#[test]
fn test_init_logging_installs_once() {
    let config = LoggingConfig {
        level: "warn".to_string(),
        format: LogFormat::Compact,
    };

    init_logging(&config).expect("first install");
    let err = init_logging(&config).expect_err("subscriber already installed");
    assert_eq!(err.kind, ErrorKind::Internal);
}
