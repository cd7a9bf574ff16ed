//! 配置驱动的启动集成测试

mod common;

use common::{init_test_logging, Person, Planet, Star};
use data_common::{ConfigurationError, DuplicateKeyPolicy};
use data_impl::{PersistenceBuilder, PersistenceSettings};
use std::io::Write;
use tempfile::NamedTempFile;

fn settings_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_runtime_from_settings_file() {
    init_test_logging();
    let file = settings_file(
        r#"
[scanner]
policy = "fail_fast"
namespaces = ["astronomy::people", "astronomy::bodies"]

[logging]
level = "debug"
"#,
    );

    let settings = PersistenceSettings::from_file(file.path()).unwrap();
    assert_eq!(settings.scanner.policy, DuplicateKeyPolicy::FailFast);

    let runtime = PersistenceBuilder::from_settings(settings)
        .with_configured_logging()
        .unwrap()
        .build()
        .unwrap();
    assert!(runtime.context().is_registered::<Person>());
    assert!(runtime.context().is_registered::<Planet>());
    assert_eq!(runtime.settings().logging.level, "debug");
}

#[test]
fn test_fail_fast_policy_from_settings_rejects_duplicates() {
    init_test_logging();
    let file = settings_file(
        r#"
[scanner]
policy = "fail_fast"
namespaces = ["astronomy"]
"#,
    );

    let settings = PersistenceSettings::from_file(file.path()).unwrap();
    let err = PersistenceBuilder::from_settings(settings).build().unwrap_err();
    assert!(matches!(err, ConfigurationError::DuplicatePrimaryKey { .. }));
}

#[test]
fn test_lenient_default_policy() {
    init_test_logging();
    let file = settings_file(
        r#"
[scanner]
namespaces = ["astronomy::catalog"]
"#,
    );

    let settings = PersistenceSettings::from_file(file.path()).unwrap();
    assert_eq!(settings.scanner.policy, DuplicateKeyPolicy::Lenient);

    let runtime = PersistenceBuilder::from_settings(settings).build().unwrap();
    assert_eq!(runtime.context().field_for::<Star>().unwrap().name(), "designation");
}
