//! 元数据扫描与注册表集成测试

mod common;

use common::{init_test_logging, Comet, Person, Planet, Star};
use data_abstractions::EntityScanner;
use data_common::{
    global_entity_catalog, ConfigurationError, KeyValue, MetadataContext, ScannerConfig,
};
use data_impl::MetadataScanner;
use std::sync::Arc;

fn scan(config: ScannerConfig, namespaces: &[&str]) -> Result<MetadataContext, ConfigurationError> {
    init_test_logging();
    MetadataScanner::new().with_config(config).scan(namespaces)
}

#[test]
fn test_derived_entities_are_in_global_catalog() {
    let catalog = global_entity_catalog();
    assert!(catalog.contains::<Person>());
    assert!(catalog.contains::<Planet>());
    assert!(catalog.contains::<Comet>());
    assert!(catalog.contains::<Star>());
}

#[test]
fn test_lenient_scan_registers_marked_fields() {
    let context = scan(ScannerConfig::lenient(), &["astronomy"]).unwrap();

    assert_eq!(context.field_for::<Person>().unwrap().name(), "id");
    assert_eq!(context.field_for::<Planet>().unwrap().name(), "uid");
    // 没有主键标记的类型不注册
    assert!(context.field_for::<Comet>().is_none());
    // 多个主键标记时取名称最小的字段
    assert_eq!(context.field_for::<Star>().unwrap().name(), "designation");
    assert_eq!(context.len(), 3);
}

#[test]
fn test_fail_fast_scan_names_offending_type() {
    let err = scan(ScannerConfig::fail_fast(), &["astronomy"]).unwrap_err();

    match &err {
        ConfigurationError::DuplicatePrimaryKey { type_name, fields } => {
            assert!(type_name.ends_with("Star"));
            assert_eq!(fields, &["designation".to_string(), "hip".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Star"));
}

#[test]
fn test_fail_fast_scan_outside_duplicates_succeeds() {
    let context = scan(ScannerConfig::fail_fast(), &["astronomy::people", "astronomy::bodies"]).unwrap();
    assert!(context.is_registered::<Person>());
    assert!(context.is_registered::<Planet>());
    assert!(!context.is_registered::<Star>());
}

#[test]
fn test_empty_namespace_list_yields_empty_registry() {
    let context = scan(ScannerConfig::fail_fast(), &[]).unwrap();
    assert!(context.is_empty());
    assert!(context.field_for::<Person>().is_none());
}

#[test]
fn test_value_of_matches_marked_field() {
    let context = scan(ScannerConfig::lenient(), &["astronomy::bodies"]).unwrap();

    let planet = Planet {
        uid: Some("4b0c3f4e-6d38-4c53-9b43-0e6a4b1f2a11".to_string()),
        name: "Mars".to_string(),
        moons: 2,
    };
    assert_eq!(
        context.value_of(&planet).unwrap(),
        Some(KeyValue::from(planet.uid.clone().unwrap()))
    );
    assert_eq!(
        context.value_of_as::<String, _>(&planet).unwrap(),
        planet.uid.clone()
    );

    // 未赋值的主键与未注册的类型都返回 None
    assert_eq!(context.value_of(&Planet::new("Venus", 0)).unwrap(), None);
    assert_eq!(context.value_of(&Person::new("Ada", 36)).unwrap(), None);
}

#[tokio::test]
async fn test_concurrent_registry_readers() {
    let context = Arc::new(scan(ScannerConfig::lenient(), &["astronomy"]).unwrap());

    let mut handles = Vec::new();
    for i in 0..8_i64 {
        let context = Arc::clone(&context);
        handles.push(tokio::task::spawn_blocking(move || {
            let person = Person {
                id: Some(i),
                name: format!("reader-{i}"),
                age: 30,
            };
            for _ in 0..1_000 {
                assert_eq!(
                    context.value_of(&person).unwrap(),
                    Some(KeyValue::Integer(i))
                );
                assert_eq!(context.field_for::<Planet>().unwrap().name(), "uid");
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}
