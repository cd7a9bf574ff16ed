//! DAO 集成测试

mod common;

use common::{init_test_logging, Comet, Person, Planet};
use data_abstractions::{Dao, IdBasedDao, PrimaryKeyBasedDao};
use data_common::{ConfigurationError, DaoError, ScannerConfig};
use data_impl::{InMemoryStore, PersistenceBuilder, PersistenceRuntime};
use std::sync::Arc;

fn runtime() -> PersistenceRuntime {
    init_test_logging();
    PersistenceBuilder::new()
        .with_scanner_config(ScannerConfig::fail_fast())
        .with_namespace("astronomy::people")
        .with_namespace("astronomy::bodies")
        .build()
        .unwrap()
}

#[test]
fn test_persist_round_trip_with_surrogate_key() {
    let runtime = runtime();
    let dao = runtime.surrogate_dao::<Person, _>(Arc::new(InMemoryStore::new()));

    let mut ada = Person::new("Ada", 36);
    dao.persist(&mut ada).unwrap();

    let id = ada.id.expect("持久化后应分配主键");
    assert_eq!(dao.find_by_id(id).unwrap(), Some(ada.clone()));
    assert_eq!(dao.find_by_primary_key(id).unwrap(), Some(ada));
}

#[test]
fn test_persist_round_trip_with_registry_key() {
    let runtime = runtime();
    let dao = runtime.registry_dao::<Planet, _>(Arc::new(InMemoryStore::new()));

    let mut mars = Planet::new("Mars", 2);
    dao.persist(&mut mars).unwrap();

    let uid = mars.uid.clone().expect("持久化后应分配主键");
    assert!(uuid::Uuid::parse_str(&uid).is_ok());
    assert_eq!(dao.find_by_primary_key(uid.as_str()).unwrap(), Some(mars.clone()));
    assert_eq!(dao.find_by_entity(&mars).unwrap(), Some(mars));
}

#[test]
fn test_delete_makes_record_absent() {
    let runtime = runtime();
    let dao = runtime.registry_dao::<Planet, _>(Arc::new(InMemoryStore::new()));

    let mut pluto = Planet::new("Pluto", 5);
    dao.persist(&mut pluto).unwrap();
    let uid = pluto.uid.clone().unwrap();
    assert!(dao.exists(uid.as_str()).unwrap());

    dao.delete(&pluto).unwrap();
    assert!(!dao.exists(uid.as_str()).unwrap());
    assert_eq!(dao.find_by_primary_key(uid.as_str()).unwrap(), None);
}

#[test]
fn test_update_is_idempotent_within_managed_scope() {
    let runtime = runtime();
    let store = Arc::new(InMemoryStore::new());
    let dao = runtime.surrogate_dao::<Person, _>(store.clone());

    let tx = store.begin().unwrap();
    let mut grace = Person::new("Grace", 40);
    dao.persist(&mut grace).unwrap();
    grace.age = 41;
    dao.save_or_update(&mut grace).unwrap();
    let once = dao.find_by_entity(&grace).unwrap();
    dao.save_or_update(&mut grace).unwrap();
    let twice = dao.find_by_entity(&grace).unwrap();
    tx.commit().unwrap();

    assert_eq!(once, twice);
    assert_eq!(dao.count_total().unwrap(), 1);
    assert_eq!(dao.find_all().unwrap(), vec![grace]);
}

#[test]
fn test_hundred_sequential_persists_are_counted() {
    let runtime = runtime();
    let dao = runtime.surrogate_dao::<Person, _>(Arc::new(InMemoryStore::new()));

    for i in 0..100 {
        let mut person = Person::new(&format!("person-{i}"), i);
        dao.persist(&mut person).unwrap();
    }
    assert_eq!(dao.count_total().unwrap(), 100);
}

#[test]
fn test_detached_mutation_is_saved() {
    let runtime = runtime();
    let dao = runtime.registry_dao::<Planet, _>(Arc::new(InMemoryStore::new()));

    let mut jupiter = Planet::new("Jupiter", 79);
    dao.persist(&mut jupiter).unwrap();

    // 调用结束后实例已游离
    jupiter.moons = 95;
    dao.save_or_update(&mut jupiter).unwrap();

    let reloaded = dao.find_by_entity(&jupiter).unwrap().unwrap();
    assert_eq!(reloaded.moons, 95);
    assert_eq!(dao.count_total().unwrap(), 1);
}

#[test]
fn test_persist_all_assigns_every_key() {
    let runtime = runtime();
    let dao = runtime.surrogate_dao::<Person, _>(Arc::new(InMemoryStore::new()));

    let mut crew = vec![Person::new("Neil", 38), Person::new("Buzz", 39)];
    dao.persist_all(&mut crew).unwrap();

    assert_eq!(crew[0].id, Some(1));
    assert_eq!(crew[1].id, Some(2));
}

#[test]
fn test_unregistered_type_fails_with_configuration_error() {
    let runtime = runtime();
    let dao = runtime.registry_dao::<Comet, _>(Arc::new(InMemoryStore::new()));

    let err = dao.exists("halley").unwrap_err();
    match err {
        DaoError::Configuration(ConfigurationError::UnregisteredEntity { type_name }) => {
            assert!(type_name.ends_with("Comet"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rollback_discards_dao_writes() {
    let runtime = runtime();
    let store = Arc::new(InMemoryStore::new());
    let dao = runtime.surrogate_dao::<Person, _>(store.clone());

    let tx = store.begin().unwrap();
    dao.persist(&mut Person::new("Temp", 1)).unwrap();
    assert_eq!(dao.count_total().unwrap(), 1);
    tx.rollback().unwrap();

    assert_eq!(dao.count_total().unwrap(), 0);
}

#[test]
fn test_session_dao_exposes_native_session() -> anyhow::Result<()> {
    let runtime = runtime();
    let store = Arc::new(InMemoryStore::with_name("observatory"));
    let dao = runtime.session_dao::<Planet, _>(store);

    let session = dao.session()?;
    assert_eq!(session.store_name(), "observatory");

    let mut saturn = Planet::new("Saturn", 146);
    session.persist(&mut saturn)?;
    let uid = saturn.uid.clone().expect("会话保存后应分配主键");

    assert!(dao.exists(uid.as_str())?);
    assert_eq!(session.get::<Planet>(uid.as_str())?, Some(saturn));
    assert_eq!(dao.count_total()?, 1);
    Ok(())
}

#[test]
fn test_concurrent_write_survives_other_threads_rollback() {
    let runtime = runtime();
    let store = Arc::new(InMemoryStore::new());
    let dao = runtime.surrogate_dao::<Person, _>(Arc::clone(&store));

    let tx = store.begin().unwrap();
    dao.persist(&mut Person::new("Discarded", 1)).unwrap();

    std::thread::scope(|scope| {
        let worker = scope.spawn(|| {
            let mut grace = Person::new("Grace", 85);
            dao.persist(&mut grace).map(|()| grace)
        });

        std::thread::sleep(std::time::Duration::from_millis(50));
        tx.rollback().unwrap();

        let grace = worker.join().unwrap().unwrap();
        let id = grace.id.unwrap();
        assert_eq!(dao.find_by_id(id).unwrap(), Some(grace));
    });

    assert_eq!(dao.count_total().unwrap(), 1);
}
