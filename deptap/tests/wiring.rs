//! End-to-end wiring scenarios through the public `deptap` surface.

use std::sync::Arc;
use std::thread;

use deptap::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug)]
struct Named {
    name: &'static str,
}

fn named(name: &'static str) -> Component {
    Component::new(Named { name })
}

fn registry(entries: Vec<(&str, Entry)>) -> Registry {
    let mut registry = Registry::new();
    for (key, entry) in entries {
        registry.register(key, entry).expect("unique keys");
    }
    registry
}

/// Asserts every slot reachable from `instance` holds a resolved entry.
fn assert_fully_wired(instance: &Instance) {
    assert!(instance.is_wired());
    if let Some(component) = instance.as_component() {
        for slot in component.depends().values() {
            assert_fully_wired(slot.instance().expect("resolved slot"));
        }
    }
}

#[test]
fn plain_values_pass_through() {
    init_tracing();
    let container = container_factory(registry(vec![("c", Entry::value(42i32))]), false).unwrap();

    assert_eq!(container.resolve("c").unwrap().downcast_ref::<i32>(), Some(&42));
}

#[test]
fn chained_resolution() {
    init_tracing();
    let container = container_factory(
        registry(vec![
            ("a", named("a").depends_on("b").into()),
            ("b", named("b").depends_on("c").into()),
            ("c", Entry::value(42i32)),
        ]),
        false,
    )
    .unwrap();

    let a = container.resolve("a").unwrap();
    assert_eq!(a.downcast_ref::<Named>().unwrap().name, "a");
    assert_eq!(a.dependency("b").unwrap().dependency_as::<i32>("c"), Some(&42));
    assert_fully_wired(&a);
}

#[test]
fn diamond_dependency_is_wired_once() {
    init_tracing();
    let d = Payload::new(1i32);
    let container = container_factory(
        registry(vec![
            ("a", named("a").depends_on("b").depends_on("c").into()),
            ("b", named("b").depends_on("d").into()),
            ("c", named("c").depends_on("d").into()),
            ("d", Entry::Value(d.clone())),
        ]),
        true,
    )
    .unwrap();

    let a = container.resolve("a").unwrap();
    let via_b = a.dependency("b").unwrap().dependency("d").unwrap();
    let via_c = a.dependency("c").unwrap().dependency("d").unwrap();

    assert!(Arc::ptr_eq(via_b, via_c));
    assert!(Arc::ptr_eq(via_b, &container.resolve("d").unwrap()));
    assert!(via_b.payload().ptr_eq(&d));
    assert_fully_wired(&a);
}

#[test]
fn dependency_slots_follow_declaration_order() {
    init_tracing();
    let container = Container::builder()
        .component("svc", named("svc").depends_on("z").depends_on("a").depends_on("m"))
        .value("a", 1u8)
        .value("m", 2u8)
        .value("z", 3u8)
        .build()
        .unwrap();

    let svc = container.resolve("svc").unwrap();
    let order: Vec<&str> = svc
        .as_component()
        .unwrap()
        .depends()
        .keys()
        .map(Key::as_str)
        .collect();
    assert_eq!(order, vec!["z", "a", "m"]);
}

fn cyclic_registry() -> Registry {
    registry(vec![
        ("aComponent", named("aComponent").depends_on("bComponent").into()),
        (
            "bComponent",
            named("bComponent").depends_on("aComponent").depends_on("cValue").into(),
        ),
        ("xComponent", named("xComponent").depends_on("cValue").into()),
        ("cValue", Entry::value(42i32)),
    ])
}

#[test]
fn eager_factory_detects_circular_dependency() {
    init_tracing();
    let err = container_factory(cyclic_registry(), false).unwrap_err();

    assert!(err.to_string().starts_with(
        "Circular dependency detected: aComponent -> bComponent -> aComponent"
    ));
}

#[test]
fn lazy_factory_detects_circular_dependency_on_lookup() {
    init_tracing();
    let container = container_factory(cyclic_registry(), true).unwrap();

    let err = container.resolve("aComponent").unwrap_err();
    assert!(err.to_string().contains("Circular dependency detected"));

    let err = container.resolve("bComponent").unwrap_err();
    let chain: Vec<&str> = err.cycle().unwrap().iter().map(Key::as_str).collect();
    assert_eq!(chain, vec!["bComponent", "aComponent", "bComponent"]);
}

#[test]
fn lazy_factory_works_away_from_the_cycle() {
    init_tracing();
    let container = container_factory(cyclic_registry(), true).unwrap();

    let x = container.resolve("xComponent").unwrap();
    assert_eq!(x.dependency_as::<i32>("cValue"), Some(&42));
}

#[test]
fn failed_lookup_does_not_poison_container() {
    init_tracing();
    let container = container_factory(cyclic_registry(), true).unwrap();

    assert!(container.resolve("aComponent").is_err());
    assert!(container.resolve("aComponent").is_err());
    assert!(container.resolve("xComponent").is_ok());
}

#[test]
fn unknown_key_is_distinct_from_cycle() {
    init_tracing();
    let container = container_factory(cyclic_registry(), true).unwrap();

    let err = container.resolve("xComponnet").unwrap_err();
    assert!(err.cycle().is_none());
    match err {
        DeptapError::NotRegistered(err) => {
            assert!(err.suggestions.contains(&Key::new("xComponent")));
        }
        other => panic!("Expected NotRegistered, got: {other:?}"),
    }
}

struct StorageProvider;

impl Provider for StorageProvider {
    fn register(&self, registry: &mut dyn ProviderRegistry) {
        registry.register_value(Key::new("databaseUrl"), Payload::new("postgres://localhost"));
        registry.register_component(Key::new("database"), named("database").depends_on("databaseUrl"));
    }
}

#[test]
fn providers_contribute_entries() {
    init_tracing();
    let container = Container::builder()
        .add_provider(&StorageProvider)
        .component("userRepo", named("userRepo").depends_on("database"))
        .build()
        .unwrap();

    let repo = container.resolve("userRepo").unwrap();
    let database = repo.dependency("database").unwrap();
    assert_eq!(database.dependency_as::<&str>("databaseUrl"), Some(&"postgres://localhost"));
}

#[test]
fn concurrent_lookups_share_instances() {
    init_tracing();
    let container = Arc::new(
        Container::builder()
            .lazy(true)
            .component("a", named("a").depends_on("b"))
            .component("b", named("b").depends_on("c"))
            .value("c", 42i32)
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let container = Arc::clone(&container);
            thread::spawn(move || container.resolve("a").unwrap())
        })
        .collect();

    let resolved: Vec<Arc<Instance>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for instance in &resolved[1..] {
        assert!(Arc::ptr_eq(&resolved[0], instance));
    }
}
