// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use wiring_core::{
    ArgumentError, BoxError, Component, ComponentDescriptor, Dependencies, Injectable, Injector,
    InjectorError, Marker, StaticDiscovery, TypeKey,
};

// --- DUMMY COMPONENTS FOR THESE TESTS ---

struct Foo {
    serial: usize,
}

static FOO_BUILDS: AtomicUsize = AtomicUsize::new(0);

impl Injectable for Foo {
    fn dependencies() -> Vec<TypeKey> {
        Vec::new()
    }

    fn construct(_: &mut Dependencies<'_>) -> Result<Self, BoxError> {
        Ok(Foo {
            serial: FOO_BUILDS.fetch_add(1, Ordering::SeqCst),
        })
    }
}

struct Bar {
    foo: Arc<Foo>,
}

impl Injectable for Bar {
    fn dependencies() -> Vec<TypeKey> {
        vec![TypeKey::of::<Foo>()]
    }

    fn construct(deps: &mut Dependencies<'_>) -> Result<Self, BoxError> {
        Ok(Bar { foo: deps.take()? })
    }
}

struct Baz {
    bar: Arc<Bar>,
}

impl Injectable for Baz {
    fn dependencies() -> Vec<TypeKey> {
        vec![TypeKey::of::<Bar>()]
    }

    fn construct(deps: &mut Dependencies<'_>) -> Result<Self, BoxError> {
        Ok(Baz { bar: deps.take()? })
    }
}

struct Chicken {
    _egg: Arc<Egg>,
}

struct Egg {
    _chicken: Arc<Chicken>,
}

impl Injectable for Chicken {
    fn dependencies() -> Vec<TypeKey> {
        vec![TypeKey::of::<Egg>()]
    }

    fn construct(deps: &mut Dependencies<'_>) -> Result<Self, BoxError> {
        Ok(Chicken { _egg: deps.take()? })
    }
}

impl Injectable for Egg {
    fn dependencies() -> Vec<TypeKey> {
        vec![TypeKey::of::<Chicken>()]
    }

    fn construct(deps: &mut Dependencies<'_>) -> Result<Self, BoxError> {
        Ok(Egg {
            _chicken: deps.take()?,
        })
    }
}

struct Faulty;

impl Injectable for Faulty {
    fn dependencies() -> Vec<TypeKey> {
        vec![TypeKey::of::<Foo>()]
    }

    fn construct(_: &mut Dependencies<'_>) -> Result<Self, BoxError> {
        Err("disk full".into())
    }
}

/// Declares `Foo` but asks for a `Bar` when built.
struct Mismatched {
    _bar: Arc<Bar>,
}

impl Injectable for Mismatched {
    fn dependencies() -> Vec<TypeKey> {
        vec![TypeKey::of::<Foo>()]
    }

    fn construct(deps: &mut Dependencies<'_>) -> Result<Self, BoxError> {
        Ok(Mismatched { _bar: deps.take()? })
    }
}

struct TestMarker;
impl Marker for TestMarker {}

fn foo_bar_baz() -> Injector {
    Injector::with_discovery(
        StaticDiscovery::new()
            .register::<Baz, Component>("app::web")
            .register::<Bar, Component>("app::service")
            .register::<Foo, Component>("app::store"),
    )
}

// --- TESTS ---

#[test]
fn test_scan_then_retrieve_shares_singletons() {
    // --- 1. ARRANGE ---
    let injector = foo_bar_baz();

    // --- 2. ACT ---
    injector.scan_components("app").expect("acyclic graph should scan");

    // --- 3. ASSERT ---
    let foo = injector.retrieve::<Foo>().expect("Foo is a singleton");
    let bar = injector.retrieve::<Bar>().expect("Bar is a singleton");
    let baz = injector.retrieve::<Baz>().expect("Baz is a singleton");

    assert!(Arc::ptr_eq(&bar.foo, &foo), "Bar should hold the Foo singleton");
    assert!(Arc::ptr_eq(&baz.bar, &bar), "Baz should hold the Bar singleton");
    assert!(
        Arc::ptr_eq(&foo, &injector.retrieve::<Foo>().unwrap()),
        "Repeated retrieval returns the same instance"
    );
}

#[test]
fn test_construction_order_is_dependency_first() {
    let injector = foo_bar_baz();
    injector.scan_components("app").unwrap();

    assert_eq!(
        injector.construction_order(),
        vec![TypeKey::of::<Foo>(), TypeKey::of::<Bar>(), TypeKey::of::<Baz>()]
    );
}

#[test]
fn test_cycle_fails_and_nothing_is_retrievable() {
    let injector = Injector::with_discovery(
        StaticDiscovery::new()
            .register::<Foo, Component>("farm")
            .register::<Chicken, Component>("farm")
            .register::<Egg, Component>("farm"),
    );

    let err = injector.scan_components("farm").expect_err("Chicken and Egg form a cycle");
    match err {
        InjectorError::CyclicDependency { unresolved } => {
            assert_eq!(unresolved, vec![TypeKey::of::<Chicken>(), TypeKey::of::<Egg>()]);
        }
        other => panic!("expected a cycle, got {other}"),
    }

    assert!(!injector.is_scanned());
    assert!(matches!(injector.retrieve::<Foo>(), Err(InjectorError::NotYetScanned)));
}

#[test]
fn test_undiscovered_dependency_is_missing() {
    // Foo lives outside the scanned scope, so Bar cannot be built.
    let injector = Injector::with_discovery(
        StaticDiscovery::new()
            .register::<Bar, Component>("app::service")
            .register::<Foo, Component>("vendor::store"),
    );

    let err = injector.scan_components("app").expect_err("Foo is out of scope");
    assert!(matches!(
        err,
        InjectorError::MissingDependency { dependent, dependency }
            if dependent == TypeKey::of::<Bar>() && dependency == TypeKey::of::<Foo>()
    ));
    assert!(!injector.is_scanned(), "a failed scan must not publish anything");
}

#[test]
fn test_constructor_failure_aborts_scan() {
    let injector = Injector::with_discovery(
        StaticDiscovery::new()
            .register::<Foo, Component>("app")
            .register::<Faulty, Component>("app"),
    );

    let err = injector.scan_components("app").expect_err("Faulty always fails");
    assert!(err.to_string().contains("Faulty"));
    let cause = std::error::Error::source(&err).expect("the constructor error is kept");
    assert_eq!(cause.to_string(), "disk full");
    assert!(!injector.is_scanned());
}

#[test]
fn test_undeclared_argument_type_fails_instantiation() {
    let injector = Injector::with_discovery(StaticDiscovery::new());

    let err = injector
        .scan_descriptors(vec![
            ComponentDescriptor::of::<Foo>(),
            ComponentDescriptor::of::<Mismatched>(),
        ])
        .expect_err("Mismatched takes a type it never declared");

    assert!(matches!(
        &err,
        InjectorError::InstantiationFailed { component, .. }
            if *component == TypeKey::of::<Mismatched>()
    ));
    let cause = std::error::Error::source(&err).expect("the argument error is kept");
    match cause.downcast_ref::<ArgumentError>() {
        Some(ArgumentError::TypeMismatch {
            index,
            requested,
            declared,
        }) => {
            assert_eq!(*index, 0);
            assert_eq!(*requested, std::any::type_name::<Bar>());
            assert_eq!(*declared, TypeKey::of::<Foo>());
        }
        other => panic!("expected a type mismatch, got {other:?}"),
    }
    assert!(!injector.is_scanned());
}

#[test]
fn test_second_scan_is_rejected_and_first_survives() {
    let injector = foo_bar_baz();
    injector.scan_components("app").unwrap();
    let foo = injector.retrieve::<Foo>().unwrap();

    let err = injector.scan_components("app").expect_err("already scanned");
    assert!(matches!(err, InjectorError::AlreadyScanned));

    let again = injector.retrieve::<Foo>().expect("first registry is intact");
    assert!(Arc::ptr_eq(&foo, &again));
}

#[test]
fn test_retrieve_before_scan_and_after_clear() {
    let injector = foo_bar_baz();
    assert!(matches!(injector.retrieve::<Foo>(), Err(InjectorError::NotYetScanned)));

    injector.scan_components("app").unwrap();
    let kept = injector.retrieve::<Foo>().unwrap();
    injector.clear();

    assert!(matches!(injector.retrieve::<Foo>(), Err(InjectorError::NotYetScanned)));
    assert_eq!(
        Arc::strong_count(&kept),
        1,
        "the registry let go of Foo, the caller still owns it"
    );
}

#[test]
fn test_clear_allows_a_fresh_scan() {
    let injector = foo_bar_baz();
    injector.scan_components("app").unwrap();
    let first = injector.retrieve::<Foo>().unwrap();

    injector.clear();
    injector.scan_components("app").expect("scan after clear succeeds");
    let second = injector.retrieve::<Foo>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second), "a new scan builds new singletons");
    assert_ne!(first.serial, second.serial);
}

#[test]
fn test_retrieve_unknown_type() {
    let injector = foo_bar_baz();
    injector.scan_components("app").unwrap();

    let err = injector.retrieve::<Faulty>().err().expect("Faulty was never scanned");
    assert!(matches!(err, InjectorError::NoSuchSingleton(key) if key == TypeKey::of::<Faulty>()));
}

#[test]
fn test_inject_returns_distinct_instances_with_shared_dependencies() {
    let injector = foo_bar_baz();
    injector.scan_components("app").unwrap();

    let first = injector.inject::<Foo>().expect("Foo has no dependencies");
    let second = injector.inject::<Foo>().expect("Foo has no dependencies");
    let singleton = injector.retrieve::<Foo>().unwrap();
    assert_ne!(first.serial, second.serial, "each inject builds a new Foo");
    assert_ne!(first.serial, singleton.serial, "inject never hands out the singleton");

    let first = injector.inject::<Baz>().expect("Bar is a singleton");
    let second = injector.inject::<Baz>().expect("Bar is a singleton");
    assert!(Arc::ptr_eq(&first.bar, &second.bar));
    assert!(Arc::ptr_eq(&first.bar, &injector.retrieve::<Bar>().unwrap()));
    assert_eq!(injector.registry().unwrap().len(), 3, "inject never registers");
}

#[test]
fn test_inject_requires_scan() {
    let injector = foo_bar_baz();
    assert!(matches!(injector.inject::<Baz>(), Err(InjectorError::NotYetScanned)));
}

#[test]
fn test_inject_with_missing_dependency() {
    let injector =
        Injector::with_discovery(StaticDiscovery::new().register::<Foo, Component>("app"));
    injector.scan_components("app").unwrap();

    let err = injector.inject::<Baz>().err().expect("Bar was never scanned");
    assert!(matches!(err, InjectorError::NoSuchSingleton(key) if key == TypeKey::of::<Bar>()));
}

#[test]
fn test_inject_failing_constructor() {
    let injector =
        Injector::with_discovery(StaticDiscovery::new().register::<Foo, Component>("app"));
    injector.scan_components("app").unwrap();

    let err = injector.inject::<Faulty>().err().expect("Faulty always fails");
    assert!(matches!(
        err,
        InjectorError::InstantiationFailed { component, .. }
            if component == TypeKey::of::<Faulty>()
    ));
}

#[test]
fn test_marker_selects_components() {
    let injector = Injector::with_discovery(
        StaticDiscovery::new()
            .register::<Foo, TestMarker>("app")
            .register::<Bar, Component>("app"),
    );

    injector.scan_marked::<TestMarker>("app").expect("Foo alone builds");
    assert!(injector.retrieve::<Foo>().is_ok());
    assert!(matches!(injector.retrieve::<Bar>(), Err(InjectorError::NoSuchSingleton(_))));
}

#[test]
fn test_concurrent_scans_publish_exactly_once() {
    let injector = Arc::new(foo_bar_baz());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let injector = Arc::clone(&injector);
            thread::spawn(move || injector.scan_components("app").is_ok())
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|handle| handle.join().expect("scan thread panicked"))
        .filter(|&ok| ok)
        .count();

    assert_eq!(successes, 1, "only one scan may win");
    assert_eq!(injector.registry().unwrap().len(), 3);
}
