/// Runtime behavior of a generated scope
///
/// Each scoped contract here is touched by a single test, so the process-wide
/// counters in the fixtures stay meaningful while tests run in parallel.

use direct_di::runtime::{Release, ScopeFactory};
use direct_di_integration::fixtures::{Clock, Connection, Handler, Logger, Tracker, CLOCK_CONSTRUCTIONS};
use direct_di_integration::request_scope::{RequestProvider, RequestScope};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Barrier, Weak};

#[test]
fn test_concurrent_first_requests_construct_once() {
    const THREADS: usize = 12;

    let scope = RequestProvider::new().new_scope();
    let barrier = Barrier::new(THREADS);
    let before = CLOCK_CONSTRUCTIONS.load(Ordering::SeqCst);

    let clocks: Vec<Arc<dyn Clock>> = crossbeam_utils::thread::scope(|s| {
        let mut handles = Vec::with_capacity(THREADS);
        for i in 0..THREADS {
            let scope = &scope;
            let barrier = &barrier;
            handles.push(s.spawn(move |_| {
                barrier.wait();
                // Half go through the transient consumer
                if i % 2 == 0 {
                    scope.get::<dyn Clock>()
                } else {
                    scope.get::<dyn Handler>().clock().clone()
                }
            }));
        }
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(CLOCK_CONSTRUCTIONS.load(Ordering::SeqCst) - before, 1);
    assert!(clocks.iter().all(|c| Arc::ptr_eq(c, &clocks[0])));
    assert_eq!(
        scope.get::<dyn Handler>().handle("GET /"),
        "[console] GET / @ 42"
    );
}

#[test]
fn test_failed_activation_is_retried() {
    let scope = RequestScope::new();

    let first = catch_unwind(AssertUnwindSafe(|| scope.get::<dyn Connection>()));
    assert!(first.is_err());

    let second = scope.get::<dyn Connection>();
    assert_eq!(second.attempt(), 2);
    assert!(Arc::ptr_eq(&second, &scope.get::<dyn Connection>()));
}

#[test]
fn test_release_is_idempotent_and_drops_instances() {
    let scope = RequestScope::new();
    let tracker = scope.get::<Tracker>();
    let weak: Weak<Tracker> = Arc::downgrade(&tracker);
    drop(tracker);
    assert!(weak.upgrade().is_some());

    assert!(!scope.is_released());
    assert!(scope.release());
    assert!(scope.is_released());
    assert!(weak.upgrade().is_none());

    assert!(!scope.release());
    assert!(!Release::release(&scope));
}

#[test]
fn test_second_release_is_a_no_op() {
    let scope = RequestScope::new();
    let cached = Arc::downgrade(&scope.get::<Tracker>());
    assert!(scope.release());
    assert!(cached.upgrade().is_none());

    // Served fresh, never cached, once released
    let held = scope.get::<Tracker>();
    assert_ne!(held.id, scope.get::<Tracker>().id);
    let weak = Arc::downgrade(&held);

    assert!(!scope.release());
    assert!(weak.upgrade().is_some());

    drop(held);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_scope_opens_independent_sibling() {
    let scope = RequestScope::new();
    let sibling = scope.new_scope();

    assert!(!Arc::ptr_eq(&scope.get::<Tracker>(), &sibling.get::<Tracker>()));
    assert!(sibling.release());
    assert!(!scope.is_released());
}

#[test]
fn test_with_scope_releases_on_return() {
    let provider = RequestProvider::new();
    let weak = provider.with_scope(|scope| Arc::downgrade(&scope.get::<Tracker>()));
    assert!(weak.upgrade().is_none());

    let weak = ScopeFactory::with_scope(&provider, |scope: &RequestScope| {
        Arc::downgrade(&scope.get::<Tracker>())
    });
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_with_scope_releases_on_unwind() {
    let provider = RequestProvider::new();
    let mut observed: Option<Weak<Tracker>> = None;

    let result = catch_unwind(AssertUnwindSafe(|| {
        provider.with_scope(|scope| {
            observed = Some(Arc::downgrade(&scope.get::<Tracker>()));
            panic!("request failed");
        })
    }));

    assert!(result.is_err());
    assert!(observed.unwrap().upgrade().is_none());
}

#[test]
fn test_root_provider_serves_transient_closure_only() {
    let provider = RequestProvider::new();
    assert_eq!(provider.get::<dyn Logger>().format("boot"), "[console] boot");
}
