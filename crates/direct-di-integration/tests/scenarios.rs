use direct_di_integration::fixtures::{Bar, Baz, Foo};
use direct_di_integration::{scenario_a, scenario_b, swapped};
use std::sync::Arc;

// ===== Structural equality of the realized graph =====

#[test]
fn test_all_transient_graph_matches_the_declared_signatures() {
    let provider = scenario_a::Provider::new();
    let foo = provider.get::<dyn Foo>();
    assert_eq!(foo.describe(), "FooClass(BarOne(), BazOne())");

    // The same graph is reachable from a scope
    let scope = provider.new_scope();
    assert_eq!(scope.get::<dyn Foo>().describe(), "FooClass(BarOne(), BazOne())");
}

#[test]
fn test_swapped_implementations_change_the_graph() {
    let scope = swapped::Scope::new();
    assert_eq!(
        scope.get::<dyn Foo>().describe(),
        "FooClass(BarTwo(), BazTwo())"
    );
}

// ===== Transient law =====

#[test]
fn test_transient_contracts_are_fresh_every_time() {
    let provider = scenario_a::Provider::new();

    let a = provider.get::<dyn Foo>();
    let b = provider.get::<dyn Foo>();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_ne!(a.bar().id(), b.bar().id());
    assert_ne!(a.baz().id(), b.baz().id());

    let scope = provider.new_scope();
    let x = scope.get::<dyn Bar>();
    let y = scope.get::<dyn Bar>();
    assert_ne!(x.id(), y.id());
}

// ===== Scoped law =====

#[test]
fn test_scoped_contract_is_shared_within_a_scope() {
    let provider = scenario_b::Provider::new();
    let scope = provider.new_scope();

    let first = scope.get::<dyn Foo>();
    let second = scope.get::<dyn Foo>();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.bar().id(), second.bar().id());
}

#[test]
fn test_scoped_contract_is_not_shared_across_scopes() {
    let provider = scenario_b::Provider::new();
    let one = provider.new_scope();
    let two = provider.new_scope();

    let a = one.get::<dyn Foo>();
    let b = two.get::<dyn Foo>();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a.describe(), b.describe());
}

#[test]
fn test_transient_dependencies_of_a_scoped_consumer_are_still_fresh() {
    let scope = scenario_b::Scope::new();
    let foo = scope.get::<dyn Foo>();
    let bar = scope.get::<dyn Bar>();
    assert_ne!(foo.bar().id(), bar.id());
}

#[test]
fn test_scoped_leaf_is_shared_by_transient_consumers() {
    let scope = swapped::Scope::new();
    let a = scope.get::<dyn Foo>();
    let b = scope.get::<dyn Foo>();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(a.baz(), b.baz()));
    assert!(Arc::ptr_eq(a.baz(), &scope.get::<dyn Baz>()));

    let other = swapped::Scope::new();
    assert!(!Arc::ptr_eq(a.baz(), &other.get::<dyn Baz>()));
}

#[test]
fn test_root_provider_serves_scope_free_contracts() {
    let provider = swapped::Provider::new();
    // dyn Bar needs no scope; dyn Foo and dyn Baz are only reachable through one
    assert_eq!(provider.get::<dyn Bar>().describe(), "BarTwo()");
}
