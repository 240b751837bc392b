use direct_di::{GenerationError, Lifetime, TypeKey};
use std::collections::HashSet;

#[test]
fn test_key_equality_ignores_spacing() {
    let keys: HashSet<TypeKey> = [
        "dyn Foo",
        "dyn  Foo",
        " dyn Foo ",
        "dyn Foo + Send",
        "dyn Foo+Send",
    ]
    .iter()
    .map(|t| TypeKey::contract(t).unwrap())
    .collect();

    assert_eq!(keys.len(), 2);
}

#[test]
fn test_display_names() {
    let cases = [
        ("dyn Foo", "dyn Foo"),
        ("dyn Foo + Send + Sync", "dyn Foo + Send + Sync"),
        ("Vec < u8 >", "Vec<u8>"),
        ("crate :: config :: Settings", "crate::config::Settings"),
        ("HashMap<String,Arc<dyn Handler>>", "HashMap<String, Arc<dyn Handler>>"),
    ];
    for (input, expected) in cases {
        let key = TypeKey::contract(input).unwrap();
        assert_eq!(key.display_name(), expected);
        assert_eq!(key.to_string(), expected);
    }
}

#[test]
fn test_base_names() {
    assert_eq!(TypeKey::implementation("a::b::Client<u8>").unwrap().base_name(), Some("Client"));
    assert_eq!(TypeKey::contract("dyn Client").unwrap().base_name(), None);
}

#[test]
fn test_keys_round_trip_to_syn_types() {
    let key = TypeKey::contract("dyn Foo + Send").unwrap();
    let ty = key.to_type().unwrap();
    assert!(matches!(ty, syn::Type::TraitObject(_)));
}

#[test]
fn test_implementation_must_be_concrete() {
    assert!(matches!(
        TypeKey::implementation("dyn Foo"),
        Err(GenerationError::MalformedBinding { entry, .. }) if entry == "dyn Foo"
    ));
    assert!(TypeKey::implementation("<T as Trait>::Assoc").is_err());
}

#[test]
fn test_lifetime_tags() {
    assert_eq!("Transient".parse::<Lifetime>().unwrap(), Lifetime::Transient);
    assert_eq!("scoped".parse::<Lifetime>().unwrap(), Lifetime::Scoped);
    assert!("Singleton".parse::<Lifetime>().is_err());
    assert!("SCOPED".parse::<Lifetime>().is_err());
    assert!(Lifetime::Scoped.activation().uses_scope_slot());
    assert!(!Lifetime::Transient.activation().uses_scope_slot());
}
