//! Constructor signatures: the injected type model and the index built over it.
//!
//! How constructor parameter lists are discovered is not the resolver's
//! concern. It only consumes a [`TypeModel`]; two adapters ship with the
//! crate: [`SignatureMap`] (explicit entries) and [`SourceScanner`] (reads
//! Rust source with `syn` and produces a `SignatureMap`).

mod scan;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::collection::BindingTable;
use crate::error::{GenResult, GenerationError};
use crate::key::TypeKey;

pub use scan::SourceScanner;

/// A constructor's ordered parameter types, as discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSignature {
    /// The type the constructor builds
    pub owner: TypeKey,
    /// Parameter types in declaration order (still `Arc`-wrapped if written so)
    pub parameters: Vec<TypeKey>,
}

/// Query interface over the program's constructible types.
pub trait TypeModel {
    /// The constructor signature of `implementation`, or `None` if the model
    /// does not know the type.
    fn signature_of(&self, implementation: &TypeKey) -> GenResult<Option<ConstructorSignature>>;
}

impl<M: TypeModel + ?Sized> TypeModel for &M {
    fn signature_of(&self, implementation: &TypeKey) -> GenResult<Option<ConstructorSignature>> {
        (**self).signature_of(implementation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Known(Vec<TypeKey>),
    /// Found, but a parameter cannot be expressed as a contract.
    Uninjectable(String),
}

/// In-memory type model.
///
/// Lookup is exact first; otherwise a single entry whose path ends with the
/// requested one, or the other way round, is used. `a::Client` never matches
/// `b::Client`.
///
/// # Examples
///
/// ```rust
/// use direct_di::{SignatureMap, TypeKey, TypeModel};
///
/// let mut model = SignatureMap::new();
/// model.insert("FooClass", &["Arc<dyn Bar>", "Arc<dyn Baz>"]).unwrap();
///
/// let owner = TypeKey::implementation("crate::fixtures::FooClass").unwrap();
/// let signature = model.signature_of(&owner).unwrap().unwrap();
/// assert_eq!(signature.parameters.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignatureMap {
    entries: BTreeMap<TypeKey, Entry>,
}

impl SignatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the signature of `owner`.
    pub fn insert<S: AsRef<str>>(&mut self, owner: &str, parameters: &[S]) -> GenResult<&mut Self> {
        let owner = TypeKey::implementation(owner)?;
        let parameters = parameters
            .iter()
            .map(|p| TypeKey::contract(p.as_ref()))
            .collect::<GenResult<Vec<_>>>()?;
        self.entries.insert(owner, Entry::Known(parameters));
        Ok(self)
    }

    pub(crate) fn insert_key(&mut self, owner: TypeKey, parameters: Vec<TypeKey>) {
        self.entries.insert(owner, Entry::Known(parameters));
    }

    pub(crate) fn insert_uninjectable(&mut self, owner: TypeKey, reason: String) {
        self.entries.insert(owner, Entry::Uninjectable(reason));
    }

    /// Adds every entry of `other` that this map does not already define.
    pub fn merge_missing(&mut self, other: SignatureMap) {
        for (owner, entry) in other.entries {
            self.entries.entry(owner).or_insert(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, implementation: &TypeKey) -> Option<(&TypeKey, &Entry)> {
        if let Some(found) = self.entries.get_key_value(implementation) {
            return Some(found);
        }
        // Fall back to a path suffix match, so `Client` or `a::Client` finds
        // `crate::a::Client` but `b::Client` does not.
        let mut candidates = self
            .entries
            .iter()
            .filter(|(owner, _)| owner.path_matches(implementation));
        match (candidates.next(), candidates.next()) {
            (Some(found), None) => Some(found),
            _ => None,
        }
    }
}

impl TypeModel for SignatureMap {
    fn signature_of(&self, implementation: &TypeKey) -> GenResult<Option<ConstructorSignature>> {
        match self.lookup(implementation) {
            None => Ok(None),
            Some((_, Entry::Known(parameters))) => Ok(Some(ConstructorSignature {
                owner: implementation.clone(),
                parameters: parameters.clone(),
            })),
            Some((owner, Entry::Uninjectable(reason))) => Err(GenerationError::TypeModel(format!(
                "constructor of {owner} cannot be injected: {reason}"
            ))),
        }
    }
}

/// Implementation type → ordered parameter contracts, for every bound
/// implementation.
///
/// Parameters written `Arc<C>` are indexed as contract `C`. Implementations
/// the model does not know are assumed parameterless.
#[derive(Debug, Clone, Default)]
pub struct ConstructorIndex {
    signatures: HashMap<TypeKey, Vec<TypeKey>>,
}

impl ConstructorIndex {
    /// Queries `model` for every implementation referenced by `table`.
    pub fn build<M: TypeModel>(table: &BindingTable, model: &M) -> GenResult<Self> {
        let mut signatures = HashMap::new();
        let mut unknown = 0usize;

        for implementation in table.implementations() {
            let parameters = match model.signature_of(implementation)? {
                Some(signature) => signature
                    .parameters
                    .iter()
                    .map(TypeKey::unwrap_arc)
                    .collect::<GenResult<Vec<_>>>()?,
                None => {
                    warn!(
                        implementation = %implementation,
                        "no constructor signature known, assuming parameterless"
                    );
                    unknown += 1;
                    Vec::new()
                }
            };
            debug!(
                implementation = %implementation,
                parameters = parameters.len(),
                "constructor indexed"
            );
            signatures.insert(implementation.clone(), parameters);
        }

        info!(
            implementations = signatures.len(),
            assumed_parameterless = unknown,
            "constructor index built"
        );
        Ok(Self { signatures })
    }

    /// Ordered parameter contracts of `implementation`; empty when unknown.
    pub fn signature_of(&self, implementation: &TypeKey) -> &[TypeKey] {
        self.signatures
            .get(implementation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BindingCollection;

    fn key(text: &str) -> TypeKey {
        TypeKey::contract(text).unwrap()
    }

    #[test]
    fn base_name_fallback_requires_a_unique_match() {
        let mut model = SignatureMap::new();
        model
            .insert("a::Client", &["Arc<dyn Transport>"])
            .unwrap()
            .insert("b::Client", &[] as &[&str])
            .unwrap();

        let ambiguous = TypeKey::implementation("Client").unwrap();
        assert_eq!(model.signature_of(&ambiguous).unwrap(), None);

        let exact = TypeKey::implementation("a::Client").unwrap();
        assert_eq!(model.signature_of(&exact).unwrap().unwrap().parameters.len(), 1);
    }

    #[test]
    fn differently_qualified_paths_do_not_share_a_constructor() {
        let mut model = SignatureMap::new();
        model.insert("b::Client", &["Arc<dyn Transport>"]).unwrap();

        let other = TypeKey::implementation("a::Client").unwrap();
        assert_eq!(model.signature_of(&other).unwrap(), None);

        let nested = TypeKey::implementation("crate::b::Client").unwrap();
        assert_eq!(model.signature_of(&nested).unwrap().unwrap().parameters.len(), 1);

        let mut bindings = BindingCollection::new();
        bindings.add_transient("dyn Api", "a::Client");
        let table = bindings.build().unwrap();
        let index = ConstructorIndex::build(&table, &model).unwrap();
        assert!(index.signature_of(&other).is_empty());
    }

    #[test]
    fn index_strips_arc_and_defaults_to_parameterless() {
        let mut bindings = BindingCollection::new();
        bindings
            .add_transient("dyn Foo", "FooClass")
            .add_transient("dyn Bar", "BarOne");
        let table = bindings.build().unwrap();

        let mut model = SignatureMap::new();
        model
            .insert("FooClass", &["std::sync::Arc<dyn Bar>", "dyn Baz"])
            .unwrap();

        let index = ConstructorIndex::build(&table, &model).unwrap();
        assert_eq!(
            index.signature_of(&TypeKey::implementation("FooClass").unwrap()),
            &[key("dyn Bar"), key("dyn Baz")]
        );
        assert!(index
            .signature_of(&TypeKey::implementation("BarOne").unwrap())
            .is_empty());
    }

    #[test]
    fn merge_keeps_existing_entries() {
        let mut explicit = SignatureMap::new();
        explicit.insert("FooClass", &["Arc<dyn Bar>"]).unwrap();
        let mut scanned = SignatureMap::new();
        scanned
            .insert("FooClass", &[] as &[&str])
            .unwrap()
            .insert("BarOne", &[] as &[&str])
            .unwrap();

        explicit.merge_missing(scanned);
        assert_eq!(explicit.len(), 2);
        let foo = TypeKey::implementation("FooClass").unwrap();
        assert_eq!(explicit.signature_of(&foo).unwrap().unwrap().parameters.len(), 1);
    }

    #[test]
    fn uninjectable_constructor_fails_only_when_bound() {
        let mut model = SignatureMap::new();
        model.insert_uninjectable(
            TypeKey::implementation("Config").unwrap(),
            "parameter `&str` is not a bindable type".to_string(),
        );

        let mut unrelated = BindingCollection::new();
        unrelated.add_transient("dyn Foo", "FooClass");
        assert!(ConstructorIndex::build(&unrelated.build().unwrap(), &model).is_ok());

        let mut bound = BindingCollection::new();
        bound.add_transient("Config", "Config");
        assert!(matches!(
            ConstructorIndex::build(&bound.build().unwrap(), &model),
            Err(GenerationError::TypeModel(_))
        ));
    }
}
