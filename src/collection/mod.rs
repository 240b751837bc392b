//! Binding collection and the validated binding table.
//!
//! The [`BindingCollection`] gathers declarations in order; [`BindingCollection::build`]
//! validates them into a [`BindingTable`], the contract → (implementation, lifetime)
//! mapping every later generation stage reads.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::descriptors::{Binding, BindingDeclaration};
use crate::error::{GenResult, GenerationError};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;

/// Ordered list of binding declarations.
///
/// # Examples
///
/// ```rust
/// use direct_di::{BindingCollection, Lifetime, TypeKey};
///
/// let mut bindings = BindingCollection::new();
/// bindings
///     .add_transient("dyn Foo", "FooClass")
///     .add_transient("dyn Bar", "BarOne")
///     .add_scoped("dyn Baz", "BazOne");
///
/// let table = bindings.build().unwrap();
/// assert_eq!(table.len(), 3);
///
/// let baz = table.get(&TypeKey::contract("dyn Baz").unwrap()).unwrap();
/// assert_eq!(baz.implementation.display_name(), "BazOne");
/// assert_eq!(baz.lifetime, Lifetime::Scoped);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BindingCollection {
    declarations: Vec<BindingDeclaration>,
}

impl BindingCollection {
    /// Creates a new empty binding collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a transient binding: a fresh implementation on every activation.
    pub fn add_transient(&mut self, contract: &str, implementation: &str) -> &mut Self {
        self.add(BindingDeclaration::new(
            Lifetime::Transient.to_string(),
            contract,
            implementation,
        ))
    }

    /// Declares a scoped binding: one implementation per scope.
    pub fn add_scoped(&mut self, contract: &str, implementation: &str) -> &mut Self {
        self.add(BindingDeclaration::new(
            Lifetime::Scoped.to_string(),
            contract,
            implementation,
        ))
    }

    /// Appends a raw declaration; validation happens in [`build`](Self::build).
    pub fn add(&mut self, declaration: BindingDeclaration) -> &mut Self {
        self.declarations.push(declaration);
        self
    }

    /// Appends a declaration in the compact `Lifetime<Contract, Implementation>` form.
    pub fn add_compact(&mut self, text: &str) -> GenResult<&mut Self> {
        let declaration = BindingDeclaration::parse(text)?;
        Ok(self.add(declaration))
    }

    /// Declarations in insertion order.
    pub fn declarations(&self) -> &[BindingDeclaration] {
        &self.declarations
    }

    /// Validates every declaration and builds the binding table.
    ///
    /// Fails on the first malformed entry or on the second declaration of a
    /// contract, even if it names the same implementation.
    pub fn build(&self) -> GenResult<BindingTable> {
        BindingTable::from_declarations(&self.declarations)
    }
}

impl Extend<BindingDeclaration> for BindingCollection {
    fn extend<I: IntoIterator<Item = BindingDeclaration>>(&mut self, iter: I) {
        self.declarations.extend(iter);
    }
}

/// Validated contract → binding mapping.
///
/// Read-only once built; iteration follows declaration order.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: Vec<Binding>,
    by_contract: HashMap<TypeKey, usize>,
}

impl BindingTable {
    /// Builds a table from declarations, in order.
    pub fn from_declarations<'a, I>(declarations: I) -> GenResult<Self>
    where
        I: IntoIterator<Item = &'a BindingDeclaration>,
    {
        let mut table = BindingTable::default();

        for (ordinal, declaration) in declarations.into_iter().enumerate() {
            let binding = Binding::from_declaration(declaration, ordinal)?;
            if table.by_contract.contains_key(&binding.contract) {
                return Err(GenerationError::DuplicateBinding(
                    binding.contract.display_name().to_string(),
                ));
            }
            debug!(
                contract = %binding.contract,
                implementation = %binding.implementation,
                lifetime = %binding.lifetime,
                "binding declared"
            );
            table.by_contract.insert(binding.contract.clone(), table.bindings.len());
            table.bindings.push(binding);
        }

        info!(
            bindings = table.bindings.len(),
            scoped = table.scoped_count(),
            "binding table built"
        );
        Ok(table)
    }

    /// The binding for a contract, if any.
    pub fn get(&self, contract: &TypeKey) -> Option<&Binding> {
        self.index_of(contract).map(|index| &self.bindings[index])
    }

    /// The binding declared at `index`.
    pub fn binding_at(&self, index: usize) -> Option<&Binding> {
        self.bindings.get(index)
    }

    /// Declaration position of a contract's binding.
    pub fn index_of(&self, contract: &TypeKey) -> Option<usize> {
        self.by_contract.get(contract).copied()
    }

    pub fn contains(&self, contract: &TypeKey) -> bool {
        self.by_contract.contains_key(contract)
    }

    /// Bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Distinct implementation types, in order of first appearance.
    pub fn implementations(&self) -> Vec<&TypeKey> {
        let mut seen = Vec::new();
        for binding in &self.bindings {
            if !seen.contains(&&binding.implementation) {
                seen.push(&binding.implementation);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Number of scoped bindings, i.e. slots each scope carries.
    pub fn scoped_count(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_scoped()).count()
    }
}
