//! Binding declarations and validated bindings.

use quote::ToTokens;
use serde::{Deserialize, Serialize};

use crate::error::{GenResult, GenerationError};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;

/// One entry of the declarative binding list, as written by the user.
///
/// Nothing is validated until the entry goes through a
/// [`BindingCollection`](crate::BindingCollection).
///
/// # Examples
///
/// ```rust
/// use direct_di::BindingDeclaration;
///
/// let decl = BindingDeclaration::parse("Scoped<dyn Foo, FooClass>").unwrap();
/// assert_eq!(decl.lifetime, "Scoped");
/// assert_eq!(decl.contract, "dyn Foo");
/// assert_eq!(decl.implementation, "FooClass");
///
/// // Exactly two type arguments are required
/// assert!(BindingDeclaration::parse("Scoped<dyn Foo>").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingDeclaration {
    /// Lifetime tag (`Transient` or `Scoped`)
    pub lifetime: String,
    /// Contract type consumers depend on
    pub contract: String,
    /// Concrete type constructed to satisfy the contract
    pub implementation: String,
}

impl BindingDeclaration {
    pub fn new(
        lifetime: impl Into<String>,
        contract: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        Self {
            lifetime: lifetime.into(),
            contract: contract.into(),
            implementation: implementation.into(),
        }
    }

    /// Parse the compact `Lifetime<Contract, Implementation>` form.
    pub fn parse(text: &str) -> GenResult<Self> {
        let ty: syn::Type = syn::parse_str(text.trim())
            .map_err(|e| GenerationError::malformed(text, format!("not a binding: {e}")))?;
        let syn::Type::Path(path) = ty else {
            return Err(GenerationError::malformed(
                text,
                "expected `Lifetime<Contract, Implementation>`",
            ));
        };
        let Some(tag) = path.path.segments.last() else {
            return Err(GenerationError::malformed(text, "missing lifetime tag"));
        };
        let syn::PathArguments::AngleBracketed(args) = &tag.arguments else {
            return Err(GenerationError::malformed(
                text,
                "expected `Lifetime<Contract, Implementation>`",
            ));
        };

        let types: Vec<&syn::Type> = args
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect();
        if types.len() != 2 || args.args.len() != 2 {
            return Err(GenerationError::malformed(
                text,
                format!("expected 2 type arguments, found {}", args.args.len()),
            ));
        }

        Ok(Self {
            lifetime: tag.ident.to_string(),
            contract: types[0].to_token_stream().to_string(),
            implementation: types[1].to_token_stream().to_string(),
        })
    }
}

/// A validated binding: contract, implementation and lifetime.
///
/// Immutable once built; lives for the whole generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// The bound contract
    pub contract: TypeKey,
    /// The implementation constructed for it
    pub implementation: TypeKey,
    /// Instance sharing policy
    pub lifetime: Lifetime,
    /// Position in the declaration list
    pub ordinal: usize,
}

impl Binding {
    pub(crate) fn from_declaration(decl: &BindingDeclaration, ordinal: usize) -> GenResult<Self> {
        let lifetime = decl.lifetime.parse::<Lifetime>().map_err(|_| {
            GenerationError::malformed(
                describe(decl),
                format!("unsupported lifetime tag `{}`", decl.lifetime),
            )
        })?;
        let contract = TypeKey::contract(&decl.contract)?;
        let implementation = TypeKey::implementation(&decl.implementation)?;

        Ok(Self {
            contract,
            implementation,
            lifetime,
            ordinal,
        })
    }

    /// Whether instances are cached per scope.
    pub fn is_scoped(&self) -> bool {
        self.lifetime == Lifetime::Scoped
    }
}

fn describe(decl: &BindingDeclaration) -> String {
    format!("{}<{}, {}>", decl.lifetime, decl.contract, decl.implementation)
}
