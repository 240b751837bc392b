//! Type keys identifying contracts and implementations.

use std::fmt;

use quote::ToTokens;
use serde::{Serialize, Serializer};

use crate::error::{GenResult, GenerationError};

/// Normalized identity of a Rust type named in a binding or a signature.
///
/// Keys are compared on their normalized text, so whitespace differences in
/// the declaration do not matter.
///
/// # Examples
///
/// ```rust
/// use direct_di::TypeKey;
///
/// let a = TypeKey::contract("dyn   Logger").unwrap();
/// let b = TypeKey::contract("dyn Logger").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.display_name(), "dyn Logger");
///
/// let repo = TypeKey::implementation("crate::repo::UserRepo<Pg>").unwrap();
/// assert_eq!(repo.display_name(), "crate::repo::UserRepo<Pg>");
/// assert_eq!(repo.base_name(), Some("UserRepo"));
///
/// assert!(TypeKey::implementation("dyn Logger").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    name: String,
    /// Path segment identifiers; empty for trait objects.
    path: Vec<String>,
}

/// Which side of a binding a key is parsed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Contract,
    Implementation,
}

impl TypeKey {
    /// Parse a contract type: a path type or a trait object.
    pub fn contract(text: &str) -> GenResult<Self> {
        Self::parse(text, Role::Contract)
    }

    /// Parse an implementation type: a concrete path type.
    pub fn implementation(text: &str) -> GenResult<Self> {
        Self::parse(text, Role::Implementation)
    }

    /// Build a key from an already parsed type, as found by the source scanner.
    pub(crate) fn from_type(ty: &syn::Type) -> GenResult<Self> {
        Self::from_parsed(ty, &render(ty), Role::Contract)
    }

    fn parse(text: &str, role: Role) -> GenResult<Self> {
        let ty: syn::Type = syn::parse_str(text.trim())
            .map_err(|e| GenerationError::malformed(text, format!("not a Rust type: {e}")))?;
        Self::from_parsed(&ty, text, role)
    }

    fn from_parsed(ty: &syn::Type, text: &str, role: Role) -> GenResult<Self> {
        let ty = strip_group(ty);
        let path: Vec<String> = match (ty, role) {
            (syn::Type::Path(path), _) => {
                if path.qself.is_some() {
                    return Err(GenerationError::malformed(
                        text,
                        "qualified self types cannot be bound",
                    ));
                }
                path.path
                    .segments
                    .iter()
                    .map(|seg| seg.ident.to_string())
                    .collect()
            }
            (syn::Type::TraitObject(_), Role::Contract) => Vec::new(),
            (syn::Type::TraitObject(_), Role::Implementation) => {
                return Err(GenerationError::malformed(
                    text,
                    "an implementation must be a concrete type, not a trait object",
                ));
            }
            _ => {
                return Err(GenerationError::malformed(
                    text,
                    "only path types and trait objects can be bound",
                ));
            }
        };

        Ok(TypeKey {
            name: render(ty),
            path,
        })
    }

    /// Human-readable, normalized type name.
    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Last path segment identifier, without module path or generics.
    ///
    /// `None` for trait objects.
    pub fn base_name(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Whether one key's path ends with the other's, e.g. `Client` or
    /// `a::Client` against `crate::a::Client`. Generics are ignored.
    pub fn path_matches(&self, other: &TypeKey) -> bool {
        let (short, long) = if self.path.len() <= other.path.len() {
            (&self.path, &other.path)
        } else {
            (&other.path, &self.path)
        };
        !short.is_empty() && long.ends_with(short.as_slice())
    }

    /// Re-parse the key into a `syn::Type` for emission.
    pub fn to_type(&self) -> GenResult<syn::Type> {
        syn::parse_str(&self.name)
            .map_err(|e| GenerationError::malformed(&self.name, format!("not a Rust type: {e}")))
    }

    /// Strip an `Arc<..>` wrapper, yielding the contract a constructor
    /// parameter asks for. Other types are returned unchanged.
    pub(crate) fn unwrap_arc(&self) -> GenResult<TypeKey> {
        let ty = self.to_type()?;
        match arc_inner(&ty) {
            Some(inner) => Self::from_parsed(inner, &self.name, Role::Contract),
            None => Ok(self.clone()),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for TypeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

fn strip_group(ty: &syn::Type) -> &syn::Type {
    match ty {
        syn::Type::Group(group) => strip_group(&group.elem),
        syn::Type::Paren(paren) => strip_group(&paren.elem),
        other => other,
    }
}

/// `Arc<T>` under any of the usual spellings.
fn arc_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let syn::Type::Path(path) = strip_group(ty) else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segments: Vec<String> = path
        .path
        .segments
        .iter()
        .map(|seg| seg.ident.to_string())
        .collect();
    let is_arc = matches!(
        segments.iter().map(String::as_str).collect::<Vec<_>>().as_slice(),
        ["Arc"] | ["sync", "Arc"] | ["std", "sync", "Arc"] | ["alloc", "sync", "Arc"]
    );
    if !is_arc {
        return None;
    }
    let last = path.path.segments.last()?;
    let syn::PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    });
    match (types.next(), types.next()) {
        (Some(inner), None) => Some(inner),
        _ => None,
    }
}

/// Render tokens the way a person would write the type.
fn render(ty: &syn::Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ' ' {
            out.push(c);
            continue;
        }
        let prev = out.chars().last();
        let next = chars.peek().copied();
        let glue = matches!(prev, Some('<') | Some(':') | Some('&') | Some('('))
            || matches!(next, Some('<') | Some('>') | Some(':') | Some(',') | Some(')'));
        if !glue {
            out.push(' ');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_generics_compactly() {
        let key = TypeKey::contract("std :: collections :: HashMap < String , Vec < u8 > >").unwrap();
        assert_eq!(key.display_name(), "std::collections::HashMap<String, Vec<u8>>");
        assert_eq!(key.base_name(), Some("HashMap"));
    }

    #[test]
    fn path_matching_is_by_suffix() {
        let full = TypeKey::implementation("crate::a::Client").unwrap();
        let bare = TypeKey::implementation("Client").unwrap();
        let partial = TypeKey::implementation("a::Client<Pg>").unwrap();
        let other = TypeKey::implementation("b::Client").unwrap();

        assert!(full.path_matches(&bare));
        assert!(partial.path_matches(&full));
        assert!(!other.path_matches(&full));
        assert!(!other.path_matches(&partial));
        assert!(!TypeKey::contract("dyn Client").unwrap().path_matches(&bare));
    }

    #[test]
    fn unwraps_arc_spellings() {
        for text in [
            "Arc<dyn Bar>",
            "std::sync::Arc<dyn Bar>",
            "::std::sync::Arc<dyn Bar>",
            "sync::Arc<dyn Bar>",
            "alloc::sync::Arc<dyn Bar>",
        ] {
            let param = TypeKey::contract(text).unwrap();
            assert_eq!(param.unwrap_arc().unwrap().display_name(), "dyn Bar", "{text}");
        }
    }

    #[test]
    fn leaves_non_arc_parameters_alone() {
        let param = TypeKey::contract("Box<dyn Bar>").unwrap();
        assert_eq!(param.unwrap_arc().unwrap(), param);
    }

    #[test]
    fn rejects_unnameable_types() {
        for text in ["impl Foo", "_", "&Foo", "(A, B)", "[u8; 4]", "fn()", "Foo<"] {
            assert!(
                matches!(
                    TypeKey::contract(text),
                    Err(GenerationError::MalformedBinding { .. })
                ),
                "{text} should be rejected"
            );
        }
    }
}
