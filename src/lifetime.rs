//! Binding lifetimes and the activation policy derived from them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::GenerationError;

/// Binding lifetimes controlling instance sharing
///
/// # Examples
///
/// ```rust
/// use direct_di::{Activation, Lifetime};
///
/// let scoped: Lifetime = "Scoped".parse().unwrap();
/// assert_eq!(scoped, Lifetime::Scoped);
/// assert_eq!(scoped.activation(), Activation::CachedPerScope);
///
/// let transient: Lifetime = "transient".parse().unwrap();
/// assert_eq!(transient.activation(), Activation::Fresh);
///
/// // Only the two lifetimes exist
/// assert!("singleton".parse::<Lifetime>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// New instance per resolution, never cached
    ///
    /// Every activation runs the full constructor chain, no matter how many
    /// times or from how many sites the contract is requested within a scope.
    Transient,
    /// Single instance per scope, cached for the scope's lifetime
    ///
    /// The first activation in a scope constructs and stores the instance;
    /// every later activation in that scope returns the stored reference.
    /// Different scopes never share it.
    Scoped,
}

impl Lifetime {
    /// The caching strategy for activation routines of this lifetime.
    pub const fn activation(self) -> Activation {
        match self {
            Lifetime::Transient => Activation::Fresh,
            Lifetime::Scoped => Activation::CachedPerScope,
        }
    }
}

impl FromStr for Lifetime {
    type Err = GenerationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim() {
            "Transient" | "transient" => Ok(Lifetime::Transient),
            "Scoped" | "scoped" => Ok(Lifetime::Scoped),
            other => Err(GenerationError::malformed(
                other,
                "unsupported lifetime tag (expected Transient or Scoped)",
            )),
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Transient => f.write_str("Transient"),
            Lifetime::Scoped => f.write_str("Scoped"),
        }
    }
}

/// How an emitted activation routine treats its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Run the whole body and allocate a new instance on every call.
    Fresh,
    /// Read the scope's slot for the binding; construct and store under the
    /// slot's guard on first access (double-checked), then return the cached
    /// instance.
    CachedPerScope,
}

impl Activation {
    /// Whether the routine itself reads or writes scope state.
    pub const fn uses_scope_slot(self) -> bool {
        matches!(self, Activation::CachedPerScope)
    }
}
