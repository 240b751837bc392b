//! Error types for the generation pass.

use std::path::PathBuf;

use thiserror::Error;

/// Generation errors
///
/// Every variant is fatal to the generation pass: when any of them is
/// returned, no provider source is produced.
///
/// # Examples
///
/// ```rust
/// use direct_di::{BindingCollection, GenerationError};
///
/// let mut bindings = BindingCollection::new();
/// bindings.add_transient("dyn Logger", "ConsoleLogger");
/// bindings.add_scoped("dyn Logger", "FileLogger");
///
/// match bindings.build() {
///     Err(GenerationError::DuplicateBinding(contract)) => {
///         assert_eq!(contract, "dyn Logger");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use direct_di::GenerationError;
///
/// let cyclic = GenerationError::CyclicDependency(vec![
///     "dyn A".to_string(),
///     "dyn B".to_string(),
///     "dyn A".to_string(),
/// ]);
/// assert_eq!(cyclic.to_string(), "Cyclic dependency: dyn A -> dyn B -> dyn A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A declared binding entry has an invalid shape
    #[error("Malformed binding `{entry}`: {reason}")]
    MalformedBinding { entry: String, reason: String },
    /// The same contract is bound more than once
    #[error("Duplicate binding for contract: {0}")]
    DuplicateBinding(String),
    /// A constructor parameter's contract has no binding
    #[error("Unresolved dependency: {consumer} -> {missing}")]
    UnresolvedDependency { consumer: String, missing: String },
    /// A dependency path revisits a contract (includes path)
    #[error("Cyclic dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),
    /// A dependency chain is deeper than the resolver allows
    #[error("Max resolution depth {0} exceeded")]
    DepthExceeded(usize),
    /// An entry point was requested for a contract with no binding
    #[error("Unsupported type: {0} has no binding")]
    UnsupportedType(String),
    /// The type model could not be built
    #[error("Type model error: {0}")]
    TypeModel(String),
    /// Invalid generator configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// A manifest, source or output file could not be read or written
    #[error("I/O error on {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

impl GenerationError {
    pub(crate) fn malformed(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        GenerationError::MalformedBinding {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        GenerationError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type for generation operations
///
/// A convenience alias for `Result<T, GenerationError>`.
pub type GenResult<T> = Result<T, GenerationError>;
