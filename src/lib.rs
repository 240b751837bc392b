//! # direct-di
//!
//! Build-time dependency injection for Rust. Bindings are declared once; a
//! generator resolves the whole object graph ahead of time and emits plain
//! Rust that constructs it with direct calls. No reflection, no runtime
//! lookup table, no factory closures.
//!
//! ## Features
//!
//! - **Two lifetimes**: Transient (fresh per activation) and Scoped (one per scope)
//! - **Fail-fast validation**: malformed or duplicate bindings, unresolved
//!   dependencies and cycles are generation errors, never runtime surprises
//! - **Static dispatch**: `scope.get::<dyn Foo>()` compiles only when `dyn Foo` is bound
//! - **Thread-safe scopes**: concurrent first requests construct a scoped instance exactly once
//! - **Graph diagnostics**: topological order, Graphviz and JSON export
//!
//! ## Quick Start
//!
//! Declare bindings in a manifest next to `Cargo.toml`:
//!
//! ```toml
//! sources = ["src/services.rs"]
//! bindings = [
//!     "Transient<dyn Foo, FooClass>",
//!     "Transient<dyn Bar, BarOne>",
//!     "Scoped<dyn Baz, BazOne>",
//! ]
//! ```
//!
//! Generate from `build.rs` and include the result:
//!
//! ```ignore
//! // build.rs
//! fn main() {
//!     direct_di::emit_to_out_dir("bindings.toml", "container.rs").unwrap();
//! }
//!
//! // src/lib.rs
//! include!(concat!(env!("OUT_DIR"), "/container.rs"));
//!
//! let provider = Provider::new();
//! provider.with_scope(|scope| {
//!     let foo = scope.get::<dyn Foo>();
//! });
//! ```
//!
//! ## Generating in-process
//!
//! ```rust
//! use direct_di::{BindingCollection, CodeSynthesizer, ConstructorIndex, DependencyResolver, GenerationError, SignatureMap, SynthesisOptions};
//!
//! let mut bindings = BindingCollection::new();
//! bindings
//!     .add_transient("dyn Foo", "FooClass")
//!     .add_transient("dyn Bar", "BarOne");
//! let table = bindings.build().unwrap();
//!
//! let mut model = SignatureMap::new();
//! model.insert("FooClass", &["Arc<dyn Bar>", "Arc<dyn Baz>"]).unwrap();
//! let index = ConstructorIndex::build(&table, &model).unwrap();
//!
//! // `dyn Baz` has no binding
//! let err = DependencyResolver::new(&table, &index).resolve().unwrap_err();
//! assert_eq!(
//!     err,
//!     GenerationError::UnresolvedDependency {
//!         consumer: "FooClass".to_string(),
//!         missing: "dyn Baz".to_string(),
//!     }
//! );
//! ```

// Module declarations
pub mod codegen;
pub mod collection;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod generator;
pub mod graph;
pub mod key;
pub mod lifetime;
pub mod resolver;
pub mod runtime;
pub mod traits;
pub mod type_model;

// Internal modules
mod internal;

pub use codegen::{CodeSynthesizer, SynthesisOptions, GENERATED_HEADER};
pub use collection::{BindingCollection, BindingTable};
pub use config::{BindingEntry, GeneratorConfig, OutputOptions};
pub use descriptors::{Binding, BindingDeclaration};
pub use error::{GenResult, GenerationError};
pub use generator::{emit_to_out_dir, Generated, Generator};
pub use graph::{DependencyGraph, GraphNode};
pub use key::TypeKey;
pub use lifetime::{Activation, Lifetime};
pub use resolver::DependencyResolver;
pub use type_model::{ConstructorIndex, ConstructorSignature, SignatureMap, SourceScanner, TypeModel};
