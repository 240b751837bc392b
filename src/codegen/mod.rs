//! Emission of the straight-line activation code.
//!
//! The output is a token stream of plain Rust items meant to be written to a
//! file and `include!`d: one activation function per binding, a `Scope` type
//! with a slot per scoped binding, a zero-sized root `Provider`, and the
//! `Activate` impls that make `get::<C>()` statically dispatched.

mod names;

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use tracing::{debug, info};

use crate::error::{GenResult, GenerationError};
use crate::graph::{DependencyGraph, GraphNode};
use crate::key::TypeKey;

/// Header line of every rendered artifact.
pub const GENERATED_HEADER: &str = "// @generated by direct-di. Do not edit.";

/// Names and paths the emitted code uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Root provider type name
    pub provider: String,
    /// Scope type name
    pub scope: String,
    /// Path of the runtime support module, as seen from the including crate
    pub runtime_path: String,
    /// Associated function invoked to construct implementations
    pub constructor: String,
    /// Contracts that must be bound
    pub require: Vec<TypeKey>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            provider: "Provider".to_string(),
            scope: "Scope".to_string(),
            runtime_path: "::direct_di::runtime".to_string(),
            constructor: "new".to_string(),
            require: Vec::new(),
        }
    }
}

/// Parsed forms of [`SynthesisOptions`].
struct Names {
    provider: syn::Ident,
    scope: syn::Ident,
    runtime: syn::Path,
    constructor: syn::Ident,
}

impl SynthesisOptions {
    /// Checks that every name is usable in emitted code.
    pub fn validate(&self) -> GenResult<()> {
        self.names().map(|_| ())
    }

    fn names(&self) -> GenResult<Names> {
        let names = Names {
            provider: ident("provider", &self.provider)?,
            scope: ident("scope", &self.scope)?,
            runtime: syn::parse_str(&self.runtime_path).map_err(|e| {
                GenerationError::Config(format!(
                    "runtime_path `{}` is not a Rust path: {e}",
                    self.runtime_path
                ))
            })?,
            constructor: ident("constructor", &self.constructor)?,
        };
        if names.provider == names.scope {
            return Err(GenerationError::Config(format!(
                "provider and scope types are both named `{}`",
                self.scope
            )));
        }
        Ok(names)
    }
}

fn ident(field: &str, value: &str) -> GenResult<syn::Ident> {
    syn::parse_str(value).map_err(|_| {
        GenerationError::Config(format!("{field} `{value}` is not a valid Rust identifier"))
    })
}

/// Emits code for a resolved [`DependencyGraph`].
///
/// # Examples
///
/// ```rust
/// use direct_di::{BindingCollection, CodeSynthesizer, ConstructorIndex, DependencyResolver, SignatureMap, SynthesisOptions};
///
/// let mut bindings = BindingCollection::new();
/// bindings
///     .add_transient("dyn Foo", "FooClass")
///     .add_scoped("dyn Bar", "BarOne");
/// let table = bindings.build().unwrap();
///
/// let mut model = SignatureMap::new();
/// model.insert("FooClass", &["Arc<dyn Bar>"]).unwrap();
/// let index = ConstructorIndex::build(&table, &model).unwrap();
/// let graph = DependencyResolver::new(&table, &index).resolve().unwrap();
///
/// let options = SynthesisOptions::default();
/// let tokens = CodeSynthesizer::new(&graph, &options).synthesize().unwrap();
/// let source = tokens.to_string();
/// assert!(source.contains("fn activate_0_foo"));
/// assert!(syn::parse_file(&source).is_ok());
/// ```
pub struct CodeSynthesizer<'a> {
    graph: &'a DependencyGraph,
    options: &'a SynthesisOptions,
}

impl<'a> CodeSynthesizer<'a> {
    pub fn new(graph: &'a DependencyGraph, options: &'a SynthesisOptions) -> Self {
        Self { graph, options }
    }

    /// The node serving `contract`; an unbound contract has no entry point.
    pub fn entry_point(&self, contract: &TypeKey) -> GenResult<&'a GraphNode> {
        self.graph
            .node(contract)
            .ok_or_else(|| GenerationError::UnsupportedType(contract.display_name().to_string()))
    }

    /// Fails on the first contract that has no entry point.
    pub fn require(&self, contracts: &[TypeKey]) -> GenResult<()> {
        for contract in contracts {
            self.entry_point(contract)?;
        }
        Ok(())
    }

    /// Emits the complete artifact.
    pub fn synthesize(&self) -> GenResult<TokenStream> {
        let names = self.options.names()?;
        self.require(&self.options.require)?;

        let mut activations = Vec::with_capacity(self.graph.len());
        let mut scope_entries = Vec::with_capacity(self.graph.len());
        let mut provider_entries = Vec::new();
        for node in self.graph.nodes() {
            activations.push(self.activation_fn(node, &names)?);
            scope_entries.push(self.entry_impl(node, &names.scope, &names)?);
            if !node.requires_scope {
                provider_entries.push(self.entry_impl(node, &names.provider, &names)?);
            }
        }

        let scope_type = self.scope_type(&names)?;
        let provider_type = self.provider_type(&names);

        info!(
            activations = activations.len(),
            scope_entries = scope_entries.len(),
            provider_entries = provider_entries.len(),
            "code synthesized"
        );

        Ok(quote! {
            #(#activations)*
            #scope_type
            #provider_type
            #(#scope_entries)*
            #(#provider_entries)*
        })
    }

    fn activation_fn(&self, node: &GraphNode, names: &Names) -> GenResult<TokenStream> {
        let binding = &node.binding;
        let fn_name = names::activation_fn(binding);
        let contract = binding.contract.to_type()?;
        let implementation = binding.implementation.to_type()?;
        let constructor = &names.constructor;
        let scope = &names.scope;

        let arguments = node.dependencies.iter().map(|&dep| {
            let dep = &self.graph.nodes()[dep];
            let dep_fn = names::activation_fn(&dep.binding);
            if dep.requires_scope {
                quote!(#dep_fn(scope))
            } else {
                quote!(#dep_fn())
            }
        });

        let construct = quote! {
            let instance: ::std::sync::Arc<#contract> =
                ::std::sync::Arc::new(<#implementation>::#constructor(#(#arguments),*));
            instance
        };

        let body = if binding.lifetime.activation().uses_scope_slot() {
            let slot = names::slot_field(binding);
            quote! {
                scope.#slot.get_or_activate_until(&scope.released, || { #construct })
            }
        } else {
            construct
        };

        debug!(
            contract = %binding.contract,
            function = %fn_name,
            requires_scope = node.requires_scope,
            "activation emitted"
        );

        Ok(if node.requires_scope {
            quote! {
                fn #fn_name(scope: &#scope) -> ::std::sync::Arc<#contract> {
                    #body
                }
            }
        } else {
            quote! {
                fn #fn_name() -> ::std::sync::Arc<#contract> {
                    #body
                }
            }
        })
    }

    fn entry_impl(&self, node: &GraphNode, target: &syn::Ident, names: &Names) -> GenResult<TokenStream> {
        let contract = node.binding.contract.to_type()?;
        let fn_name = names::activation_fn(&node.binding);
        let runtime = &names.runtime;
        let call = if node.requires_scope {
            quote!(#fn_name(self))
        } else {
            quote!(#fn_name())
        };
        Ok(quote! {
            impl #runtime::Activate<#contract> for #target {
                fn activate(&self) -> ::std::sync::Arc<#contract> {
                    #call
                }
            }
        })
    }

    fn scope_type(&self, names: &Names) -> GenResult<TokenStream> {
        let Names { scope, runtime, .. } = names;

        let mut fields = Vec::new();
        let mut inits = Vec::new();
        for node in self.graph.nodes().iter().filter(|n| n.binding.is_scoped()) {
            let slot = names::slot_field(&node.binding);
            let contract = node.binding.contract.to_type()?;
            fields.push(quote!(#slot: #runtime::ScopeSlot<::std::sync::Arc<#contract>>));
            inits.push(quote!(#slot: #runtime::ScopeSlot::new()));
        }

        // Dependents are cleared before the instances they hold.
        let releases = self
            .graph
            .topological_order()
            .rev()
            .filter(|n| n.binding.is_scoped())
            .map(|n| {
                let slot = names::slot_field(&n.binding);
                quote!(let _ = self.#slot.take();)
            });

        Ok(quote! {
            /// Unit of work owning one instance of each scoped binding.
            #[derive(Debug)]
            #[allow(dead_code)]
            pub struct #scope {
                #(#fields,)*
                released: #runtime::ReleaseFlag,
            }

            #[allow(dead_code)]
            impl #scope {
                pub fn new() -> Self {
                    Self {
                        #(#inits,)*
                        released: #runtime::ReleaseFlag::new(),
                    }
                }

                /// Opens an independent sibling scope; nothing is shared with `self`.
                pub fn new_scope(&self) -> Self {
                    Self::new()
                }

                /// Activates contract `C` within this scope.
                pub fn get<C: ?Sized>(&self) -> ::std::sync::Arc<C>
                where
                    Self: #runtime::Activate<C>,
                {
                    <Self as #runtime::Activate<C>>::activate(self)
                }

                /// Drops the scoped instances. Only the first call does any
                /// work and returns `true`; later scoped requests are served
                /// uncached.
                pub fn release(&self) -> bool {
                    if !self.released.trip() {
                        return false;
                    }
                    #(#releases)*
                    true
                }

                pub fn is_released(&self) -> bool {
                    self.released.is_tripped()
                }
            }

            impl ::std::default::Default for #scope {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl ::std::ops::Drop for #scope {
                fn drop(&mut self) {
                    #scope::release(self);
                }
            }

            impl #runtime::Release for #scope {
                fn release(&self) -> bool {
                    #scope::release(self)
                }
            }
        })
    }

    fn provider_type(&self, names: &Names) -> TokenStream {
        let Names {
            provider,
            scope,
            runtime,
            ..
        } = names;

        quote! {
            /// Root provider. Serves contracts that need no scope and opens scopes.
            #[derive(Debug, Clone, Copy, Default)]
            pub struct #provider;

            #[allow(dead_code)]
            impl #provider {
                pub const fn new() -> Self {
                    #provider
                }

                pub fn new_scope(&self) -> #scope {
                    #scope::new()
                }

                /// Activates contract `C` without a scope.
                pub fn get<C: ?Sized>(&self) -> ::std::sync::Arc<C>
                where
                    Self: #runtime::Activate<C>,
                {
                    <Self as #runtime::Activate<C>>::activate(self)
                }

                /// Runs `f` in a fresh scope that is released afterwards.
                pub fn with_scope<R, F>(&self, f: F) -> R
                where
                    F: FnOnce(&#scope) -> R,
                {
                    <Self as #runtime::ScopeFactory>::with_scope(self, f)
                }
            }

            impl #runtime::ScopeFactory for #provider {
                type Scope = #scope;

                fn new_scope(&self) -> #scope {
                    #scope::new()
                }
            }
        }
    }
}

/// Renders tokens as the text of a generated file.
///
/// Top-level items go on their own lines below [`GENERATED_HEADER`].
pub fn render(tokens: &TokenStream) -> GenResult<String> {
    let file: syn::File = syn::parse2(tokens.clone()).map_err(|e| {
        GenerationError::TypeModel(format!("emitted code does not parse: {e}"))
    })?;

    let mut out = String::from(GENERATED_HEADER);
    out.push('\n');
    for item in &file.items {
        out.push('\n');
        out.push_str(&item.to_token_stream().to_string());
        out.push('\n');
    }
    Ok(out)
}
