//! `syn`-based discovery of constructor signatures in Rust source.

use std::path::Path;

use quote::ToTokens;
use tracing::debug;

use super::SignatureMap;
use crate::error::{GenResult, GenerationError};
use crate::key::TypeKey;

/// Scans Rust source for inherent constructors.
///
/// For every `impl T { fn new(..) }` (no receiver; the constructor name is
/// configurable) the parameter types are recorded in declaration order.
/// Inline `mod` blocks prefix the owner path; trait impls are ignored.
///
/// # Examples
///
/// ```rust
/// use direct_di::{SourceScanner, TypeKey, TypeModel};
///
/// let source = r#"
///     pub struct FooClass { bar: Arc<dyn Bar> }
///     impl FooClass {
///         pub fn new(bar: Arc<dyn Bar>) -> Self { Self { bar } }
///     }
/// "#;
///
/// let model = SourceScanner::new("new").scan_str(source, "inline").unwrap();
/// let foo = TypeKey::implementation("FooClass").unwrap();
/// let signature = model.signature_of(&foo).unwrap().unwrap();
/// assert_eq!(signature.parameters[0].display_name(), "Arc<dyn Bar>");
/// ```
#[derive(Debug, Clone)]
pub struct SourceScanner {
    constructor: String,
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new("new")
    }
}

impl SourceScanner {
    pub fn new(constructor: impl Into<String>) -> Self {
        Self {
            constructor: constructor.into(),
        }
    }

    /// Scans one file.
    pub fn scan_file(&self, path: &Path) -> GenResult<SignatureMap> {
        let source = std::fs::read_to_string(path).map_err(|e| GenerationError::io(path, &e))?;
        self.scan_str(&source, &path.display().to_string())
    }

    /// Scans several files into one model. A type defined twice keeps the
    /// first signature found.
    pub fn scan_files<P: AsRef<Path>>(&self, paths: &[P]) -> GenResult<SignatureMap> {
        let mut model = SignatureMap::new();
        for path in paths {
            model.merge_missing(self.scan_file(path.as_ref())?);
        }
        Ok(model)
    }

    /// Scans source text; `origin` names it in errors.
    pub fn scan_str(&self, source: &str, origin: &str) -> GenResult<SignatureMap> {
        let file = syn::parse_file(source)
            .map_err(|e| GenerationError::TypeModel(format!("failed to parse {origin}: {e}")))?;

        let mut model = SignatureMap::new();
        self.scan_items(&file.items, &mut Vec::new(), &mut model);
        debug!(origin, constructors = model.len(), "source scanned");
        Ok(model)
    }

    fn scan_items(&self, items: &[syn::Item], module: &mut Vec<String>, model: &mut SignatureMap) {
        for item in items {
            match item {
                syn::Item::Impl(item_impl) if item_impl.trait_.is_none() => {
                    self.scan_impl(item_impl, module, model);
                }
                syn::Item::Mod(item_mod) => {
                    if let Some((_, nested)) = &item_mod.content {
                        module.push(item_mod.ident.to_string());
                        self.scan_items(nested, module, model);
                        module.pop();
                    }
                }
                _ => {}
            }
        }
    }

    fn scan_impl(&self, item_impl: &syn::ItemImpl, module: &[String], model: &mut SignatureMap) {
        let self_ty = item_impl.self_ty.to_token_stream().to_string();
        let owner_text = if module.is_empty() {
            self_ty
        } else {
            format!("{}::{}", module.join("::"), self_ty)
        };
        let Ok(owner) = TypeKey::implementation(&owner_text) else {
            return;
        };

        let constructor = item_impl.items.iter().find_map(|item| match item {
            syn::ImplItem::Fn(method)
                if method.sig.ident == self.constructor.as_str()
                    && method.sig.receiver().is_none() =>
            {
                Some(&method.sig)
            }
            _ => None,
        });
        let Some(sig) = constructor else {
            return;
        };

        let mut parameters = Vec::with_capacity(sig.inputs.len());
        for input in &sig.inputs {
            let syn::FnArg::Typed(arg) = input else {
                continue;
            };
            match TypeKey::from_type(&arg.ty) {
                Ok(param) => parameters.push(param),
                Err(_) => {
                    let reason = format!(
                        "parameter `{}: {}` is not a bindable type",
                        arg.pat.to_token_stream(),
                        arg.ty.to_token_stream()
                    );
                    model.insert_uninjectable(owner, reason);
                    return;
                }
            }
        }
        model.insert_key(owner, parameters);
    }
}
