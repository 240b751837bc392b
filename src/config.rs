//! Generator configuration: the binding manifest.
//!
//! A manifest declares the bindings, where constructor signatures come from,
//! and how the emitted types are named. It is read from TOML, JSON or (with
//! the `yaml` feature) YAML, picked by file extension.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codegen::SynthesisOptions;
use crate::collection::BindingCollection;
use crate::descriptors::BindingDeclaration;
use crate::error::{GenResult, GenerationError};
use crate::key::TypeKey;
use crate::type_model::SignatureMap;

/// Deserialized binding manifest.
///
/// # Examples
///
/// ```rust
/// use direct_di::GeneratorConfig;
///
/// let config = GeneratorConfig::from_toml_str(r#"
///     bindings = ["Transient<dyn Foo, FooClass>", "Scoped<dyn Bar, BarOne>"]
///
///     [output]
///     scope = "RequestScope"
///
///     [signatures]
///     FooClass = ["Arc<dyn Bar>"]
/// "#).unwrap();
///
/// assert_eq!(config.output.scope, "RequestScope");
/// assert_eq!(config.output.provider, "Provider");
/// assert_eq!(config.binding_collection().unwrap().declarations().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Contracts that must be bound
    pub require: Vec<String>,
    /// Rust files scanned for constructor signatures, relative to the manifest
    pub sources: Vec<String>,
    pub output: OutputOptions,
    pub bindings: Vec<BindingEntry>,
    /// Explicit constructor signatures, owner => parameter types
    pub signatures: BTreeMap<String, Vec<String>>,
}

/// Names used by the emitted code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputOptions {
    pub provider: String,
    pub scope: String,
    pub runtime_path: String,
    pub constructor: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        let defaults = SynthesisOptions::default();
        Self {
            provider: defaults.provider,
            scope: defaults.scope,
            runtime_path: defaults.runtime_path,
            constructor: defaults.constructor,
        }
    }
}

/// A binding as written in the manifest: compact string or table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingEntry {
    Compact(String),
    Table(BindingDeclaration),
}

impl BindingEntry {
    pub fn to_declaration(&self) -> GenResult<BindingDeclaration> {
        match self {
            BindingEntry::Compact(text) => BindingDeclaration::parse(text),
            BindingEntry::Table(declaration) => Ok(declaration.clone()),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(text: &str) -> GenResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| GenerationError::Config(format!("invalid TOML manifest: {e}")))?;
        config.validated()
    }

    pub fn from_json_str(text: &str) -> GenResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| GenerationError::Config(format!("invalid JSON manifest: {e}")))?;
        config.validated()
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(text: &str) -> GenResult<Self> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|e| GenerationError::Config(format!("invalid YAML manifest: {e}")))?;
        config.validated()
    }

    /// Loads a manifest, choosing the format from the file extension.
    pub fn from_path(path: &Path) -> GenResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenerationError::io(path, &e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&text),
            Some("json") => Self::from_json_str(&text),
            #[cfg(feature = "yaml")]
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            other => Err(GenerationError::Config(format!(
                "unsupported manifest format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Serializes back to TOML.
    pub fn to_toml_string(&self) -> GenResult<String> {
        toml::to_string(self).map_err(|e| GenerationError::Config(format!("cannot write TOML: {e}")))
    }

    fn validated(self) -> GenResult<Self> {
        self.synthesis_options()?.validate()?;
        Ok(self)
    }

    /// Declarations in manifest order.
    pub fn binding_collection(&self) -> GenResult<BindingCollection> {
        let mut collection = BindingCollection::new();
        for entry in &self.bindings {
            collection.add(entry.to_declaration()?);
        }
        Ok(collection)
    }

    /// The `[signatures]` table as a type model.
    pub fn signature_map(&self) -> GenResult<SignatureMap> {
        let mut map = SignatureMap::new();
        for (owner, parameters) in &self.signatures {
            map.insert(owner, parameters.as_slice())?;
        }
        Ok(map)
    }

    pub fn synthesis_options(&self) -> GenResult<SynthesisOptions> {
        let require = self
            .require
            .iter()
            .map(|contract| TypeKey::contract(contract))
            .collect::<GenResult<Vec<_>>>()?;

        Ok(SynthesisOptions {
            provider: self.output.provider.clone(),
            scope: self.output.scope.clone(),
            runtime_path: self.output.runtime_path.clone(),
            constructor: self.output.constructor.clone(),
            require,
        })
    }
}
