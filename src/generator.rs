//! The generation driver and the `build.rs` entry point.

use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use tracing::{debug, info};

use crate::codegen::{self, CodeSynthesizer};
use crate::config::GeneratorConfig;
use crate::error::{GenResult, GenerationError};
use crate::graph::DependencyGraph;
use crate::resolver::DependencyResolver;
use crate::type_model::{ConstructorIndex, SourceScanner};

/// Runs every generation stage for one manifest.
///
/// # Examples
///
/// ```rust
/// use direct_di::{Generator, GeneratorConfig};
///
/// let config = GeneratorConfig::from_toml_str(r#"
///     bindings = [
///         "Transient<dyn Foo, FooClass>",
///         "Transient<dyn Bar, BarOne>",
///         "Scoped<dyn Baz, BazOne>",
///     ]
///
///     [signatures]
///     FooClass = ["Arc<dyn Bar>", "Arc<dyn Baz>"]
/// "#).unwrap();
///
/// let generated = Generator::new(config, ".").run().unwrap();
/// assert_eq!(generated.graph.len(), 3);
/// assert!(generated.source().unwrap().starts_with("// @generated"));
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    base_dir: PathBuf,
}

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct Generated {
    pub graph: DependencyGraph,
    pub tokens: TokenStream,
}

impl Generator {
    /// `base_dir` anchors relative `sources` entries.
    pub fn new(config: GeneratorConfig, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
        }
    }

    /// Loads a manifest; its directory anchors relative sources.
    pub fn from_manifest(path: &Path) -> GenResult<Self> {
        let config = GeneratorConfig::from_path(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(config, base_dir))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Source files scanned for constructor signatures.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.config
            .sources
            .iter()
            .map(|source| self.base_dir.join(source))
            .collect()
    }

    pub fn run(&self) -> GenResult<Generated> {
        let table = self.config.binding_collection()?.build()?;

        // Explicit signatures win over scanned ones.
        let mut model = self.config.signature_map()?;
        let scanner = SourceScanner::new(self.config.output.constructor.as_str());
        let sources = self.source_paths();
        model.merge_missing(scanner.scan_files(sources.as_slice())?);
        debug!(signatures = model.len(), "type model assembled");

        let index = ConstructorIndex::build(&table, &model)?;
        let graph = DependencyResolver::new(&table, &index).resolve()?;

        let options = self.config.synthesis_options()?;
        let tokens = CodeSynthesizer::new(&graph, &options).synthesize()?;

        info!(bindings = graph.len(), "generation complete");
        Ok(Generated { graph, tokens })
    }
}

impl Generated {
    /// Rendered file contents.
    pub fn source(&self) -> GenResult<String> {
        codegen::render(&self.tokens)
    }

    /// Renders and writes the artifact, creating parent directories.
    pub fn write_to(&self, path: &Path) -> GenResult<()> {
        let source = self.source()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| GenerationError::io(parent, &e))?;
        }
        std::fs::write(path, source).map_err(|e| GenerationError::io(path, &e))?;
        info!(path = %path.display(), "artifact written");
        Ok(())
    }
}

/// `build.rs` entry point: generates from `manifest` into `$OUT_DIR/file_name`.
///
/// Prints `cargo:rerun-if-changed` for the manifest and every scanned source.
/// On error nothing is written. Returns the path of the written file.
///
/// ```no_run
/// // build.rs
/// fn main() {
///     if let Err(e) = direct_di::emit_to_out_dir("bindings.toml", "container.rs") {
///         panic!("{e}");
///     }
/// }
/// ```
pub fn emit_to_out_dir(manifest: impl AsRef<Path>, file_name: &str) -> GenResult<PathBuf> {
    let manifest = manifest.as_ref();
    println!("cargo:rerun-if-changed={}", manifest.display());

    let generator = Generator::from_manifest(manifest)?;
    for source in generator.source_paths() {
        println!("cargo:rerun-if-changed={}", source.display());
    }

    let generated = generator.run()?;
    let out_dir = std::env::var_os("OUT_DIR")
        .ok_or_else(|| GenerationError::Config("OUT_DIR is not set".to_string()))?;
    let path = Path::new(&out_dir).join(file_name);
    generated.write_to(&path)?;
    Ok(path)
}
