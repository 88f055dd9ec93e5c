//! Modelgen - a metamodel compiler.
//!
//! Reads a UML-like schema and writes a Python module that declares one
//! class per metamodel class and one property descriptor per attribute,
//! association end, derived union and redefinition. Hand-written overrides
//! replace generated definitions.

pub mod config;

mod descriptor;
mod error;
mod export;
mod overrides;
mod plan;

pub use modelgen_core::{identifier, semantic};
pub use modelgen_parser::Overrides;

pub use error::ModelgenError;
pub use export::ExportError;
pub use overrides::{NoOverrides, OverrideRegistry};

use log::{debug, info, trace};

use modelgen_parser::{Schema, error::Diagnostic};

use config::AppConfig;
use export::{Exporter, source::SourceBuilder};
use plan::Planner;

/// An elaborated schema, ready for generation.
///
/// Keeps the schema text so diagnostics found during generation can still
/// point into it.
#[derive(Debug)]
pub struct Metamodel {
    source: String,
    schema: Schema,
    model: semantic::Model,
}

impl Metamodel {
    pub fn model(&self) -> &semantic::Model {
        &self.model
    }
}

/// A generated Python module.
///
/// Carries the warnings found while planning it; their labels point into
/// the schema text.
#[derive(Debug)]
pub struct Module {
    python: String,
    warnings: Vec<Diagnostic>,
}

impl Module {
    pub fn python(&self) -> &str {
        &self.python
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_python(self) -> String {
        self.python
    }
}

/// Builder for compiling schemas into Python source.
///
/// # Examples
///
/// ```rust,no_run
/// use modelgen::{ModelBuilder, NoOverrides, config::AppConfig};
///
/// let source = std::fs::read_to_string("uml.toml").expect("Failed to read");
///
/// let builder = ModelBuilder::new(AppConfig::default());
///
/// // Load and elaborate the schema
/// let metamodel = builder.parse(&source)
///     .expect("Failed to parse");
///
/// // Generate the Python module
/// let module = builder.generate(&metamodel, &NoOverrides)
///     .expect("Failed to generate");
/// for warning in module.warnings() {
///     eprintln!("{warning}");
/// }
/// ```
#[derive(Default)]
pub struct ModelBuilder {
    config: AppConfig,
}

impl ModelBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Naming conventions and output settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Load and elaborate a schema.
    ///
    /// # Errors
    ///
    /// Returns [`ModelgenError::Parse`] with every diagnostic found while
    /// loading, resolving and validating the schema.
    pub fn parse(&self, source: &str) -> Result<Metamodel, ModelgenError> {
        info!("Parsing schema");

        let schema = modelgen_parser::load_schema(source)
            .map_err(|err| ModelgenError::new_parse_error(err, source))?;
        let model = modelgen_parser::elaborate(&schema, &self.config.naming().elaborate_config())
            .map_err(|err| ModelgenError::new_parse_error(err, source))?;

        debug!(
            classes = model.classes().count(),
            associations = model.associations().len();
            "Schema parsed successfully"
        );
        trace!(model:?; "Elaborated model");

        Ok(Metamodel {
            source: source.to_string(),
            schema,
            model,
        })
    }

    /// Parse an override file.
    ///
    /// # Errors
    ///
    /// Returns [`ModelgenError::Parse`] for malformed headers, unterminated
    /// blocks and duplicate keys.
    pub fn parse_overrides(&self, source: &str) -> Result<Overrides, ModelgenError> {
        info!("Parsing overrides");
        modelgen_parser::parse_overrides(source)
            .map_err(|err| ModelgenError::new_parse_error(err, source))
    }

    /// Generate the Python module for a metamodel.
    ///
    /// Nothing is produced unless the whole metamodel plans without errors.
    ///
    /// # Errors
    ///
    /// Returns [`ModelgenError::Parse`] for generation diagnostics, such as
    /// missing enumerations or derived union cycles.
    pub fn generate(
        &self,
        metamodel: &Metamodel,
        overrides: &dyn OverrideRegistry,
    ) -> Result<Module, ModelgenError> {
        info!("Planning generation");
        let plan = Planner::new(
            &metamodel.model,
            &metamodel.schema,
            overrides,
            self.config.naming(),
        )
        .build()
        .map_err(|err| ModelgenError::new_parse_error(err, metamodel.source.as_str()))?;

        let mut source = SourceBuilder::new(self.config.output().properties_module())
            .with_overrides(overrides)
            .build();
        source.export_plan(&plan)?;

        info!(
            items = plan.items().len(),
            warnings = plan.warnings().len();
            "Source generated successfully"
        );
        Ok(Module {
            python: source.into_string(),
            warnings: plan.into_warnings(),
        })
    }

    /// Parse a schema and generate its Python module in one step.
    ///
    /// # Errors
    ///
    /// See [`ModelBuilder::parse`] and [`ModelBuilder::generate`].
    pub fn compile(
        &self,
        source: &str,
        overrides: &dyn OverrideRegistry,
    ) -> Result<Module, ModelgenError> {
        let metamodel = self.parse(source)?;
        self.generate(&metamodel, overrides)
    }
}
