//! CLI logic for the modelgen metamodel compiler.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Write},
};

use log::{info, warn};

use modelgen::{ModelBuilder, ModelgenError, NoOverrides};

/// Run the modelgen CLI application
///
/// Compiles the schema, applying the override file when one is given, and
/// writes the generated module to the output file or standard output. The
/// output is only written once generation has fully succeeded.
///
/// # Errors
///
/// Returns `ModelgenError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Schema and override diagnostics
/// - Generation diagnostics
pub fn run(args: &Args) -> Result<(), ModelgenError> {
    info!(
        schema_path = args.schema,
        output_path:? = args.output,
        overrides_path:? = args.overrides;
        "Compiling schema"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let builder = ModelBuilder::new(app_config);

    let source = fs::read_to_string(&args.schema)?;
    let metamodel = builder.parse(&source)?;

    let module = match &args.overrides {
        Some(path) => {
            let overrides = builder.parse_overrides(&fs::read_to_string(path)?)?;
            builder.generate(&metamodel, &overrides)?
        }
        None => builder.generate(&metamodel, &NoOverrides)?,
    };

    let warnings = error_adapter::warning_reportables(module.warnings(), &source);
    for warning in &warnings {
        warn!("{}", error_adapter::render(warning));
    }
    if !warnings.is_empty() {
        info!(summary = error_adapter::summary(&warnings); "Generated with warnings");
    }

    let python = module.into_python();
    match &args.output {
        Some(path) => {
            fs::write(path, python)?;
            info!(output_file = path; "Module written successfully");
        }
        None => io::stdout().lock().write_all(python.as_bytes())?,
    }

    Ok(())
}
