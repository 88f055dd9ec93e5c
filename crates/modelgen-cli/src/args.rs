//! Command-line argument definitions for the modelgen CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the schema, output and override files,
//! the configuration file and the logging verbosity.

use clap::Parser;

/// Command-line arguments for the modelgen metamodel compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the schema file (TOML)
    #[arg(help = "Path to the schema file")]
    pub schema: String,

    /// Path to the generated Python module; standard output when omitted
    pub output: Option<String>,

    /// Path to the override file
    pub overrides: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
