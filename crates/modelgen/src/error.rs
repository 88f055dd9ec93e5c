//! Error types for modelgen operations.
//!
//! This module provides the main error type [`ModelgenError`] which wraps
//! the error conditions that can occur while compiling a schema.

use std::io;

use thiserror::Error;

use modelgen_parser::error::ParseError;

use crate::export::ExportError;

/// The main error type for modelgen operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries every diagnostic found together with the text
/// its spans point into: the schema for loading, elaboration and planning
/// errors, the override file for override errors.
#[derive(Debug, Error)]
pub enum ModelgenError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl ModelgenError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
