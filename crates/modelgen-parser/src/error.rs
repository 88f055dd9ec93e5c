//! Error and diagnostic system for schema loading and elaboration.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! for returning from loading, override parsing, elaboration and generation.
//!
//! Diagnostics raised while elaborating the model point at the `[[element]]`
//! table of the offending record in the schema document when its span is
//! known, and carry no labels otherwise.
//!
//! # Example
//!
//! ```
//! # use modelgen_parser::error::{Diagnostic, ErrorCode};
//! # use modelgen_parser::Span;
//!
//! let span = Span::new(100..120);
//! let original_span = Span::new(50..70);
//!
//! let diag = Diagnostic::error("element `c1` is defined multiple times")
//!     .with_code(ErrorCode::E002)
//!     .with_label(span, "duplicate definition")
//!     .with_secondary_label(original_span, "first defined here")
//!     .with_help("give every element a unique id");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::{ParseError, Result};
pub use severity::Severity;
