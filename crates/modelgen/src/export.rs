//! Export of generation plans.
//!
//! The [`Exporter`] trait is the final stage of the pipeline: it turns an
//! ordered [`Plan`] into output text.
//!
//! # Pipeline Position
//!
//! ```text
//! Schema Text
//!     ↓ load + elaborate
//! Semantic Model
//!     ↓ plan
//! Ordered Items
//!     ↓ export (this module)
//! Generated Source
//! ```
//!
//! # Error Handling
//!
//! Export operations return [`ExportError`], which converts into
//! [`ModelgenError::Export`] at the crate boundary.
//!
//! [`ModelgenError::Export`]: crate::ModelgenError::Export

/// Python source backend.
pub mod source;

use std::fmt;

use thiserror::Error;

use crate::plan::Plan;

/// Abstraction for plan export backends.
pub trait Exporter {
    /// Export every item of `plan`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Write`] if the output sink rejects text.
    fn export_plan(&mut self, plan: &Plan) -> Result<(), ExportError>;
}

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write generated source")]
    Write(#[from] fmt::Error),
}
