//! Modelgen Core Types
//!
//! This crate provides the foundational types of the modelgen metamodel
//! compiler:
//!
//! - **Identifiers**: string-interned element ids ([`identifier::Id`])
//! - **Schema**: the raw, id-keyed record table ([`schema`] module)
//! - **Semantic**: the classified and resolved model ([`semantic`] module)

pub mod identifier;
pub mod schema;
pub mod semantic;
