//! Semantic metamodel types.
//!
//! These types represent the schema after classification and resolution:
//! raw records have been turned into classes, attributes, associations and
//! enumerations with every reference resolved.
//!
//! # Pipeline Position
//!
//! ```text
//! Schema Document (TOML)
//!     ↓ load
//! Schema Table (schema)
//!     ↓ classify + propagate stereotypes + filter metaclasses + validate
//! Semantic Model (these types)
//!     ↓ plan + write
//! Generated Source
//! ```

mod association;
mod attribute;
mod class;
mod enumeration;
mod model;
mod multiplicity;

pub use association::{Association, AssociationEnd, ClassRef};
pub use attribute::Attribute;
pub use class::{Class, Operation, Stereotype, TagOrigin};
pub use enumeration::Enumeration;
pub use model::{Model, Tagging, TaggingKind};
pub use multiplicity::{Bound, Multiplicity};
