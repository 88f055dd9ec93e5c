//! # Modelgen Parser
//!
//! Front end of the modelgen metamodel compiler. This crate loads schema
//! documents, parses override files and elaborates the schema into the
//! semantic [`Model`] that generation works on.
//!
//! ## Usage
//!
//! ```
//! # use modelgen_parser::{parse, ElaborateConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         [[element]]
//!         id = "c1"
//!         kind = "Class"
//!         values = { name = "Element" }
//!     "#;
//!
//!     let model = parse(source, &ElaborateConfig::default())?;
//!     assert_eq!(model.classes().count(), 1);
//!     Ok(())
//! }
//! ```

mod elaborate;
mod elaborate_utils;
pub mod error;
mod loader;
mod metaclass;
mod overrides;
mod resolve;
mod span;
mod stereotype;
mod validate;

pub use elaborate::ElaborateConfig;
pub use loader::{Schema, load_schema};
pub use overrides::{OverrideRecord, Overrides, parse_overrides};
pub use resolve::{EndTags, ResolveError, Resolver};
pub use span::Span;

use modelgen_core::semantic::Model;

use elaborate::Builder;
use error::ParseError;

/// Elaborate a loaded schema into a semantic model.
///
/// Runs the classification pipeline over the schema table:
///
/// 1. **Classify** - Partition records into classes, enumerations and relations
/// 2. **Link** - Attach generalizations and check they are acyclic
/// 3. **Filter** - Remove metaclasses decorated by extensions
/// 4. **Tag** - Apply stereotypes and propagate them to specializations
/// 5. **Resolve** - Build attributes, operations and association ends
///
/// # Errors
///
/// Returns a [`ParseError`] holding every diagnostic found. Labels point into
/// the schema document the schema was loaded from.
pub fn elaborate(schema: &Schema, config: &ElaborateConfig) -> Result<Model, ParseError> {
    Builder::new(config, schema).build()
}

/// Load a schema document and elaborate it in one step.
///
/// # Example
///
/// ```
/// # use modelgen_parser::{parse, ElaborateConfig};
/// let model = parse("", &ElaborateConfig::default()).unwrap();
/// assert_eq!(model.classes().count(), 0);
/// ```
pub fn parse(source: &str, config: &ElaborateConfig) -> Result<Model, ParseError> {
    let schema = load_schema(source)?;
    elaborate(&schema, config)
}
