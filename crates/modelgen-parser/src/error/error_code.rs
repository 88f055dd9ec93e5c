//! Error codes for the modelgen diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Schema document errors
//! - `E1xx` - Override file errors
//! - `E2xx` - Model validation errors
//! - `E3xx` - Generation planning errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Schema Document Errors (E0xx)
    // =========================================================================
    /// Invalid schema document.
    ///
    /// The document is not valid TOML or an element table lacks a
    /// required field.
    E001,

    /// Duplicate element id.
    ///
    /// Two element tables declare the same id.
    E002,

    // =========================================================================
    // Override File Errors (E1xx)
    // =========================================================================
    /// Malformed override header.
    ///
    /// An `override` line has no key or a malformed `derives` clause.
    E100,

    /// Unterminated override block.
    ///
    /// The file ended before the `%%` line closing an override.
    E101,

    /// Duplicate override.
    ///
    /// The same key is overridden more than once.
    E102,

    // =========================================================================
    // Validation Errors (E2xx)
    // =========================================================================
    /// Unresolved reference.
    ///
    /// A record references an id that is not in the schema.
    E200,

    /// Malformed association.
    ///
    /// An association does not have exactly two member ends.
    E201,

    /// Missing name.
    ///
    /// An element that needs a name (navigable association end, attribute,
    /// enumeration literal, operation) has none.
    E202,

    /// Attribute without type.
    E203,

    /// No enumeration for type.
    ///
    /// An attribute's type looks like an enumeration but no enumeration
    /// has that name.
    E204,

    /// Ambiguous enumeration.
    ///
    /// Several enumerations share the attribute's type name.
    E205,

    /// Generalization cycle.
    E206,

    /// Invalid multiplicity bound.
    E207,

    /// Invalid boolean flag.
    E208,

    /// Unexpected element kind.
    ///
    /// A reference resolves to a record of the wrong kind, e.g. an
    /// association end typed by something that is not a class.
    E209,

    // =========================================================================
    // Generation Errors (E3xx)
    // =========================================================================
    /// Duplicate derived union.
    ///
    /// Two association ends declare a derived union with the same name.
    E300,

    /// Derived union cycle.
    ///
    /// Derived unions are members of each other.
    E301,

    /// Derived attribute cycle.
    ///
    /// Derived attributes derive from each other through `derives` clauses.
    E302,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Schema document errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            // Override file errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            // Validation errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
            ErrorCode::E208 => "E208",
            ErrorCode::E209 => "E209",
            // Generation errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Schema document errors
            ErrorCode::E001 => "invalid schema document",
            ErrorCode::E002 => "duplicate element id",
            // Override file errors
            ErrorCode::E100 => "malformed override header",
            ErrorCode::E101 => "unterminated override",
            ErrorCode::E102 => "duplicate override",
            // Validation errors
            ErrorCode::E200 => "unresolved reference",
            ErrorCode::E201 => "malformed association",
            ErrorCode::E202 => "missing name",
            ErrorCode::E203 => "attribute without type",
            ErrorCode::E204 => "no enumeration for type",
            ErrorCode::E205 => "ambiguous enumeration",
            ErrorCode::E206 => "generalization cycle",
            ErrorCode::E207 => "invalid multiplicity",
            ErrorCode::E208 => "invalid boolean flag",
            ErrorCode::E209 => "unexpected element kind",
            // Generation errors
            ErrorCode::E300 => "duplicate derived union",
            ErrorCode::E301 => "derived union cycle",
            ErrorCode::E302 => "derived attribute cycle",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
