//! Enumerations: classes named with an enumeration suffix.

use crate::identifier::Id;

/// An enumeration with its literals in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    id: Id,
    name: String,
    literals: Vec<String>,
}

impl Enumeration {
    pub fn new(id: Id, name: impl Into<String>, literals: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            literals,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// The literal used when an attribute declares no default.
    pub fn first_literal(&self) -> Option<&str> {
        self.literals.first().map(String::as_str)
    }
}
