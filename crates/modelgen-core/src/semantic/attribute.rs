//! Plain attributes owned by classes.

use crate::{identifier::Id, semantic::Multiplicity};

/// An owned attribute of a class.
///
/// Attributes that take part in an association are kept with
/// [`Attribute::in_association`] set; they are generated as association
/// ends rather than as attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    id: Id,
    name: String,
    class_name: String,
    type_name: Option<String>,
    default: Option<String>,
    multiplicity: Multiplicity,
    derived: bool,
    in_association: bool,
}

impl Attribute {
    /// Create an attribute with no default, no multiplicity and no flags set.
    pub fn new(
        id: Id,
        name: impl Into<String>,
        class_name: impl Into<String>,
        type_name: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            class_name: class_name.into(),
            type_name,
            default: None,
            multiplicity: Multiplicity::default(),
            derived: false,
            in_association: false,
        }
    }

    pub fn with_default_value(mut self, default: Option<String>) -> Self {
        self.default = default;
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    pub fn with_derived(mut self, derived: bool) -> Self {
        self.derived = derived;
        self
    }

    pub fn with_association(mut self, in_association: bool) -> Self {
        self.in_association = in_association;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Declared type name, exactly as written in the schema.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Default value literal, exactly as written in the schema.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    pub fn in_association(&self) -> bool {
        self.in_association
    }

    /// `Class.attribute`, the key used for overrides.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.name)
    }
}
