//! Classes, their stereotype tags and operations.

use std::fmt;

use crate::{identifier::Id, semantic::Attribute};

/// Where a class's stereotype tag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOrigin {
    /// Applied to the class itself in the schema.
    Explicit,
    /// Propagated from the given ancestor.
    Inherited(Id),
}

/// A stereotype tag attached to a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stereotype {
    name: String,
    origin: TagOrigin,
}

impl Stereotype {
    pub fn new(name: impl Into<String>, origin: TagOrigin) -> Self {
        Self {
            name: name.into(),
            origin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> TagOrigin {
        self.origin
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self.origin, TagOrigin::Explicit)
    }
}

/// An operation owned by a class. Only its name matters for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    id: Id,
    name: String,
    class_name: String,
}

impl Operation {
    pub fn new(id: Id, name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            class_name: class_name.into(),
        }
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

    /// `Class.operation`, the key used for overrides.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.name)
    }
}

/// A class of the metamodel with its place in the generalization graph.
#[derive(Debug, Clone)]
pub struct Class {
    id: Id,
    name: String,
    generalizations: Vec<Id>,
    specializations: Vec<Id>,
    stereotype: Option<Stereotype>,
    attributes: Vec<Attribute>,
    operations: Vec<Operation>,
}

impl Class {
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            generalizations: Vec::new(),
            specializations: Vec::new(),
            stereotype: None,
            attributes: Vec::new(),
            operations: Vec::new(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent class ids in declaration order.
    pub fn generalizations(&self) -> &[Id] {
        &self.generalizations
    }

    /// Direct child class ids.
    pub fn specializations(&self) -> &[Id] {
        &self.specializations
    }

    pub fn stereotype(&self) -> Option<&Stereotype> {
        self.stereotype.as_ref()
    }

    /// Check whether the class carries a tag with the given stereotype name.
    pub fn has_stereotype(&self, name: &str) -> bool {
        self.stereotype.as_ref().is_some_and(|s| s.name() == name)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn add_generalization(&mut self, parent: Id) {
        self.generalizations.push(parent);
    }

    pub fn add_specialization(&mut self, child: Id) {
        self.specializations.push(child);
    }

    pub fn set_stereotype(&mut self, stereotype: Stereotype) {
        self.stereotype = Some(stereotype);
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
