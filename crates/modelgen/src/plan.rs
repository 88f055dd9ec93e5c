//! Generation planning.
//!
//! Planning decides, for every class and feature of the model, what ends up
//! in the generated source, and in which order. All checks that can fail run
//! here, before anything is written, so a schema with errors never produces
//! partial output.
//!
//! # Pipeline Position
//!
//! ```text
//! Semantic Model
//!     ↓ plan (this module)
//! Ordered Items
//!     ↓ export
//! Generated Source
//! ```
//!
//! Items are grouped in a fixed order of sections: stereotype comments,
//! class definitions, attributes, associations, deferred derived attributes,
//! derived unions, redefinitions and operations.

mod association;
mod attribute;
mod classdef;
mod derived_union;

use log::{debug, info};

use modelgen_core::{identifier::Id, semantic::Model};
use modelgen_parser::{
    ElaborateConfig, Schema,
    error::{Diagnostic, DiagnosticCollector, ParseError},
};

use crate::{config::NamingConfig, overrides::OverrideRegistry};

use attribute::Deferred;
use derived_union::UnionSet;

/// One unit of generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A comment line, including its `#` prefix.
    Comment(String),
    /// A class declaration; replaced by the override keyed by the class name.
    ClassDef { name: String, bases: Vec<String> },
    /// `key = descriptor`; replaced by the override keyed by `key`.
    Property { key: String, descriptor: String },
    /// The override text of `key` and nothing else.
    Override(String),
}

impl Item {
    /// The override key this item answers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Comment(_) => None,
            Self::ClassDef { name, .. } => Some(name),
            Self::Property { key, .. } | Self::Override(key) => Some(key),
        }
    }
}

/// The ordered generation plan.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    items: Vec<Item>,
    warnings: Vec<Diagnostic>,
}

impl Plan {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Non-fatal findings, in the order planning made them.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Diagnostic> {
        self.warnings
    }

    /// Find the property item for a `Class.feature` key.
    #[cfg(test)]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            Item::Property { key: k, descriptor } if k == key => Some(descriptor.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
impl From<Vec<Item>> for Plan {
    fn from(items: Vec<Item>) -> Self {
        Self {
            items,
            warnings: Vec::new(),
        }
    }
}

/// Builds a [`Plan`] from an elaborated model.
pub struct Planner<'a> {
    model: &'a Model,
    schema: &'a Schema,
    overrides: &'a dyn OverrideRegistry,
    naming: ElaborateConfig,
    diagnostics: DiagnosticCollector,

    taggings: Vec<Item>,
    classes: Vec<Item>,
    attributes: Vec<Item>,
    associations: Vec<Item>,
    deferred: Vec<Deferred>,
    unions: UnionSet<'a>,
    redefines: Vec<Item>,
    operations: Vec<Item>,
}

impl<'a> Planner<'a> {
    /// Create a planner.
    ///
    /// # Arguments
    ///
    /// * `model` - The elaborated model
    /// * `schema` - The schema the model was elaborated from, used to point
    ///   diagnostics at elements
    /// * `overrides` - Replacement text for classes and features
    /// * `naming` - Naming conventions for enumerations and simple attributes
    pub fn new(
        model: &'a Model,
        schema: &'a Schema,
        overrides: &'a dyn OverrideRegistry,
        naming: &'a NamingConfig,
    ) -> Self {
        Self {
            model,
            schema,
            overrides,
            naming: naming.elaborate_config(),
            diagnostics: DiagnosticCollector::new(),
            taggings: Vec::new(),
            classes: Vec::new(),
            attributes: Vec::new(),
            associations: Vec::new(),
            deferred: Vec::new(),
            unions: UnionSet::default(),
            redefines: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Plan the whole model.
    ///
    /// # Errors
    ///
    /// Returns every diagnostic found: missing or ambiguous enumerations,
    /// duplicate or cyclic derived unions and cyclic derived attributes.
    pub fn build(mut self) -> Result<Plan, ParseError> {
        debug!("Planning generation");

        self.taggings = self
            .model
            .taggings()
            .iter()
            .map(|tagging| Item::Comment(format!("# {tagging}")))
            .collect();

        self.plan_classes();
        self.plan_attributes();
        self.plan_associations();
        let derived = self.plan_deferred();
        let unions = self.plan_unions();
        self.plan_operations();

        let warnings = self.diagnostics.finish_with_warnings()?;

        let items: Vec<Item> = [
            self.taggings,
            self.classes,
            self.attributes,
            self.associations,
            derived,
            unions,
            self.redefines,
            self.operations,
        ]
        .into_iter()
        .flatten()
        .collect();

        info!(items = items.len(), warnings = warnings.len(); "Generation plan completed");
        Ok(Plan { items, warnings })
    }

    fn is_simple_attribute_class(&self, id: Id) -> bool {
        self.model
            .class(id)
            .is_some_and(|class| class.has_stereotype(&self.naming.simple_attribute_stereotype))
    }
}
