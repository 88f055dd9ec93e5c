//! The elaborated model handed to generation.

use std::fmt;

use indexmap::IndexMap;

use crate::{
    identifier::Id,
    semantic::{Association, Class, Enumeration},
};

/// How a class came to carry a stereotype tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggingKind {
    /// The stereotype is applied to the class itself.
    Applied,
    /// The tag was inherited from a tagged ancestor.
    Propagated,
    /// An inherited tag met a different explicit tag; the explicit one is kept.
    Conflict { kept: String },
}

/// One stereotype tagging event, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagging {
    class_name: String,
    stereotype: String,
    kind: TaggingKind,
}

impl Tagging {
    pub fn new(class_name: impl Into<String>, stereotype: impl Into<String>, kind: TaggingKind) -> Self {
        Self {
            class_name: class_name.into(),
            stereotype: stereotype.into(),
            kind,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn stereotype(&self) -> &str {
        &self.stereotype
    }

    pub fn kind(&self) -> &TaggingKind {
        &self.kind
    }
}

impl fmt::Display for Tagging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TaggingKind::Applied => write!(
                f,
                "class '{}' has been stereotyped as '{}'",
                self.class_name, self.stereotype
            ),
            TaggingKind::Propagated => write!(
                f,
                "class '{}' has been stereotyped as '{}' too",
                self.class_name, self.stereotype
            ),
            TaggingKind::Conflict { kept } => write!(
                f,
                "class '{}' is stereotyped as '{}' and inherits '{}'; both apply, '{}' is kept",
                self.class_name, kept, self.stereotype, kept
            ),
        }
    }
}

/// Classified, resolved metamodel.
///
/// Classes and enumerations keep schema document order, which is also the
/// order generation visits them in.
#[derive(Debug, Clone, Default)]
pub struct Model {
    classes: IndexMap<Id, Class>,
    enumerations: IndexMap<Id, Enumeration>,
    associations: Vec<Association>,
    /// Removed metaclasses with their direct specializations.
    metaclasses: IndexMap<Id, Vec<Id>>,
    taggings: Vec<Tagging>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: Class) {
        self.classes.insert(class.id(), class);
    }

    pub fn add_enumeration(&mut self, enumeration: Enumeration) {
        self.enumerations.insert(enumeration.id(), enumeration);
    }

    pub fn add_association(&mut self, association: Association) {
        self.associations.push(association);
    }

    pub fn record_tagging(&mut self, tagging: Tagging) {
        self.taggings.push(tagging);
    }

    /// Remove a class from the emission set and remember it as a metaclass.
    ///
    /// The removed class's specializations stay reachable through
    /// [`Model::specializations`]. Returns the removed class, or `None` if the
    /// id was not a class.
    pub fn remove_metaclass(&mut self, id: Id) -> Option<Class> {
        let removed = self.classes.shift_remove(&id)?;
        self.metaclasses
            .insert(id, removed.specializations().to_vec());
        Some(removed)
    }

    /// Classes in the emission set, in document order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    pub fn class(&self, id: Id) -> Option<&Class> {
        self.classes.get(&id)
    }

    pub fn class_mut(&mut self, id: Id) -> Option<&mut Class> {
        self.classes.get_mut(&id)
    }

    pub fn enumerations(&self) -> impl Iterator<Item = &Enumeration> {
        self.enumerations.values()
    }

    /// All enumerations with the given name. More than one is a schema error.
    pub fn enumerations_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Enumeration> {
        self.enumerations.values().filter(move |e| e.name() == name)
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub fn is_metaclass(&self, id: Id) -> bool {
        self.metaclasses.contains_key(&id)
    }

    /// Direct specializations of a class or of a removed metaclass.
    pub fn specializations(&self, id: Id) -> &[Id] {
        match self.classes.get(&id) {
            Some(class) => class.specializations(),
            None => self.metaclasses.get(&id).map(Vec::as_slice).unwrap_or_default(),
        }
    }

    /// Stereotype taggings in the order they were applied.
    pub fn taggings(&self) -> &[Tagging] {
        &self.taggings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_metaclass() {
        let mut model = Model::new();
        model.add_class(Class::new(Id::new("c1"), "Element"));
        model.add_class(Class::new(Id::new("c2"), "Class"));

        assert!(model.remove_metaclass(Id::new("c2")).is_some());
        assert!(model.remove_metaclass(Id::new("c3")).is_none());

        assert!(model.is_metaclass(Id::new("c2")));
        assert!(!model.is_metaclass(Id::new("c3")));
        assert_eq!(model.classes().count(), 1);
    }

    #[test]
    fn test_metaclass_keeps_specializations() {
        let mut model = Model::new();
        let mut meta = Class::new(Id::new("m"), "Class");
        meta.add_specialization(Id::new("leaf"));
        model.add_class(meta);
        model.add_class(Class::new(Id::new("leaf"), "Leaf"));

        model.remove_metaclass(Id::new("m"));

        assert_eq!(model.specializations(Id::new("m")), &[Id::new("leaf")]);
        assert!(model.specializations(Id::new("leaf")).is_empty());
        assert!(model.specializations(Id::new("unknown")).is_empty());
    }

    #[test]
    fn test_tagging_display() {
        let applied = Tagging::new("Comment", "SimpleAttribute", TaggingKind::Applied);
        let propagated = Tagging::new("Note", "SimpleAttribute", TaggingKind::Propagated);

        assert_eq!(
            applied.to_string(),
            "class 'Comment' has been stereotyped as 'SimpleAttribute'"
        );
        assert_eq!(
            propagated.to_string(),
            "class 'Note' has been stereotyped as 'SimpleAttribute' too"
        );
    }

    #[test]
    fn test_enumerations_named() {
        let mut model = Model::new();
        model.add_enumeration(Enumeration::new(
            Id::new("e1"),
            "AggregationKind",
            vec!["none".into(), "shared".into(), "composite".into()],
        ));

        assert_eq!(model.enumerations_named("AggregationKind").count(), 1);
        assert_eq!(model.enumerations_named("VisibilityKind").count(), 0);
    }
}
