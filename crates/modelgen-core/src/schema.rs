//! Raw schema table.
//!
//! The schema table is the id-keyed collection of typed records produced by
//! the schema loader. Records keep free-form named text values and raw id
//! references; nothing is resolved at this level. Field lookups never fail:
//! an absent field is reported as `None` (or an empty slice for reference
//! lists) and it is up to the caller to decide whether that is an error.

use std::{fmt, slice};

use indexmap::IndexMap;

use crate::identifier::Id;

/// The kind tag of a schema record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Class,
    Property,
    Association,
    Generalization,
    Extension,
    Operation,
    InstanceSpecification,
    Slot,
    Stereotype,
    LiteralString,
    /// Any kind the compiler has no use for. Kept so references into it
    /// still resolve.
    Other(String),
}

impl ElementKind {
    /// Map a kind name from a schema document to its tag.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Class" => Self::Class,
            "Property" => Self::Property,
            "Association" => Self::Association,
            "Generalization" => Self::Generalization,
            "Extension" => Self::Extension,
            "Operation" => Self::Operation,
            "InstanceSpecification" => Self::InstanceSpecification,
            "Slot" => Self::Slot,
            "Stereotype" => Self::Stereotype,
            "LiteralString" => Self::LiteralString,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "Class",
            Self::Property => "Property",
            Self::Association => "Association",
            Self::Generalization => "Generalization",
            Self::Extension => "Extension",
            Self::Operation => "Operation",
            Self::InstanceSpecification => "InstanceSpecification",
            Self::Slot => "Slot",
            Self::Stereotype => "Stereotype",
            Self::LiteralString => "LiteralString",
            Self::Other(name) => name,
        };
        write!(f, "{name}")
    }
}

/// A raw reference field: a single id or an ordered list of ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    One(Id),
    Many(Vec<Id>),
}

impl Reference {
    /// All referenced ids, in declaration order.
    pub fn ids(&self) -> &[Id] {
        match self {
            Self::One(id) => slice::from_ref(id),
            Self::Many(ids) => ids,
        }
    }

    /// The first referenced id, if any.
    pub fn first(&self) -> Option<Id> {
        self.ids().first().copied()
    }
}

/// A single schema record.
#[derive(Debug, Clone)]
pub struct Record {
    id: Id,
    kind: ElementKind,
    values: IndexMap<String, String>,
    references: IndexMap<String, Reference>,
}

impl Record {
    /// Create a record without any fields.
    pub fn new(id: Id, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            values: IndexMap::new(),
            references: IndexMap::new(),
        }
    }

    /// Add a text value, replacing any previous value of the same field.
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Add a reference field, replacing any previous reference of the same field.
    pub fn with_reference(mut self, field: impl Into<String>, reference: Reference) -> Self {
        self.references.insert(field.into(), reference);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Look up a text value.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Shorthand for the `name` value.
    pub fn name(&self) -> Option<&str> {
        self.value("name")
    }

    /// The first id of a reference field.
    pub fn reference(&self, field: &str) -> Option<Id> {
        self.references.get(field).and_then(Reference::first)
    }

    /// All ids of a reference field; empty when the field is absent.
    pub fn references(&self, field: &str) -> &[Id] {
        self.references
            .get(field)
            .map(Reference::ids)
            .unwrap_or_default()
    }

    /// Check whether a reference field is present at all.
    pub fn has_reference(&self, field: &str) -> bool {
        self.references.contains_key(field)
    }
}

/// Id-keyed collection of schema records, in document order.
#[derive(Debug, Clone, Default)]
pub struct SchemaTable {
    records: IndexMap<Id, Record>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the record it replaced, if any.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.id(), record)
    }

    pub fn get(&self, id: Id) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.records.contains_key(&id)
    }

    /// Iterate records in document order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for SchemaTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(ElementKind::from_name("Class"), ElementKind::Class);
        assert_eq!(ElementKind::from_name("Slot"), ElementKind::Slot);
        assert_eq!(
            ElementKind::from_name("Diagram"),
            ElementKind::Other("Diagram".to_string())
        );
        assert_eq!(ElementKind::from_name("Diagram").to_string(), "Diagram");
    }

    #[test]
    fn test_absent_fields() {
        let record = Record::new(Id::new("p1"), ElementKind::Property);

        assert_eq!(record.name(), None);
        assert_eq!(record.reference("type"), None);
        assert!(record.references("appliedStereotype").is_empty());
        assert!(!record.has_reference("type"));
    }

    #[test]
    fn test_reference_lookup() {
        let record = Record::new(Id::new("a1"), ElementKind::Association)
            .with_reference(
                "memberEnd",
                Reference::Many(vec![Id::new("e1"), Id::new("e2")]),
            )
            .with_reference("package", Reference::One(Id::new("pkg")));

        assert_eq!(record.references("memberEnd").len(), 2);
        assert_eq!(record.reference("memberEnd"), Some(Id::new("e1")));
        assert_eq!(record.references("package"), &[Id::new("pkg")]);
    }

    #[test]
    fn test_table_preserves_order() {
        let table: SchemaTable = ["z", "a", "m"]
            .into_iter()
            .map(|id| Record::new(Id::new(id), ElementKind::Class))
            .collect();

        let ids: Vec<String> = table.records().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
        assert!(table.contains(Id::new("a")));
    }
}
