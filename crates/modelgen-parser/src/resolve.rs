//! Lazy reference resolution over the schema table.
//!
//! Records only hold raw ids. The [`Resolver`] turns them into record
//! handles when a phase actually needs them, so a dangling id is only an
//! error where it matters.

use log::trace;
use thiserror::Error;

use modelgen_core::{
    identifier::Id,
    schema::{ElementKind, Record},
};

use crate::{
    error::{Diagnostic, ErrorCode},
    loader::Schema,
};

/// Failure to follow a reference field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("`{field}` of element `{owner}` refers to unknown element `{target}`")]
    Unresolved {
        owner: Id,
        field: &'static str,
        target: Id,
    },

    #[error("`{field}` of element `{owner}` refers to `{target}`, a {found} where a {expected} is expected")]
    UnexpectedKind {
        owner: Id,
        field: &'static str,
        target: Id,
        expected: ElementKind,
        found: ElementKind,
    },
}

impl ResolveError {
    /// The element whose reference could not be followed.
    pub fn owner(&self) -> Id {
        match self {
            Self::Unresolved { owner, .. } | Self::UnexpectedKind { owner, .. } => *owner,
        }
    }

    /// Turn the error into a diagnostic pointing at the owning element.
    pub fn into_diagnostic(self, schema: &Schema) -> Diagnostic {
        let (code, label, help) = match &self {
            Self::Unresolved { .. } => (
                ErrorCode::E200,
                "dangling reference",
                "make sure every referenced element is part of the schema",
            ),
            Self::UnexpectedKind { .. } => (
                ErrorCode::E209,
                "reference to the wrong kind of element",
                "check the reference field of this element",
            ),
        };
        let span = schema.span(self.owner());
        Diagnostic::error(self.to_string())
            .with_code(code)
            .with_label_at(span, label)
            .with_help(help)
    }
}

/// Stereotype slot values attached to an association end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndTags {
    pub subsets: Vec<String>,
    pub redefines: Option<String>,
}

/// Resolves reference fields of records against a schema.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    schema: &'a Schema,
}

impl<'a> Resolver<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Look up a record by id.
    pub fn record(&self, id: Id) -> Option<&'a Record> {
        self.schema.table().get(id)
    }

    fn lookup(&self, owner: &Record, field: &'static str, target: Id) -> Result<&'a Record, ResolveError> {
        self.record(target).ok_or(ResolveError::Unresolved {
            owner: owner.id(),
            field,
            target,
        })
    }

    fn expect_kind(
        owner: &Record,
        field: &'static str,
        record: &'a Record,
        expected: &ElementKind,
    ) -> Result<&'a Record, ResolveError> {
        if record.kind() == expected {
            Ok(record)
        } else {
            Err(ResolveError::UnexpectedKind {
                owner: owner.id(),
                field,
                target: record.id(),
                expected: expected.clone(),
                found: record.kind().clone(),
            })
        }
    }

    /// Resolve the first id of a reference field.
    ///
    /// An absent field is `Ok(None)`; an id without a record is an error.
    pub fn one(&self, owner: &Record, field: &'static str) -> Result<Option<&'a Record>, ResolveError> {
        owner
            .reference(field)
            .map(|target| self.lookup(owner, field, target))
            .transpose()
    }

    /// Resolve the first id of a reference field and check its kind.
    pub fn one_of(
        &self,
        owner: &Record,
        field: &'static str,
        expected: &ElementKind,
    ) -> Result<Option<&'a Record>, ResolveError> {
        self.one(owner, field)?
            .map(|record| Self::expect_kind(owner, field, record, expected))
            .transpose()
    }

    /// Resolve every id of a reference field, in declaration order.
    pub fn many(&self, owner: &Record, field: &'static str) -> Result<Vec<&'a Record>, ResolveError> {
        owner
            .references(field)
            .iter()
            .map(|&target| self.lookup(owner, field, target))
            .collect()
    }

    /// Resolve every id of a reference field and check their kind.
    pub fn many_of(
        &self,
        owner: &Record,
        field: &'static str,
        expected: &ElementKind,
    ) -> Result<Vec<&'a Record>, ResolveError> {
        self.many(owner, field)?
            .into_iter()
            .map(|record| Self::expect_kind(owner, field, record, expected))
            .collect()
    }

    /// Name of the stereotype applied to an element.
    ///
    /// Follows `appliedStereotype[0]` to its instance specification, then
    /// `classifier[0]` to the stereotype, and returns its name. A missing
    /// link anywhere along the way means the element is not stereotyped.
    pub fn stereotype_name(&self, element: &Record) -> Result<Option<&'a str>, ResolveError> {
        let Some(instance) = self.one(element, "appliedStereotype")? else {
            return Ok(None);
        };
        let Some(stereotype) = self.one(instance, "classifier")? else {
            return Ok(None);
        };
        Ok(stereotype.name())
    }

    /// Text of a slot value: either the inline `value` text or the value
    /// of a referenced literal.
    pub fn slot_value(&self, slot: &'a Record) -> Result<Option<&'a str>, ResolveError> {
        match self.one(slot, "value")? {
            Some(literal) => Ok(literal.value("value")),
            None => Ok(slot.value("value")),
        }
    }

    /// Collect `subsets` and `redefines` tags from the stereotype slots of an
    /// association end.
    ///
    /// Values are comma separated; all whitespace is removed.
    pub fn end_tags(&self, end: &Record) -> Result<EndTags, ResolveError> {
        let mut tags = EndTags::default();

        for instance in self.many(end, "appliedStereotype")? {
            for slot in self.many(instance, "slot")? {
                let Some(feature) = self.one(slot, "definingFeature")? else {
                    continue;
                };
                let Some(value) = self.slot_value(slot)? else {
                    continue;
                };
                let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                trace!(
                    end:% = end.id(),
                    feature = feature.name().unwrap_or_default(),
                    value = value.as_str();
                    "Scanning slot"
                );

                match feature.name() {
                    Some("subsets") => {
                        tags.subsets = value
                            .split(',')
                            .filter(|name| !name.is_empty())
                            .map(str::to_string)
                            .collect();
                    }
                    Some("redefines") if !value.is_empty() => tags.redefines = Some(value),
                    _ => {}
                }
            }
        }

        Ok(tags)
    }
}
