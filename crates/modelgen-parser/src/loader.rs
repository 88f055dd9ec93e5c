//! Schema document loader.
//!
//! Turns a TOML schema document into the id-keyed [`SchemaTable`]. Each
//! `[[element]]` table becomes one [`Record`]; the byte span of the table is
//! kept so that later diagnostics can point back into the document.
//!
//! ```toml
//! [[element]]
//! id = "c1"
//! kind = "Class"
//! values = { name = "Element" }
//! references = { ownedAttribute = ["p1", "p2"] }
//! ```

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Deserialize;

use modelgen_core::{
    identifier::Id,
    schema::{ElementKind, Record, Reference, SchemaTable},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// A loaded schema: the record table plus the source span of every record.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    table: SchemaTable,
    spans: IndexMap<Id, Span>,
}

impl Schema {
    /// Wrap a table built in memory. No spans are known for its records.
    pub fn from_table(table: SchemaTable) -> Self {
        Self {
            table,
            spans: IndexMap::new(),
        }
    }

    pub fn table(&self) -> &SchemaTable {
        &self.table
    }

    /// Source span of the element table that declared `id`.
    pub fn span(&self, id: Id) -> Option<Span> {
        self.spans.get(&id).copied()
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    element: Vec<toml::Spanned<RawElement>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawElement {
    id: String,
    kind: String,
    #[serde(default)]
    values: IndexMap<String, RawValue>,
    #[serde(default)]
    references: IndexMap<String, RawReference>,
}

/// Values are text in the table; TOML integers and booleans are accepted
/// for convenience and kept as their literal text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl RawValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawReference {
    One(String),
    Many(Vec<String>),
}

impl From<RawReference> for Reference {
    fn from(raw: RawReference) -> Self {
        match raw {
            RawReference::One(id) => Reference::One(Id::new(&id)),
            RawReference::Many(ids) => Reference::Many(ids.iter().map(|id| Id::new(id)).collect()),
        }
    }
}

/// Load a schema document.
///
/// # Errors
///
/// Returns a [`ParseError`] with an E001 diagnostic when the document is not
/// valid TOML or an element lacks `id`/`kind`, and E002 diagnostics for
/// every duplicated element id.
pub fn load_schema(source: &str) -> Result<Schema, ParseError> {
    let document: Document = toml::from_str(source).map_err(|err| {
        let span = err.span().map(Span::new);
        Diagnostic::error(format!("invalid schema document: {}", err.message().trim()))
            .with_code(ErrorCode::E001)
            .with_label_at(span, "here")
            .with_help("every `[[element]]` table needs an `id` and a `kind`")
    })?;

    let mut collector = DiagnosticCollector::new();
    let mut schema = Schema::default();

    for spanned in document.element {
        let span = Span::new(spanned.span());
        let raw = spanned.into_inner();
        let id = Id::new(&raw.id);

        if let Some(first) = schema.span(id) {
            collector.emit(
                Diagnostic::error(format!("element `{}` is defined multiple times", raw.id))
                    .with_code(ErrorCode::E002)
                    .with_label(span, "duplicate definition")
                    .with_secondary_label(first, "first defined here")
                    .with_help("give every element a unique id"),
            );
            continue;
        }

        let mut record = Record::new(id, ElementKind::from_name(&raw.kind));
        for (field, value) in raw.values {
            record = record.with_value(field, value.into_text());
        }
        for (field, reference) in raw.references {
            record = record.with_reference(field, reference.into());
        }

        trace!(id = raw.id, kind = raw.kind; "Loaded schema element");
        schema.table.insert(record);
        schema.spans.insert(id, span);
    }

    collector.finish()?;

    debug!(elements = schema.table.len(); "Schema document loaded");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_elements() {
        let source = r#"
            [[element]]
            id = "c1"
            kind = "Class"
            values = { name = "Element" }
            references = { ownedAttribute = ["p1", "p2"], appliedStereotype = "is1" }

            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "count", typeValue = "Integer", lowerValue = 0, isDerived = true }
        "#;

        let schema = load_schema(source).expect("schema should load");
        let table = schema.table();
        assert_eq!(table.len(), 2);

        let class = table.get(Id::new("c1")).unwrap();
        assert_eq!(class.kind(), &ElementKind::Class);
        assert_eq!(class.name(), Some("Element"));
        assert_eq!(class.references("ownedAttribute").len(), 2);
        assert_eq!(class.reference("appliedStereotype"), Some(Id::new("is1")));

        let property = table.get(Id::new("p1")).unwrap();
        assert_eq!(property.value("lowerValue"), Some("0"));
        assert_eq!(property.value("isDerived"), Some("true"));
    }

    #[test]
    fn test_spans_point_at_element() {
        let source = "[[element]]\nid = \"c1\"\nkind = \"Class\"\n";
        let schema = load_schema(source).unwrap();

        let span = schema.span(Id::new("c1")).expect("span should be recorded");
        assert!(span.end() <= source.len());
        assert!(source[span.range()].contains("c1"));
    }

    #[test]
    fn test_unknown_kind_is_kept() {
        let source = "[[element]]\nid = \"d1\"\nkind = \"Diagram\"\n";
        let schema = load_schema(source).unwrap();

        assert_eq!(
            schema.table().get(Id::new("d1")).unwrap().kind(),
            &ElementKind::Other("Diagram".to_string())
        );
    }

    #[test]
    fn test_missing_kind_is_an_error() {
        let source = "[[element]]\nid = \"c1\"\n";
        let err = load_schema(source).unwrap_err();

        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = load_schema("[[element]\nid = ").unwrap_err();

        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
    }

    #[test]
    fn test_duplicate_ids() {
        let source = r#"
            [[element]]
            id = "c1"
            kind = "Class"

            [[element]]
            id = "c1"
            kind = "Property"
        "#;

        let err = load_schema(source).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E002));
        assert_eq!(diag.labels().len(), 2);
    }

    #[test]
    fn test_empty_document() {
        let schema = load_schema("").unwrap();
        assert!(schema.table().is_empty());
    }
}
