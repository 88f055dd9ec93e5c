//! Value extraction helpers for the elaboration phase.
//!
//! Records carry their values as free-form text. These helpers read a named
//! value and turn it into a typed one, reporting malformed text as a
//! diagnostic that points at the record.

use modelgen_core::{
    schema::Record,
    semantic::{Bound, Multiplicity},
};

use crate::{
    error::{Diagnostic, ErrorCode, Result as DiagnosticResult},
    loader::Schema,
};

/// Read the `name` of a record that must have one.
///
/// # Arguments
/// * `record` - The record to read from
/// * `what` - Display name of the element for error messages (e.g., "operation")
pub fn required_name<'r>(schema: &Schema, record: &'r Record, what: &str) -> DiagnosticResult<&'r str> {
    match record.name() {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(Diagnostic::error(format!("{what} `{}` has no name", record.id()))
            .with_code(ErrorCode::E202)
            .with_label_at(schema.span(record.id()), format!("unnamed {what}"))
            .with_help("add a `name` value to this element")),
    }
}

/// Parse a single multiplicity bound value.
///
/// An absent or empty value is `None`.
pub fn parse_bound(schema: &Schema, record: &Record, field: &str) -> DiagnosticResult<Option<Bound>> {
    let Some(text) = record.value(field).filter(|text| !text.trim().is_empty()) else {
        return Ok(None);
    };
    text.parse::<Bound>().map(Some).map_err(|err| {
        Diagnostic::error(format!("invalid `{field}` of element `{}`: {err}", record.id()))
            .with_code(ErrorCode::E207)
            .with_label_at(schema.span(record.id()), "invalid multiplicity")
            .with_help("bounds are non-negative integers or `*`")
    })
}

/// Parse the declared multiplicity of a property.
pub fn parse_multiplicity(schema: &Schema, record: &Record) -> DiagnosticResult<Multiplicity> {
    let lower = parse_bound(schema, record, "lowerValue")?;
    let upper = parse_bound(schema, record, "upperValue")?;
    Ok(Multiplicity::new(lower, upper))
}

/// Parse a boolean flag value. An absent value is `false`.
///
/// Accepts `1`, `0`, `true` and `false`, case-insensitive.
pub fn parse_flag(schema: &Schema, record: &Record, field: &str) -> DiagnosticResult<bool> {
    let Some(text) = record.value(field) else {
        return Ok(false);
    };
    match text.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" => Ok(false),
        "1" | "true" => Ok(true),
        _ => Err(Diagnostic::error(format!(
            "invalid `{field}` of element `{}`: `{text}` is not a boolean",
            record.id()
        ))
        .with_code(ErrorCode::E208)
        .with_label_at(schema.span(record.id()), "invalid flag")
        .with_help("use `true`, `false`, `1` or `0`")),
    }
}

/// Read an optional text value, treating empty text as absent.
pub fn optional_text(record: &Record, field: &str) -> Option<String> {
    record
        .value(field)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
