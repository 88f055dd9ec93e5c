//! Override file parser.
//!
//! An override file replaces generated descriptors with hand-written text.
//! Each block starts with a header naming the overridden class or feature,
//! optionally followed by the features it derives from, and ends with a line
//! holding only `%%`:
//!
//! ```text
//! # comments and blank lines between blocks are ignored
//! override Element.owner derives Element.ownedMember
//! Element.owner = derived('owner', Element, 0, 1, lambda self: ...)
//! %%
//! ```
//!
//! The body is kept verbatim. Diagnostics point into the override file.

use indexmap::IndexMap;
use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::{space0, space1},
    combinator::{eof, opt, preceded, separated, terminated},
    error::{ContextError, ModalResult},
    token::take_while,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

const TERMINATOR: &str = "%%";

/// One override block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRecord {
    key: String,
    text: String,
    derives: Vec<String>,
    span: Span,
}

impl OverrideRecord {
    /// Key of the block: `Class` or `Class.feature`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replacement text, without the terminator line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Features this one is derived from, in declaration order.
    pub fn derives(&self) -> &[String] {
        &self.derives
    }

    /// Span of the header line in the override file.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// Parsed override file, keyed by `Class` or `Class.feature`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    records: IndexMap<String, OverrideRecord>,
}

impl Overrides {
    /// An override set without any entries.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&OverrideRecord> {
        self.records.get(key)
    }

    pub fn has_override(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// The `derives` list of an override; empty when there is none.
    pub fn derives(&self, key: &str) -> &[String] {
        self.records
            .get(key)
            .map(OverrideRecord::derives)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverrideRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

type IResult<O> = ModalResult<O, ContextError>;

#[derive(Debug, PartialEq, Eq)]
struct Header<'a> {
    key: &'a str,
    derives: Vec<&'a str>,
}

fn key<'a>(input: &mut &'a str) -> IResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '.')
        .verify(|key: &str| !key.starts_with('.') && !key.ends_with('.') && !key.contains(".."))
        .parse_next(input)
}

fn derives_clause<'a>(input: &mut &'a str) -> IResult<Vec<&'a str>> {
    preceded(
        (space1, "derives", space1),
        separated(1.., key, (space0, ',', space0)),
    )
    .parse_next(input)
}

fn header<'a>(input: &mut &'a str) -> IResult<Header<'a>> {
    ("override", space1).parse_next(input)?;
    let name = key.parse_next(input)?;
    let derives = terminated(opt(derives_clause), (space0, eof)).parse_next(input)?;
    Ok(Header {
        key: name,
        derives: derives.unwrap_or_default(),
    })
}

/// A block whose header has been read but whose terminator has not.
struct OpenBlock {
    key: String,
    derives: Vec<String>,
    span: Span,
    lines: Vec<String>,
}

struct OverrideParser {
    overrides: Overrides,
    diagnostics: DiagnosticCollector,
    open: Option<OpenBlock>,
}

impl OverrideParser {
    fn new() -> Self {
        Self {
            overrides: Overrides::new(),
            diagnostics: DiagnosticCollector::new(),
            open: None,
        }
    }

    fn line(&mut self, line: &str, offset: usize) {
        let span = Span::new(offset..offset + line.len());

        if let Some(block) = self.open.as_mut() {
            if line.trim_end() == TERMINATOR {
                if let Some(block) = self.open.take() {
                    self.close(block);
                }
            } else {
                block.lines.push(line.to_string());
            }
            return;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }

        match header.parse(line.trim_end()) {
            Ok(header) => {
                trace!(key = header.key; "Override block opened");
                self.open = Some(OpenBlock {
                    key: header.key.to_string(),
                    derives: header.derives.into_iter().map(str::to_string).collect(),
                    span,
                    lines: Vec::new(),
                });
            }
            Err(err) => {
                let error_span = Span::new(offset + err.offset()..span.end());
                let message = if line.starts_with("override") {
                    "malformed override header"
                } else {
                    "expected an override header"
                };
                self.diagnostics.emit(
                    Diagnostic::error(message)
                        .with_code(ErrorCode::E100)
                        .with_label(error_span, "unexpected input")
                        .with_help("use `override Class.feature [derives Other.feature, ...]`"),
                );
            }
        }
    }

    fn close(&mut self, block: OpenBlock) {
        if let Some(first) = self.overrides.get(&block.key) {
            self.diagnostics.emit(
                Diagnostic::error(format!("`{}` is overridden more than once", block.key))
                    .with_code(ErrorCode::E102)
                    .with_label(block.span, "duplicate override")
                    .with_secondary_label(first.span(), "first overridden here")
                    .with_help("merge both blocks into one"),
            );
            return;
        }

        let record = OverrideRecord {
            text: block.lines.join("\n"),
            key: block.key,
            derives: block.derives,
            span: block.span,
        };
        self.overrides.records.insert(record.key.clone(), record);
    }

    fn finish(mut self) -> Result<Overrides, ParseError> {
        if let Some(block) = self.open.take() {
            self.diagnostics.emit(
                Diagnostic::error(format!("override of `{}` is not terminated", block.key))
                    .with_code(ErrorCode::E101)
                    .with_label(block.span, "block starts here")
                    .with_help(format!("end the block with a `{TERMINATOR}` line")),
            );
        }
        self.diagnostics.finish()?;
        debug!(overrides = self.overrides.len(); "Override file parsed");
        Ok(self.overrides)
    }
}

/// Parse an override file.
///
/// # Errors
///
/// Collects every malformed header (E100), an unterminated last block
/// (E101) and duplicated keys (E102) into one [`ParseError`].
pub fn parse_overrides(source: &str) -> Result<Overrides, ParseError> {
    let mut parser = OverrideParser::new();
    let mut offset = 0;
    for raw in source.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\n', '\r']);
        parser.line(line, offset);
        offset += raw.len();
    }
    parser.finish()
}
