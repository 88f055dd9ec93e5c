//! Python source output.

use std::fmt::Write;

use log::{debug, info, trace};

use super::{ExportError, Exporter};
use crate::{
    overrides::OverrideRegistry,
    plan::{Item, Plan},
};

const NAMES: &str = "association, attribute, enumeration, derivedunion, redefine";

/// Builder for [`Source`].
pub struct SourceBuilder<'a> {
    properties_module: &'a str,
    overrides: Option<&'a dyn OverrideRegistry>,
}

impl<'a> SourceBuilder<'a> {
    /// `properties_module` is the module the descriptor constructors are
    /// imported from.
    pub fn new(properties_module: &'a str) -> Self {
        Self {
            properties_module,
            overrides: None,
        }
    }

    pub fn with_overrides(mut self, overrides: &'a dyn OverrideRegistry) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn build(self) -> Source<'a> {
        Source {
            properties_module: self.properties_module,
            overrides: self.overrides.unwrap_or(&crate::overrides::NoOverrides),
            out: String::new(),
        }
    }
}

/// Writes a plan as Python source into an in-memory buffer.
pub struct Source<'a> {
    properties_module: &'a str,
    overrides: &'a dyn OverrideRegistry,
    out: String,
}

impl Source<'_> {
    /// The generated text.
    pub fn into_string(self) -> String {
        self.out
    }

    fn write_header(&mut self) -> Result<(), ExportError> {
        writeln!(self.out, "# This file is generated by modelgen. DO NOT EDIT!")?;
        writeln!(self.out)?;
        writeln!(self.out, "from {} import {NAMES}", self.properties_module)?;
        Ok(())
    }

    fn write_item(&mut self, item: &Item) -> Result<(), ExportError> {
        trace!(item:?; "Writing item");
        if let Some(key) = item.key() {
            if self.overrides.write_override(&mut self.out, key)? {
                return Ok(());
            }
        }
        match item {
            Item::Comment(text) => writeln!(self.out, "{text}")?,
            Item::ClassDef { name, bases } if bases.is_empty() => {
                writeln!(self.out, "class {name}: pass")?
            }
            Item::ClassDef { name, bases } => {
                writeln!(self.out, "class {name}({}): pass", bases.join(", "))?
            }
            Item::Property { key, descriptor } => writeln!(self.out, "{key} = {descriptor}")?,
            Item::Override(key) => debug!(key; "Override without text"),
        }
        Ok(())
    }
}

impl Exporter for Source<'_> {
    fn export_plan(&mut self, plan: &Plan) -> Result<(), ExportError> {
        self.write_header()?;
        for item in plan.items() {
            self.write_item(item)?;
        }
        info!(bytes = self.out.len(); "Source exported");
        Ok(())
    }
}
