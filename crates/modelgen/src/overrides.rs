//! Override registry interface.
//!
//! Generation asks the registry whether a class or feature has hand-written
//! replacement text before synthesizing a descriptor. Keys are `Class` for
//! class definitions and `Class.feature` for everything else.

use std::fmt;

use modelgen_parser::Overrides;

/// Source of replacement text for generated definitions.
pub trait OverrideRegistry {
    /// Check whether replacement text exists for `key`.
    fn has_override(&self, key: &str) -> bool;

    /// Write the replacement text for `key`, followed by a newline.
    ///
    /// Returns `Ok(true)` iff non-empty text was written. Nothing is written
    /// for a missing key or an empty replacement.
    fn write_override(&self, sink: &mut dyn fmt::Write, key: &str) -> Result<bool, fmt::Error>;

    /// Features `key` is derived from; empty when the override declares none.
    fn derives(&self, key: &str) -> &[String];
}

impl OverrideRegistry for Overrides {
    fn has_override(&self, key: &str) -> bool {
        Overrides::has_override(self, key)
    }

    fn write_override(&self, sink: &mut dyn fmt::Write, key: &str) -> Result<bool, fmt::Error> {
        let Some(record) = self.get(key) else {
            return Ok(false);
        };
        if record.text().trim().is_empty() {
            return Ok(false);
        }
        writeln!(sink, "{}", record.text())?;
        Ok(true)
    }

    fn derives(&self, key: &str) -> &[String] {
        Overrides::derives(self, key)
    }
}

/// A registry without any overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverrideRegistry for NoOverrides {
    fn has_override(&self, _key: &str) -> bool {
        false
    }

    fn write_override(&self, _sink: &mut dyn fmt::Write, _key: &str) -> Result<bool, fmt::Error> {
        Ok(false)
    }

    fn derives(&self, _key: &str) -> &[String] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use modelgen_parser::parse_overrides;

    use super::*;

    #[test]
    fn test_write_override() {
        let overrides = parse_overrides("override A.b\nA.b = property()\n%%\noverride A.c\n%%\n").unwrap();
        let registry: &dyn OverrideRegistry = &overrides;

        let mut out = String::new();
        assert!(registry.write_override(&mut out, "A.b").unwrap());
        assert_eq!(out, "A.b = property()\n");

        assert!(registry.has_override("A.c"));
        assert!(!registry.write_override(&mut out, "A.c").unwrap());
        assert!(!registry.write_override(&mut out, "A.missing").unwrap());
        assert_eq!(out, "A.b = property()\n");
    }

    #[test]
    fn test_no_overrides() {
        let mut out = String::new();
        assert!(!NoOverrides.has_override("A"));
        assert!(!NoOverrides.write_override(&mut out, "A").unwrap());
        assert!(NoOverrides.derives("A.b").is_empty());
        assert!(out.is_empty());
    }
}
