//! Property descriptor expressions.
//!
//! Each type renders one descriptor call of the target runtime through its
//! [`Display`](fmt::Display) implementation, e.g.
//! `association('ownedComment', Comment, composite=True)`.

use std::fmt;

use modelgen_core::semantic::Bound;

/// Render text as a single-quoted string literal.
pub fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render a bound; the wildcard is quoted as `'*'`.
fn bound(value: Bound) -> String {
    match value {
        Bound::Many => "'*'".to_string(),
        Bound::Count(n) => n.to_string(),
    }
}

/// Normalize a default literal: `true`/`false` become `True`/`False`.
pub fn default_literal(text: &str) -> String {
    if text.eq_ignore_ascii_case("true") {
        "True".to_string()
    } else if text.eq_ignore_ascii_case("false") {
        "False".to_string()
    } else {
        text.to_string()
    }
}

/// Map a declared type name to the runtime type.
pub fn runtime_type(type_name: &str) -> &str {
    match type_name.to_ascii_lowercase().as_str() {
        "boolean" | "integer" | "unlimitednatural" => "int",
        "string" => "str",
        _ => type_name,
    }
}

/// `attribute('name', type[, default=...][, lower=...][, upper=...])`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    name: String,
    type_name: String,
    default: Option<String>,
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default: None,
            lower: None,
            upper: None,
        }
    }

    /// Set the default literal, written verbatim.
    pub fn with_default(mut self, default: Option<String>) -> Self {
        self.default = default;
        self
    }

    /// Set the declared bounds. A lower bound of 0 and an upper bound of 1
    /// are the runtime defaults and are left out.
    pub fn with_bounds(mut self, lower: Option<Bound>, upper: Option<Bound>) -> Self {
        self.lower = lower.filter(|lower| *lower != Bound::ZERO);
        self.upper = upper.filter(|upper| *upper != Bound::ONE);
        self
    }
}

impl fmt::Display for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attribute({}, {}", quoted(&self.name), self.type_name)?;
        if let Some(default) = &self.default {
            write!(f, ", default={default}")?;
        }
        if let Some(lower) = self.lower {
            write!(f, ", lower={}", bound(lower))?;
        }
        if let Some(upper) = self.upper {
            write!(f, ", upper={}", bound(upper))?;
        }
        write!(f, ")")
    }
}

/// `enumeration('name', ('a', 'b'), 'default')`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationDescriptor {
    name: String,
    literals: Vec<String>,
    default: String,
}

impl EnumerationDescriptor {
    pub fn new(name: impl Into<String>, literals: Vec<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            literals,
            default: default.into(),
        }
    }
}

impl fmt::Display for EnumerationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literals: Vec<String> = self.literals.iter().map(|literal| quoted(literal)).collect();
        let tuple = match literals.as_slice() {
            [single] => format!("({single},)"),
            literals => format!("({})", literals.join(", ")),
        };
        write!(f, "enumeration({}, {tuple}, {})", quoted(&self.name), quoted(&self.default))
    }
}

/// `association('name', Opposite[, lower=..][, upper=..][, composite=True][, opposite='..'])`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationDescriptor {
    name: String,
    opposite_class: String,
    lower: Bound,
    upper: Bound,
    composite: bool,
    opposite: Option<String>,
}

impl AssociationDescriptor {
    pub fn new(name: impl Into<String>, opposite_class: impl Into<String>, lower: Bound, upper: Bound) -> Self {
        Self {
            name: name.into(),
            opposite_class: opposite_class.into(),
            lower,
            upper,
            composite: false,
            opposite: None,
        }
    }

    pub fn with_composite(mut self, composite: bool) -> Self {
        self.composite = composite;
        self
    }

    /// Name of the opposite end, set when that end is navigable too.
    pub fn with_opposite(mut self, opposite: Option<String>) -> Self {
        self.opposite = opposite;
        self
    }
}

impl fmt::Display for AssociationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "association({}, {}", quoted(&self.name), self.opposite_class)?;
        if self.lower != Bound::ZERO {
            write!(f, ", lower={}", bound(self.lower))?;
        }
        if !self.upper.is_many() {
            write!(f, ", upper={}", bound(self.upper))?;
        }
        if self.composite {
            write!(f, ", composite=True")?;
        }
        if let Some(opposite) = &self.opposite {
            write!(f, ", opposite={}", quoted(opposite))?;
        }
        write!(f, ")")
    }
}

/// `derivedunion('name', Opposite, lower, upper[, A.m1, B.m2])`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedUnionDescriptor {
    name: String,
    opposite_class: String,
    lower: Bound,
    upper: Bound,
    members: Vec<String>,
}

impl DerivedUnionDescriptor {
    pub fn new(
        name: impl Into<String>,
        opposite_class: impl Into<String>,
        lower: Bound,
        upper: Bound,
        members: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            opposite_class: opposite_class.into(),
            lower,
            upper,
            members,
        }
    }
}

impl fmt::Display for DerivedUnionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "derivedunion({}, {}, {}, {}",
            quoted(&self.name),
            self.opposite_class,
            bound(self.lower),
            bound(self.upper)
        )?;
        for member in &self.members {
            write!(f, ", {member}")?;
        }
        write!(f, ")")
    }
}

/// `redefine(Class, 'name', Opposite, target)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedefineDescriptor {
    class_name: String,
    name: String,
    opposite_class: String,
    target: String,
}

impl RedefineDescriptor {
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        opposite_class: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            opposite_class: opposite_class.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for RedefineDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "redefine({}, {}, {}, {})",
            self.class_name,
            quoted(&self.name),
            self.opposite_class,
            self.target
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_type() {
        assert_eq!(runtime_type("Boolean"), "int");
        assert_eq!(runtime_type("UnlimitedNatural"), "int");
        assert_eq!(runtime_type("integer"), "int");
        assert_eq!(runtime_type("String"), "str");
        assert_eq!(runtime_type("Element"), "Element");
    }

    #[test]
    fn test_default_literal() {
        assert_eq!(default_literal("true"), "True");
        assert_eq!(default_literal("FALSE"), "False");
        assert_eq!(default_literal("'public'"), "'public'");
    }

    #[test]
    fn test_attribute() {
        assert_eq!(AttributeDescriptor::new("body", "str").to_string(), "attribute('body', str)");

        let descriptor = AttributeDescriptor::new("bar", "int")
            .with_default(Some("True".to_string()))
            .with_bounds(Some(Bound::ZERO), Some(Bound::Many));
        assert_eq!(descriptor.to_string(), "attribute('bar', int, default=True, upper='*')");

        let descriptor = AttributeDescriptor::new("count", "int")
            .with_bounds(Some(Bound::Count(2)), Some(Bound::ONE));
        assert_eq!(descriptor.to_string(), "attribute('count', int, lower=2)");
    }

    #[test]
    fn test_enumeration() {
        let descriptor = EnumerationDescriptor::new(
            "visibility",
            vec!["public".to_string(), "private".to_string()],
            "public",
        );
        assert_eq!(
            descriptor.to_string(),
            "enumeration('visibility', ('public', 'private'), 'public')"
        );

        let single = EnumerationDescriptor::new("kind", vec!["only".to_string()], "only");
        assert_eq!(single.to_string(), "enumeration('kind', ('only',), 'only')");
    }

    #[test]
    fn test_association() {
        let descriptor = AssociationDescriptor::new("b", "B", Bound::ZERO, Bound::Many)
            .with_composite(true)
            .with_opposite(Some("a".to_string()));
        assert_eq!(
            descriptor.to_string(),
            "association('b', B, composite=True, opposite='a')"
        );

        let descriptor = AssociationDescriptor::new("a", "A", Bound::ONE, Bound::ONE);
        assert_eq!(descriptor.to_string(), "association('a', A, lower=1, upper=1)");
    }

    #[test]
    fn test_derived_union() {
        let descriptor = DerivedUnionDescriptor::new(
            "ownedElement",
            "Element",
            Bound::ZERO,
            Bound::Many,
            vec!["Element.ownedComment".to_string(), "Package.ownedType".to_string()],
        );
        assert_eq!(
            descriptor.to_string(),
            "derivedunion('ownedElement', Element, 0, '*', Element.ownedComment, Package.ownedType)"
        );

        let empty = DerivedUnionDescriptor::new("owner", "Element", Bound::ZERO, Bound::ONE, vec![]);
        assert_eq!(empty.to_string(), "derivedunion('owner', Element, 0, 1)");
    }

    #[test]
    fn test_redefine() {
        let descriptor = RedefineDescriptor::new("Property", "class_", "Class", "Feature.featuringClassifier");
        assert_eq!(
            descriptor.to_string(),
            "redefine(Property, 'class_', Class, Feature.featuringClassifier)"
        );
    }

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted("it's"), "'it\\'s'");
    }
}
