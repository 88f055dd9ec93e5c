//! Attribute planning.
//!
//! Plain attributes are written in the attribute section. Attributes whose
//! override names the features they derive from, and derived attributes
//! without any definition, are deferred to a later section that is ordered
//! by those dependencies.

use std::collections::HashMap;

use log::debug;
use petgraph::{algo::toposort, graphmap::DiGraphMap};

use modelgen_core::{
    identifier::Id,
    semantic::{Attribute, Class, Multiplicity},
};
use modelgen_parser::error::{Diagnostic, ErrorCode};

use super::{Item, Planner};
use crate::descriptor::{self, AttributeDescriptor, EnumerationDescriptor};

/// The facts attribute planning needs, from an owned attribute or from an
/// association end folded into one.
#[derive(Debug, Clone, Copy)]
pub(super) struct AttributeSpec<'m> {
    pub id: Id,
    pub name: &'m str,
    pub class_name: &'m str,
    pub type_name: Option<&'m str>,
    pub default: Option<&'m str>,
    pub multiplicity: Multiplicity,
    pub derived: bool,
}

impl<'m> From<&'m Attribute> for AttributeSpec<'m> {
    fn from(attribute: &'m Attribute) -> Self {
        Self {
            id: attribute.id(),
            name: attribute.name(),
            class_name: attribute.class_name(),
            type_name: attribute.type_name(),
            default: attribute.default_value(),
            multiplicity: attribute.multiplicity(),
            derived: attribute.is_derived(),
        }
    }
}

impl AttributeSpec<'_> {
    pub fn key(&self) -> String {
        format!("{}.{}", self.class_name, self.name)
    }
}

/// An attribute held back for the deferred section.
#[derive(Debug, Clone)]
pub(super) struct Deferred {
    id: Id,
    key: String,
    /// `true` when an override defines the attribute.
    defined: bool,
}

impl<'a> Planner<'a> {
    pub(super) fn plan_attributes(&mut self) {
        let classes: Vec<&Class> = self.emitted_classes().collect();
        for class in classes {
            for attribute in class.attributes() {
                if attribute.in_association() {
                    continue;
                }
                let spec = AttributeSpec::from(attribute);
                let key = spec.key();
                if !self.overrides.derives(&key).is_empty() {
                    debug!(attribute = key.as_str(); "Deferring attribute with derives clause");
                    self.deferred.push(Deferred {
                        id: spec.id,
                        key,
                        defined: true,
                    });
                    continue;
                }
                if let Some(item) = self.attribute_item(&spec) {
                    self.attributes.push(item);
                }
            }
        }
    }

    /// Decide what to write for one attribute.
    ///
    /// Returns `None` when nothing is written now: the attribute is derived
    /// without a definition, or it is malformed and a diagnostic was emitted.
    pub(super) fn attribute_item(&mut self, spec: &AttributeSpec<'_>) -> Option<Item> {
        let key = spec.key();

        if self.overrides.has_override(&key) {
            return Some(Item::Override(key));
        }

        if spec.derived {
            self.diagnostics.emit(
                Diagnostic::warning(format!("ignoring derived attribute {key}: no definition"))
                    .with_label_at(self.schema.span(spec.id), "derived attribute")
                    .with_help(format!("add an `override {key}` block")),
            );
            self.deferred.push(Deferred {
                id: spec.id,
                key,
                defined: false,
            });
            return None;
        }

        let Some(type_name) = spec.type_name else {
            self.diagnostics.emit(
                Diagnostic::error(format!("type is not specified for attribute `{key}`"))
                    .with_code(ErrorCode::E203)
                    .with_label_at(self.schema.span(spec.id), "attribute without type"),
            );
            return None;
        };
        let type_name = descriptor::runtime_type(type_name);
        let default = spec.default.map(descriptor::default_literal);

        let descriptor = if self.naming.is_enumeration_name(type_name) {
            self.enumeration_descriptor(spec, type_name, default)?.to_string()
        } else {
            AttributeDescriptor::new(spec.name, type_name)
                .with_default(default)
                .with_bounds(spec.multiplicity.lower(), spec.multiplicity.upper())
                .to_string()
        };
        Some(Item::Property { key, descriptor })
    }

    /// Find the single enumeration named `type_name`.
    fn enumeration_descriptor(
        &mut self,
        spec: &AttributeSpec<'_>,
        type_name: &str,
        default: Option<String>,
    ) -> Option<EnumerationDescriptor> {
        let span = self.schema.span(spec.id);
        let mut matches = self.model.enumerations_named(type_name);

        let enumeration = match (matches.next(), matches.next()) {
            (Some(enumeration), None) => enumeration,
            (None, _) => {
                self.diagnostics.emit(
                    Diagnostic::error(format!(
                        "no enumeration named `{type_name}` for attribute `{}`",
                        spec.key()
                    ))
                    .with_code(ErrorCode::E204)
                    .with_label_at(span, "enumeration type")
                    .with_help(format!("declare a class named `{type_name}` with its literals as attributes")),
                );
                return None;
            }
            (Some(_), Some(_)) => {
                self.diagnostics.emit(
                    Diagnostic::error(format!(
                        "several enumerations are named `{type_name}`, used by attribute `{}`",
                        spec.key()
                    ))
                    .with_code(ErrorCode::E205)
                    .with_label_at(span, "ambiguous enumeration type")
                    .with_help("give every enumeration a unique name"),
                );
                return None;
            }
        };

        let Some(default) = default.or_else(|| enumeration.first_literal().map(str::to_string)) else {
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "enumeration `{type_name}` has no literals and attribute `{}` no default",
                    spec.key()
                ))
                .with_code(ErrorCode::E204)
                .with_label_at(span, "enumeration type")
                .with_help("add a literal to the enumeration or a default to the attribute"),
            );
            return None;
        };

        Some(EnumerationDescriptor::new(
            spec.name,
            enumeration.literals().to_vec(),
            default,
        ))
    }

    /// Order the deferred attributes so every attribute follows the deferred
    /// attributes it derives from.
    pub(super) fn plan_deferred(&mut self) -> Vec<Item> {
        let index: HashMap<&str, usize> = self
            .deferred
            .iter()
            .enumerate()
            .map(|(i, deferred)| (deferred.key.as_str(), i))
            .collect();

        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for (i, deferred) in self.deferred.iter().enumerate() {
            graph.add_node(i);
            for dependency in self.overrides.derives(&deferred.key) {
                if let Some(&j) = index.get(dependency.as_str()) {
                    graph.add_edge(j, i, ());
                }
            }
        }

        let order = match toposort(&graph, None) {
            Ok(order) => order,
            Err(cycle) => {
                let deferred = &self.deferred[cycle.node_id()];
                let diagnostic = Diagnostic::error(format!(
                    "derived attribute `{}` depends on itself",
                    deferred.key
                ))
                .with_code(ErrorCode::E302)
                .with_label_at(self.schema.span(deferred.id), "part of a derives cycle")
                .with_help("break the cycle in the `derives` clauses of the override file");
                self.diagnostics.emit(diagnostic);
                return Vec::new();
            }
        };

        order
            .into_iter()
            .map(|i| {
                let deferred = &self.deferred[i];
                if deferred.defined {
                    Item::Override(deferred.key.clone())
                } else {
                    Item::Comment(format!("# derived attribute '{}' has no definition", deferred.key))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use modelgen_parser::error::ErrorCode;
    use proptest::prelude::*;

    use super::super::{
        Item,
        tests::{overrides, plan, plan_with},
    };

    fn class_with(properties: &str) -> String {
        let ids: Vec<String> = (1..=properties.matches("[[element]]").count())
            .map(|i| format!("\"p{i}\""))
            .collect();
        format!(
            r#"
            [[element]]
            id = "c1"
            kind = "Class"
            values = {{ name = "Foo" }}
            references = {{ ownedAttribute = [{}] }}
            {properties}
            "#,
            ids.join(", ")
        )
    }

    #[test]
    fn test_boolean_default() {
        let source = class_with(
            r#"
            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "bar", typeValue = "Boolean", defaultValue = "true" }
            "#,
        );

        assert_eq!(
            plan(&source).property("Foo.bar"),
            Some("attribute('bar', int, default=True)")
        );
    }

    #[test]
    fn test_multiplicity_params() {
        let source = class_with(
            r#"
            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "names", typeValue = "String", lowerValue = "1", upperValue = "*" }
            "#,
        );

        assert_eq!(
            plan(&source).property("Foo.names"),
            Some("attribute('names', str, lower=1, upper='*')")
        );
    }

    #[test]
    fn test_enumeration() {
        let source = format!(
            "{}{}",
            class_with(
                r#"
                [[element]]
                id = "p1"
                kind = "Property"
                values = { name = "aggregation", typeValue = "AggregationKind" }
                "#,
            ),
            r#"
            [[element]]
            id = "e1"
            kind = "Class"
            values = { name = "AggregationKind" }
            references = { ownedAttribute = ["l1", "l2", "l3"] }

            [[element]]
            id = "l1"
            kind = "Property"
            values = { name = "none" }

            [[element]]
            id = "l2"
            kind = "Property"
            values = { name = "shared" }

            [[element]]
            id = "l3"
            kind = "Property"
            values = { name = "composite" }
            "#
        );

        assert_eq!(
            plan(&source).property("Foo.aggregation"),
            Some("enumeration('aggregation', ('none', 'shared', 'composite'), 'none')")
        );
    }

    #[test]
    fn test_missing_enumeration() {
        let source = class_with(
            r#"
            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "visibility", typeValue = "VisibilityKind" }
            "#,
        );

        let err = plan_with(&source, &crate::overrides::NoOverrides).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E204));
    }

    #[test]
    fn test_derived_without_override_is_deferred() {
        let source = class_with(
            r#"
            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "qualifiedName", typeValue = "String", isDerived = "1" }
            "#,
        );

        let plan = plan(&source);
        assert_eq!(plan.property("Foo.qualifiedName"), None);
        assert!(plan.items().contains(&Item::Comment(
            "# derived attribute 'Foo.qualifiedName' has no definition".to_string()
        )));
        assert_eq!(plan.warnings().len(), 1);
        assert_eq!(
            plan.warnings()[0].message(),
            "ignoring derived attribute Foo.qualifiedName: no definition"
        );
    }

    #[test]
    fn test_override_replaces_attribute() {
        let source = class_with(
            r#"
            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "bar", typeValue = "Integer" }
            "#,
        );
        let overrides = overrides("override Foo.bar\nFoo.bar = attribute('bar', int, 42)\n%%\n");

        let plan = plan_with(&source, &overrides).unwrap();
        assert!(plan.items().contains(&Item::Override("Foo.bar".to_string())));
        assert_eq!(plan.property("Foo.bar"), None);
    }

    #[test]
    fn test_derives_order() {
        let source = class_with(
            r#"
            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "a", typeValue = "String", isDerived = "1" }

            [[element]]
            id = "p2"
            kind = "Property"
            values = { name = "b", typeValue = "String", isDerived = "1" }
            "#,
        );
        let overrides = overrides(
            "override Foo.a derives Foo.b\nFoo.a = derived()\n%%\noverride Foo.b derives Foo.x\nFoo.b = derived()\n%%\n",
        );

        let plan = plan_with(&source, &overrides).unwrap();
        let position = |key: &str| {
            plan.items()
                .iter()
                .position(|item| item == &Item::Override(key.to_string()))
                .unwrap()
        };
        assert!(position("Foo.b") < position("Foo.a"));
    }

    #[test]
    fn test_derives_cycle() {
        let source = class_with(
            r#"
            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "a", typeValue = "String" }

            [[element]]
            id = "p2"
            kind = "Property"
            values = { name = "b", typeValue = "String" }
            "#,
        );
        let overrides = overrides(
            "override Foo.a derives Foo.b\nFoo.a = 1\n%%\noverride Foo.b derives Foo.a\nFoo.b = 2\n%%\n",
        );

        let err = plan_with(&source, &overrides).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E302));
    }

    fn bound_text(bound: Option<u32>) -> String {
        bound.map_or_else(|| "*".to_string(), |n| n.to_string())
    }

    proptest! {
        #[test]
        fn test_multiplicity_survives_generation(lower in 0u32..5, upper in proptest::option::of(1u32..5)) {
            let source = class_with(&format!(
                r#"
                [[element]]
                id = "p1"
                kind = "Property"
                values = {{ name = "n", typeValue = "Integer", lowerValue = "{lower}", upperValue = "{}" }}
                "#,
                bound_text(upper)
            ));

            let plan = plan(&source);
            let descriptor = plan.property("Foo.n").unwrap();

            let parsed_lower = descriptor
                .split(", lower=")
                .nth(1)
                .map(|rest| rest.split([',', ')']).next().unwrap().parse::<u32>().unwrap())
                .unwrap_or(0);
            let parsed_upper = descriptor
                .split(", upper=")
                .nth(1)
                .map(|rest| rest.split([',', ')']).next().unwrap().to_string())
                .unwrap_or_else(|| "1".to_string());

            prop_assert_eq!(parsed_lower, lower);
            prop_assert_eq!(parsed_upper.trim_matches('\''), bound_text(upper));
        }
    }
}
