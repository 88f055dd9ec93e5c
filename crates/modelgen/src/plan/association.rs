//! Association routing.

use log::{debug, info};

use modelgen_core::semantic::{Association, AssociationEnd};

use super::{Item, Planner, attribute::AttributeSpec};
use crate::descriptor::{AssociationDescriptor, RedefineDescriptor};

impl<'a> Planner<'a> {
    pub(super) fn plan_associations(&mut self) {
        let model = self.model;
        for association in model.associations() {
            if let Some(simple) = association.simple_attribute_end() {
                self.fold_simple_attribute(association, simple);
                continue;
            }
            for (end, opposite) in association.pairs() {
                self.route_end(end, opposite);
            }
        }
        debug!(
            associations = self.associations.len(),
            redefines = self.redefines.len(),
            unions = self.unions.len();
            "Planned associations"
        );
    }

    /// Write an end typed by a simple-attribute class as a plain `str`
    /// attribute of the class on the other side.
    fn fold_simple_attribute(&mut self, association: &'a Association, simple: &'a AssociationEnd) {
        let Some(opposite) = association.ends().iter().find(|end| end.id() != simple.id()) else {
            return;
        };
        let (true, Some(name)) = (simple.is_navigable(), simple.name()) else {
            debug!(association:% = association.id(); "Dropping non-navigable simple attribute end");
            return;
        };

        let spec = AttributeSpec {
            id: simple.id(),
            name,
            class_name: opposite.target().name(),
            type_name: Some("str"),
            default: simple.default_value(),
            multiplicity: simple.multiplicity(),
            derived: simple.is_derived(),
        };
        self.associations
            .push(Item::Comment(format!("# '{}' is a simple attribute", spec.key())));
        if let Some(item) = self.attribute_item(&spec) {
            self.associations.push(item);
        }
    }

    /// Route one end: redefinition, derived union or plain association.
    fn route_end(&mut self, end: &'a AssociationEnd, opposite: &'a AssociationEnd) {
        let (Some(owner), Some(name), Some(key)) = (end.owner(), end.name(), end.qualified_name())
        else {
            debug!(end:% = end.id(); "Dropping non-navigable association end");
            return;
        };

        if let Some(target) = end.redefines() {
            info!("redefining {target} -> {key}");
            let descriptor =
                RedefineDescriptor::new(owner.name(), name, end.target().name(), target).to_string();
            self.redefines.push(Item::Property { key, descriptor });
            return;
        }

        if end.is_derived() || !self.overrides.derives(&key).is_empty() {
            self.register_union(end);
            return;
        }

        let opposite_name = if opposite.is_navigable() {
            opposite.name().map(str::to_string)
        } else {
            None
        };
        let descriptor = AssociationDescriptor::new(name, end.target().name(), end.lower(), end.upper())
            .with_composite(end.is_composite())
            .with_opposite(opposite_name)
            .to_string();
        self.associations.push(Item::Property { key, descriptor });
    }
}
