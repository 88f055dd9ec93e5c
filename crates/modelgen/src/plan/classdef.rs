//! Class definitions and operations.

use std::collections::HashSet;

use log::debug;

use modelgen_core::{identifier::Id, semantic::Class};
use modelgen_parser::error::Diagnostic;

use super::{Item, Planner};

impl<'a> Planner<'a> {
    /// Classes generation visits, in model order: every class except those
    /// folded into simple attributes.
    pub(super) fn emitted_classes(&self) -> impl Iterator<Item = &'a Class> + '_ {
        self.model
            .classes()
            .filter(|class| !self.is_simple_attribute_class(class.id()))
    }

    /// Parents of a class that are part of the emission set, in declared
    /// order. Removed metaclasses are left out.
    fn parents(&self, class: &Class) -> Vec<Id> {
        class
            .generalizations()
            .iter()
            .copied()
            .filter(|&parent| self.model.class(parent).is_some())
            .collect()
    }

    /// Declare every emitted class once, parents before children.
    pub(super) fn plan_classes(&mut self) {
        let mut written = HashSet::new();
        let roots: Vec<Id> = self.emitted_classes().map(Class::id).collect();

        for root in roots {
            // (class, parents already pushed)
            let mut stack = vec![(root, false)];
            while let Some((id, expanded)) = stack.pop() {
                if written.contains(&id) {
                    continue;
                }
                let Some(class) = self.model.class(id) else {
                    continue;
                };
                let parents = self.parents(class);

                if expanded {
                    written.insert(id);
                    let bases = parents
                        .iter()
                        .filter_map(|&parent| self.model.class(parent))
                        .map(|parent| parent.name().to_string())
                        .collect();
                    self.classes.push(Item::ClassDef {
                        name: class.name().to_string(),
                        bases,
                    });
                    continue;
                }

                stack.push((id, true));
                stack.extend(
                    parents
                        .iter()
                        .rev()
                        .filter(|parent| !written.contains(*parent))
                        .map(|&parent| (parent, false)),
                );
            }
        }
        debug!(classes = self.classes.len(); "Planned class definitions");
    }

    /// Operations are only ever written from overrides.
    pub(super) fn plan_operations(&mut self) {
        let classes: Vec<&Class> = self.emitted_classes().collect();
        for class in classes {
            for operation in class.operations() {
                let key = operation.qualified_name();
                if self.overrides.has_override(&key) {
                    self.operations.push(Item::Override(key));
                } else {
                    self.diagnostics.emit(
                        Diagnostic::warning(format!("No override for operation {key}"))
                            .with_label_at(self.schema.span(operation.id()), "operation without a definition")
                            .with_help(format!("add an `override {key}` block")),
                    );
                    self.operations
                        .push(Item::Comment(format!("# No override for operation {key}")));
                }
            }
        }
    }
}
