//! Derived unions.
//!
//! A derived union is a navigable association end marked derived (or given
//! a `derives` override). Its members are the navigable ends elsewhere in
//! the model that list its name among their subsets, so membership is only
//! complete after every association has been routed.
//!
//! Unions may themselves be members of other unions. A union is written
//! after all of its member unions.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;

use modelgen_core::semantic::AssociationEnd;
use modelgen_parser::error::{Diagnostic, ErrorCode};

use super::{Item, Planner};
use crate::descriptor::DerivedUnionDescriptor;

#[derive(Debug)]
struct Union<'m> {
    end: &'m AssociationEnd,
    members: Vec<&'m AssociationEnd>,
}

/// Derived unions keyed by end name, in registration order.
#[derive(Debug, Default)]
pub(super) struct UnionSet<'m> {
    unions: IndexMap<&'m str, Union<'m>>,
}

impl<'m> UnionSet<'m> {
    pub fn len(&self) -> usize {
        self.unions.len()
    }

    /// Register `end` as a union.
    ///
    /// Returns the end already registered under the same name on conflict.
    fn register(&mut self, name: &'m str, end: &'m AssociationEnd) -> Result<(), &'m AssociationEnd> {
        if let Some(existing) = self.unions.get(name) {
            return Err(existing.end);
        }
        self.unions.insert(
            name,
            Union {
                end,
                members: Vec::new(),
            },
        );
        Ok(())
    }

    /// Check whether `end` is the end registered as a union.
    fn is_union(&self, end: &AssociationEnd) -> bool {
        end.name()
            .and_then(|name| self.unions.get(name))
            .is_some_and(|union| union.end.id() == end.id())
    }

    /// Member ends of the union `name` that are unions themselves.
    fn nested(&self, name: &str) -> Vec<&'m str> {
        let Some(union) = self.unions.get(name) else {
            return Vec::new();
        };
        union
            .members
            .iter()
            .copied()
            .filter(|member| self.is_union(member))
            .filter_map(AssociationEnd::name)
            .collect()
    }
}

impl<'a> Planner<'a> {
    pub(super) fn register_union(&mut self, end: &'a AssociationEnd) {
        let Some(name) = end.name() else {
            return;
        };
        if let Err(existing) = self.unions.register(name, end) {
            let mut diagnostic = Diagnostic::error(format!("derived union `{name}` is declared twice"))
                .with_code(ErrorCode::E300)
                .with_label_at(self.schema.span(end.id()), "second declaration")
                .with_help("give every derived union a unique name");
            if let Some(span) = self.schema.span(existing.id()) {
                diagnostic = diagnostic.with_secondary_label(span, "first declared here");
            }
            self.diagnostics.emit(diagnostic);
        }
    }

    /// Append every subsetting end to the unions it names.
    fn collect_members(&mut self) {
        let model = self.model;
        for association in model.associations() {
            for end in association.ends() {
                if !end.is_navigable()
                    || end.subsets().is_empty()
                    || self.is_simple_attribute_class(end.target().id())
                {
                    continue;
                }
                for subset in end.subsets() {
                    match self.unions.unions.get_mut(subset.as_str()) {
                        Some(union) => union.members.push(end),
                        None => {
                            let owner = end.owner().map(|owner| owner.name()).unwrap_or_default();
                            self.diagnostics.emit(
                                Diagnostic::warning(format!("not a derived union: {owner}.{subset}"))
                                    .with_label_at(self.schema.span(end.id()), "subsets an unknown union"),
                            );
                        }
                    }
                }
            }
        }
    }

    /// Order and render the unions, nested unions first.
    pub(super) fn plan_unions(&mut self) -> Vec<Item> {
        self.collect_members();

        let names: Vec<&'a str> = self.unions.unions.keys().copied().collect();
        let mut items = Vec::with_capacity(names.len());
        let mut written = HashSet::new();
        let mut on_path = HashSet::new();

        for root in names {
            let mut stack = vec![(root, false)];
            while let Some((name, expanded)) = stack.pop() {
                if expanded {
                    on_path.remove(name);
                    written.insert(name);
                    items.extend(self.union_item(name));
                    continue;
                }
                if written.contains(name) {
                    continue;
                }
                if !on_path.insert(name) {
                    self.emit_union_cycle(name);
                    return items;
                }
                stack.push((name, true));
                stack.extend(
                    self.unions
                        .nested(name)
                        .into_iter()
                        .rev()
                        .filter(|member| !written.contains(member))
                        .map(|member| (member, false)),
                );
            }
        }

        debug!(unions = items.len(); "Planned derived unions");
        items
    }

    fn union_item(&mut self, name: &str) -> Option<Item> {
        let union = self.unions.unions.get(name)?;
        let end = union.end;
        let key = end.qualified_name()?;
        let members: Vec<String> = union
            .members
            .iter()
            .filter_map(|member| member.qualified_name())
            .collect();

        if union.members.is_empty() && !self.overrides.has_override(&key) {
            self.diagnostics.emit(
                Diagnostic::warning(format!(
                    "no subsets for derived union: {key}[{}..{}]",
                    end.lower(),
                    end.upper()
                ))
                .with_label_at(self.schema.span(end.id()), "derived union without members"),
            );
        }

        let descriptor =
            DerivedUnionDescriptor::new(name, end.target().name(), end.lower(), end.upper(), members)
                .to_string();
        Some(Item::Property { key, descriptor })
    }

    fn emit_union_cycle(&mut self, name: &str) {
        let span = self
            .unions
            .unions
            .get(name)
            .and_then(|union| self.schema.span(union.end.id()));
        self.diagnostics.emit(
            Diagnostic::error(format!("derived union `{name}` is nested in itself"))
                .with_code(ErrorCode::E301)
                .with_label_at(span, "part of a union nesting cycle")
                .with_help("a union cannot subset, directly or through other unions, its own members"),
        );
    }
}
