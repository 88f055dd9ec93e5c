//! Metaclass filter.
//!
//! An extension connects a stereotype to the metaclass it decorates. The
//! decorated class is part of the metamodel's meta level and is removed from
//! the emission set.

use log::{debug, info};

use modelgen_core::{
    schema::{ElementKind, Record},
    semantic::Model,
};

use crate::resolve::{ResolveError, Resolver};

/// Remove the class decorated by each extension from the model.
///
/// The class is the `type` of the first member end that has one. Extensions
/// pointing at anything other than a class in the model are skipped.
pub fn filter_metaclasses(
    resolver: &Resolver<'_>,
    extensions: &[&Record],
    model: &mut Model,
) -> Result<(), ResolveError> {
    for extension in extensions {
        let ends = resolver.many_of(extension, "memberEnd", &ElementKind::Property)?;
        let Some(decorated) = ends.iter().find_map(|end| end.reference("type")) else {
            debug!(extension:% = extension.id(); "Extension has no typed member end");
            continue;
        };

        match model.remove_metaclass(decorated) {
            Some(class) => info!(class = class.name(); "Removed metaclass"),
            None => debug!(extension:% = extension.id(), target:% = decorated; "Extension does not decorate a class"),
        }
    }
    Ok(())
}
