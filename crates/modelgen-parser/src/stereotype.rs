//! Stereotype propagation.
//!
//! A stereotype applied to a class is inherited by every transitive
//! specialization of that class. Each tagging is recorded on the model in
//! the order it happens so it can be reported in the generated output.

use std::collections::HashSet;

use log::{info, warn};

use modelgen_core::{
    identifier::Id,
    semantic::{Model, Stereotype, TagOrigin, Tagging, TaggingKind},
};

/// Apply explicit stereotype tags and propagate them down the hierarchy.
///
/// `explicit` lists the classes carrying an applied stereotype, with its
/// name, in document order. Explicit tags are assigned to all of them before
/// anything is propagated, so a descendant with its own explicit tag is
/// recognized no matter where it appears in the document. Such a descendant
/// keeps its tag and stops the propagation below it.
pub fn propagate(model: &mut Model, explicit: &[(Id, String)]) {
    for (id, name) in explicit {
        if let Some(class) = model.class_mut(*id) {
            class.set_stereotype(Stereotype::new(name.as_str(), TagOrigin::Explicit));
        }
    }

    for (root, name) in explicit {
        let Some(class) = model.class(*root) else {
            continue;
        };
        let tagging = Tagging::new(class.name(), name.as_str(), TaggingKind::Applied);
        info!(class = class.name(), stereotype = name.as_str(); "{tagging}");
        model.record_tagging(tagging);

        propagate_from(model, *root, name);
    }
}

/// Visit every transitive specialization of `root` exactly once.
fn propagate_from(model: &mut Model, root: Id, name: &str) {
    let mut visited = HashSet::from([root]);
    let mut stack = children(model, root);

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        // Removed metaclasses are not tagged but their descendants are.
        if model.is_metaclass(id) {
            stack.extend(children(model, id));
            continue;
        }
        let Some(class) = model.class_mut(id) else {
            continue;
        };

        if let Some(existing) = class.stereotype().filter(|tag| tag.is_explicit()) {
            if existing.name() != name {
                let kept = existing.name().to_string();
                warn!(
                    class = class.name(),
                    explicit = kept.as_str(),
                    inherited = name;
                    "Class carries an explicit stereotype and inherits another one"
                );
                let tagging = Tagging::new(class.name(), name, TaggingKind::Conflict { kept });
                model.record_tagging(tagging);
            }
            continue;
        }

        class.set_stereotype(Stereotype::new(name, TagOrigin::Inherited(root)));
        let tagging = Tagging::new(class.name(), name, TaggingKind::Propagated);
        info!(class = class.name(), stereotype = name; "{tagging}");
        model.record_tagging(tagging);

        stack.extend(children(model, id));
    }
}

/// Direct specializations of a class, reversed so that popping from a stack
/// visits them in declaration order.
fn children(model: &Model, id: Id) -> Vec<Id> {
    model.specializations(id).iter().rev().copied().collect()
}

#[cfg(test)]
mod tests {
    use modelgen_core::semantic::Class;

    use super::*;

    fn model_with(classes: &[&str], edges: &[(&str, &str)]) -> Model {
        let mut model = Model::new();
        for name in classes {
            model.add_class(Class::new(Id::new(name), *name));
        }
        for (parent, child) in edges {
            model.class_mut(Id::new(parent)).unwrap().add_specialization(Id::new(child));
            model.class_mut(Id::new(child)).unwrap().add_generalization(Id::new(parent));
        }
        model
    }

    fn lines(model: &Model) -> Vec<String> {
        model.taggings().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_propagates_depth_first() {
        let mut model = model_with(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("A", "D")],
        );

        propagate(&mut model, &[(Id::new("A"), "SimpleAttribute".to_string())]);

        assert_eq!(
            lines(&model),
            [
                "class 'A' has been stereotyped as 'SimpleAttribute'",
                "class 'B' has been stereotyped as 'SimpleAttribute' too",
                "class 'C' has been stereotyped as 'SimpleAttribute' too",
                "class 'D' has been stereotyped as 'SimpleAttribute' too",
            ]
        );
        let c = model.class(Id::new("C")).unwrap().stereotype().unwrap();
        assert_eq!(c.origin(), TagOrigin::Inherited(Id::new("A")));
    }

    #[test]
    fn test_diamond_visited_once() {
        let mut model = model_with(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        );

        propagate(&mut model, &[(Id::new("A"), "S".to_string())]);

        let tagged_d = model
            .taggings()
            .iter()
            .filter(|tagging| tagging.class_name() == "D")
            .count();
        assert_eq!(tagged_d, 1);
        assert_eq!(model.taggings().len(), 4);
    }

    #[test]
    fn test_conflicting_explicit_tag_is_kept() {
        let mut model = model_with(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);

        propagate(
            &mut model,
            &[
                (Id::new("A"), "S".to_string()),
                (Id::new("B"), "T".to_string()),
            ],
        );

        let b = model.class(Id::new("B")).unwrap();
        assert!(b.has_stereotype("T"));
        assert_eq!(
            model.taggings()[1].kind(),
            &TaggingKind::Conflict {
                kept: "T".to_string()
            }
        );
        // C inherits from its nearest explicitly tagged ancestor.
        assert!(model.class(Id::new("C")).unwrap().has_stereotype("T"));
    }

    #[test]
    fn test_propagates_through_removed_metaclass() {
        let mut model = model_with(
            &["Text", "Meta", "Leaf"],
            &[("Text", "Meta"), ("Meta", "Leaf")],
        );
        model.remove_metaclass(Id::new("Meta"));

        propagate(&mut model, &[(Id::new("Text"), "SimpleAttribute".to_string())]);

        assert_eq!(
            lines(&model),
            [
                "class 'Text' has been stereotyped as 'SimpleAttribute'",
                "class 'Leaf' has been stereotyped as 'SimpleAttribute' too",
            ]
        );
        let leaf = model.class(Id::new("Leaf")).unwrap();
        assert!(leaf.has_stereotype("SimpleAttribute"));
    }

    #[test]
    fn test_untagged_classes_stay_untagged() {
        let mut model = model_with(&["A", "B"], &[]);

        propagate(&mut model, &[(Id::new("A"), "S".to_string())]);

        assert!(model.class(Id::new("B")).unwrap().stereotype().is_none());
    }
}
