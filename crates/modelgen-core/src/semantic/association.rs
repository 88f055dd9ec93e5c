//! Binary associations and their ends.

use crate::{
    identifier::Id,
    semantic::{Bound, Multiplicity},
};

/// A resolved reference to a class: its element id and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    id: Id,
    name: String,
}

impl ClassRef {
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One end of a binary association.
///
/// An end is navigable iff it has an owning class. The end's `target` is the
/// type it points at, i.e. the class on the opposite side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationEnd {
    id: Id,
    name: Option<String>,
    owner: Option<ClassRef>,
    target: ClassRef,
    multiplicity: Multiplicity,
    default: Option<String>,
    composite: bool,
    derived: bool,
    redefines: Option<String>,
    subsets: Vec<String>,
    simple_attribute: bool,
}

impl AssociationEnd {
    pub fn new(
        id: Id,
        name: Option<String>,
        owner: Option<ClassRef>,
        target: ClassRef,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            id,
            name,
            owner,
            target,
            multiplicity,
            default: None,
            composite: false,
            derived: false,
            redefines: None,
            subsets: Vec::new(),
            simple_attribute: false,
        }
    }

    pub fn with_default_value(mut self, default: Option<String>) -> Self {
        self.default = default;
        self
    }

    pub fn with_composite(mut self, composite: bool) -> Self {
        self.composite = composite;
        self
    }

    pub fn with_derived(mut self, derived: bool) -> Self {
        self.derived = derived;
        self
    }

    pub fn with_redefines(mut self, redefines: Option<String>) -> Self {
        self.redefines = redefines;
        self
    }

    pub fn with_subsets(mut self, subsets: Vec<String>) -> Self {
        self.subsets = subsets;
        self
    }

    pub fn with_simple_attribute(mut self, simple_attribute: bool) -> Self {
        self.simple_attribute = simple_attribute;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// The end's name. Always present on navigable ends of a validated model.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn owner(&self) -> Option<&ClassRef> {
        self.owner.as_ref()
    }

    pub fn target(&self) -> &ClassRef {
        &self.target
    }

    pub fn is_navigable(&self) -> bool {
        self.owner.is_some()
    }

    /// Declared multiplicity, before end defaults are applied.
    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    pub fn lower(&self) -> Bound {
        self.multiplicity.end_bounds().0
    }

    pub fn upper(&self) -> Bound {
        self.multiplicity.end_bounds().1
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_composite(&self) -> bool {
        self.composite
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    /// Raw text of the `redefines` tag.
    pub fn redefines(&self) -> Option<&str> {
        self.redefines.as_deref()
    }

    /// Names of the derived unions this end subsets.
    pub fn subsets(&self) -> &[String] {
        &self.subsets
    }

    /// The end is typed by a simple-attribute class.
    pub fn is_simple_attribute(&self) -> bool {
        self.simple_attribute
    }

    /// `Owner.name` for navigable, named ends.
    pub fn qualified_name(&self) -> Option<String> {
        let owner = self.owner.as_ref()?;
        let name = self.name.as_deref()?;
        Some(format!("{}.{}", owner.name(), name))
    }
}

/// A binary association. Validation guarantees exactly two ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    id: Id,
    ends: [AssociationEnd; 2],
}

impl Association {
    pub fn new(id: Id, head: AssociationEnd, tail: AssociationEnd) -> Self {
        Self {
            id,
            ends: [head, tail],
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn ends(&self) -> &[AssociationEnd; 2] {
        &self.ends
    }

    /// Both `(end, opposite)` pairs; each end plays head once.
    pub fn pairs(&self) -> [(&AssociationEnd, &AssociationEnd); 2] {
        let [head, tail] = &self.ends;
        [(head, tail), (tail, head)]
    }

    /// The end typed by a simple-attribute class, if any.
    pub fn simple_attribute_end(&self) -> Option<&AssociationEnd> {
        self.ends.iter().find(|end| end.is_simple_attribute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end(id: &str, name: &str, owner: Option<&str>, target: &str) -> AssociationEnd {
        AssociationEnd::new(
            Id::new(id),
            Some(name.to_string()),
            owner.map(|o| ClassRef::new(Id::new(o), o)),
            ClassRef::new(Id::new(target), target),
            Multiplicity::default(),
        )
    }

    #[test]
    fn test_navigability_follows_owner() {
        let navigable = end("e1", "b", Some("A"), "B");
        let dangling = end("e2", "a", None, "A");

        assert!(navigable.is_navigable());
        assert!(!dangling.is_navigable());
        assert_eq!(navigable.qualified_name().as_deref(), Some("A.b"));
        assert_eq!(dangling.qualified_name(), None);
    }

    #[test]
    fn test_pairs_swap_roles() {
        let association = Association::new(
            Id::new("as1"),
            end("e1", "b", Some("A"), "B"),
            end("e2", "a", Some("B"), "A"),
        );

        let [(h1, t1), (h2, t2)] = association.pairs();
        assert_eq!(h1.name(), Some("b"));
        assert_eq!(t1.name(), Some("a"));
        assert_eq!(h2.name(), Some("a"));
        assert_eq!(t2.name(), Some("b"));
    }

    #[test]
    fn test_simple_attribute_end() {
        let association = Association::new(
            Id::new("as2"),
            end("e3", "body", Some("Comment"), "String").with_simple_attribute(true),
            end("e4", "comment", None, "Comment"),
        );

        assert_eq!(
            association.simple_attribute_end().and_then(|e| e.name()),
            Some("body")
        );
    }
}
