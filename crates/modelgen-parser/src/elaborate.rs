//! Elaboration phase: schema table to semantic model.
//!
//! This module classifies the records of a loaded schema, resolves their
//! references and builds the [`Model`] handed to generation. Every problem
//! found along the way is collected, so one run reports all of them.

use log::{debug, info, trace};

use modelgen_core::{
    identifier::Id,
    schema::{ElementKind, Record},
    semantic::{
        Association, AssociationEnd, Attribute, Class, ClassRef, Enumeration, Model, Operation,
    },
};

use crate::{
    elaborate_utils,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError, Result},
    loader::Schema,
    metaclass,
    resolve::{ResolveError, Resolver},
    stereotype, validate,
};

/// Configuration for the elaboration phase.
///
/// Holds the naming conventions that decide how classes are interpreted.
#[derive(Debug, Clone)]
pub struct ElaborateConfig {
    /// Class name suffixes that mark a class as an enumeration
    pub enumeration_suffixes: Vec<String>,
    /// Stereotype name marking classes that are folded into string attributes
    pub simple_attribute_stereotype: String,
}

impl Default for ElaborateConfig {
    fn default() -> Self {
        Self {
            enumeration_suffixes: vec!["Kind".to_string(), "Sort".to_string()],
            simple_attribute_stereotype: "SimpleAttribute".to_string(),
        }
    }
}

impl ElaborateConfig {
    /// Create a new ElaborateConfig with the given naming conventions
    pub fn new(enumeration_suffixes: Vec<String>, simple_attribute_stereotype: impl Into<String>) -> Self {
        Self {
            enumeration_suffixes,
            simple_attribute_stereotype: simple_attribute_stereotype.into(),
        }
    }

    /// Check whether a class or type name denotes an enumeration.
    pub fn is_enumeration_name(&self, name: &str) -> bool {
        self.enumeration_suffixes
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
    }
}

/// Records of the schema, partitioned by kind.
#[derive(Debug, Default)]
struct Partition<'a> {
    classes: Vec<&'a Record>,
    enumerations: Vec<&'a Record>,
    generalizations: Vec<&'a Record>,
    associations: Vec<&'a Record>,
    extensions: Vec<&'a Record>,
}

/// Outcome of resolving one association.
enum Resolved {
    Association(Association),
    /// One of the ends touches a metaclass.
    Ignored,
}

/// A class reference of an association end.
enum EndClass {
    Absent,
    Metaclass,
    Class(ClassRef),
}

pub struct Builder<'a> {
    cfg: &'a ElaborateConfig,
    schema: &'a Schema,
    resolver: Resolver<'a>,
    diagnostics: DiagnosticCollector,
    model: Model,
}

impl<'a> Builder<'a> {
    pub fn new(cfg: &'a ElaborateConfig, schema: &'a Schema) -> Self {
        Self {
            cfg,
            schema,
            resolver: Resolver::new(schema),
            diagnostics: DiagnosticCollector::new(),
            model: Model::new(),
        }
    }

    // ============================================================================
    // Main Entry Method
    // ============================================================================

    pub fn build(mut self) -> std::result::Result<Model, ParseError> {
        debug!(elements = self.schema.table().len(); "Elaborating schema");

        let partition = self.classify();
        self.build_enumerations(&partition.enumerations);
        self.link_generalizations(&partition.generalizations);

        // Everything below walks the hierarchy.
        if let Err(diagnostic) = validate::check_generalizations(self.schema, &self.model) {
            self.diagnostics.emit(diagnostic);
            return self.diagnostics.finish().map(|()| self.model);
        }

        let result = metaclass::filter_metaclasses(&self.resolver, &partition.extensions, &mut self.model);
        self.check_resolved(result);

        self.apply_stereotypes(&partition.classes);
        self.build_features(&partition.classes);
        self.build_associations(&partition.associations);

        self.diagnostics.finish()?;

        info!(
            classes = self.model.classes().count(),
            enumerations = self.model.enumerations().count(),
            associations = self.model.associations().len();
            "Model elaboration completed successfully"
        );
        Ok(self.model)
    }

    fn check_resolved<T>(&mut self, result: std::result::Result<T, ResolveError>) -> Option<T> {
        let result = result.map_err(|err| err.into_diagnostic(self.schema));
        self.diagnostics.check(result)
    }

    fn is_simple_attribute_class(&self, id: Id) -> bool {
        self.model
            .class(id)
            .is_some_and(|class| class.has_stereotype(&self.cfg.simple_attribute_stereotype))
    }

    // ============================================================================
    // Classification
    // ============================================================================

    /// Partition the records and add every named class to the model.
    fn classify(&mut self) -> Partition<'a> {
        let mut partition = Partition::default();

        for record in self.schema.table().records() {
            match record.kind() {
                ElementKind::Class => match record.name() {
                    Some(name) if self.cfg.is_enumeration_name(name) => {
                        partition.enumerations.push(record);
                    }
                    Some(name) => {
                        self.model.add_class(Class::new(record.id(), name));
                        partition.classes.push(record);
                    }
                    None => debug!(id:% = record.id(); "Ignoring unnamed class"),
                },
                ElementKind::Generalization => partition.generalizations.push(record),
                ElementKind::Association => partition.associations.push(record),
                ElementKind::Extension => partition.extensions.push(record),
                _ => {}
            }
        }

        debug!(
            classes = partition.classes.len(),
            enumerations = partition.enumerations.len(),
            generalizations = partition.generalizations.len(),
            associations = partition.associations.len(),
            extensions = partition.extensions.len();
            "Classified schema records"
        );
        partition
    }

    /// Enumeration literals are the names of the owned attributes, in order.
    fn build_enumerations(&mut self, records: &[&'a Record]) {
        for record in records {
            let resolved = self
                .resolver
                .many_of(record, "ownedAttribute", &ElementKind::Property);
            let Some(properties) = self.check_resolved(resolved) else {
                continue;
            };

            let mut literals = Vec::with_capacity(properties.len());
            for property in properties {
                let name = elaborate_utils::required_name(self.schema, property, "enumeration literal");
                if let Some(name) = self.diagnostics.check(name) {
                    literals.push(name.to_string());
                }
            }

            let name = record.name().unwrap_or_default();
            trace!(enumeration = name, literals:? = literals; "Built enumeration");
            self.model
                .add_enumeration(Enumeration::new(record.id(), name, literals));
        }
    }

    fn link_generalizations(&mut self, records: &[&'a Record]) {
        for record in records {
            let specific = self.generalization_end(record, "specific");
            let general = self.generalization_end(record, "general");
            let (Some(specific), Some(general)) = (specific, general) else {
                continue;
            };

            if let Some(class) = self.model.class_mut(specific) {
                class.add_generalization(general);
            }
            if let Some(class) = self.model.class_mut(general) {
                class.add_specialization(specific);
            }
        }
    }

    /// Resolve one side of a generalization to a class of the model.
    fn generalization_end(&mut self, record: &Record, field: &'static str) -> Option<Id> {
        let resolved = self.resolver.one(record, field);
        let target = self.check_resolved(resolved)?;

        let Some(target) = target else {
            self.diagnostics.emit(
                Diagnostic::error(format!("generalization `{}` has no `{field}` class", record.id()))
                    .with_code(ErrorCode::E200)
                    .with_label_at(self.schema.span(record.id()), "incomplete generalization")
                    .with_help("a generalization needs both a `specific` and a `general` reference"),
            );
            return None;
        };

        if self.model.class(target.id()).is_none() {
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "`{field}` of generalization `{}` refers to `{}`, which is not a class",
                    record.id(),
                    target.id()
                ))
                .with_code(ErrorCode::E209)
                .with_label_at(self.schema.span(record.id()), "generalization of a non-class")
                .with_help("generalizations connect named classes"),
            );
            return None;
        }
        Some(target.id())
    }

    // ============================================================================
    // Stereotypes
    // ============================================================================

    fn apply_stereotypes(&mut self, classes: &[&'a Record]) {
        let mut explicit = Vec::new();
        for record in classes {
            if self.model.class(record.id()).is_none() {
                // Removed as a metaclass.
                continue;
            }
            let resolved = self.resolver.stereotype_name(record);
            if let Some(Some(name)) = self.check_resolved(resolved) {
                explicit.push((record.id(), name.to_string()));
            }
        }
        stereotype::propagate(&mut self.model, &explicit);
    }

    // ============================================================================
    // Attributes and Operations
    // ============================================================================

    fn build_features(&mut self, classes: &[&'a Record]) {
        for record in classes {
            let Some(class) = self.model.class(record.id()) else {
                continue;
            };
            if self.is_simple_attribute_class(record.id()) {
                debug!(class = class.name(); "Ignoring features of simple attribute class");
                continue;
            }
            let class_name = class.name().to_string();

            let resolved = self
                .resolver
                .many_of(record, "ownedAttribute", &ElementKind::Property);
            for property in self.check_resolved(resolved).unwrap_or_default() {
                let attribute = self.build_attribute(property, &class_name);
                if let Some(attribute) = self.diagnostics.check(attribute) {
                    if let Some(class) = self.model.class_mut(record.id()) {
                        class.add_attribute(attribute);
                    }
                }
            }

            let resolved = self
                .resolver
                .many_of(record, "ownedOperation", &ElementKind::Operation);
            for operation in self.check_resolved(resolved).unwrap_or_default() {
                let name = elaborate_utils::required_name(self.schema, operation, "operation");
                let Some(name) = self.diagnostics.check(name) else {
                    continue;
                };
                if let Some(class) = self.model.class_mut(record.id()) {
                    class.add_operation(Operation::new(operation.id(), name, class_name.as_str()));
                }
            }
        }
    }

    fn build_attribute(&self, property: &Record, class_name: &str) -> Result<Attribute> {
        let name = elaborate_utils::required_name(self.schema, property, "attribute")?;
        let in_association = property.has_reference("association");
        let type_name = elaborate_utils::optional_text(property, "typeValue");

        if type_name.is_none() && !in_association {
            return Err(
                Diagnostic::error(format!("type is not specified for attribute `{class_name}.{name}`"))
                    .with_code(ErrorCode::E203)
                    .with_label_at(self.schema.span(property.id()), "attribute without type")
                    .with_help("add a `typeValue` to this property"),
            );
        }

        let multiplicity = elaborate_utils::parse_multiplicity(self.schema, property)?;
        let derived = elaborate_utils::parse_flag(self.schema, property, "isDerived")?;

        Ok(Attribute::new(property.id(), name, class_name, type_name)
            .with_default_value(elaborate_utils::optional_text(property, "defaultValue"))
            .with_multiplicity(multiplicity)
            .with_derived(derived)
            .with_association(in_association))
    }

    // ============================================================================
    // Associations
    // ============================================================================

    fn build_associations(&mut self, records: &[&'a Record]) {
        for record in records {
            match self.build_association(record) {
                Ok(Resolved::Association(association)) => self.model.add_association(association),
                Ok(Resolved::Ignored) => {
                    debug!(association:% = record.id(); "Ignoring association of a metaclass");
                }
                Err(diagnostic) => self.diagnostics.emit(diagnostic),
            }
        }
    }

    fn build_association(&self, record: &Record) -> Result<Resolved> {
        let ends = self
            .resolver
            .many_of(record, "memberEnd", &ElementKind::Property)
            .map_err(|err| err.into_diagnostic(self.schema))?;

        let [head, tail] = ends.as_slice() else {
            return Err(Diagnostic::error(format!(
                "association `{}` has {} member ends, expected 2",
                record.id(),
                ends.len()
            ))
            .with_code(ErrorCode::E201)
            .with_label_at(self.schema.span(record.id()), "malformed association")
            .with_help("an association connects exactly two properties"));
        };

        let (Some(head), Some(tail)) = (self.build_end(head)?, self.build_end(tail)?) else {
            return Ok(Resolved::Ignored);
        };
        Ok(Resolved::Association(Association::new(record.id(), head, tail)))
    }

    /// Resolve a class reference of an association end.
    fn end_class(&self, end: &Record, field: &'static str) -> Result<EndClass> {
        let target = self
            .resolver
            .one(end, field)
            .map_err(|err| err.into_diagnostic(self.schema))?;
        let Some(target) = target else {
            return Ok(EndClass::Absent);
        };

        if self.model.is_metaclass(target.id()) {
            return Ok(EndClass::Metaclass);
        }
        match self.model.class(target.id()) {
            Some(class) => Ok(EndClass::Class(ClassRef::new(class.id(), class.name()))),
            None => Err(Diagnostic::error(format!(
                "`{field}` of association end `{}` refers to `{}`, which is not a class",
                end.id(),
                target.id()
            ))
            .with_code(ErrorCode::E209)
            .with_label_at(self.schema.span(end.id()), "association end")
            .with_help("association ends connect named classes")),
        }
    }

    /// Build one end. `Ok(None)` means the end touches a metaclass.
    fn build_end(&self, end: &Record) -> Result<Option<AssociationEnd>> {
        let target = match self.end_class(end, "type")? {
            EndClass::Class(target) => target,
            EndClass::Metaclass => return Ok(None),
            EndClass::Absent => {
                return Err(Diagnostic::error(format!("association end `{}` has no type", end.id()))
                    .with_code(ErrorCode::E201)
                    .with_label_at(self.schema.span(end.id()), "untyped association end")
                    .with_help("add a `type` reference to this property"));
            }
        };
        let owner = match self.end_class(end, "class_")? {
            EndClass::Class(owner) => Some(owner),
            EndClass::Metaclass => return Ok(None),
            EndClass::Absent => None,
        };

        let name = end.name().filter(|name| !name.trim().is_empty());
        if let (Some(owner), None) = (&owner, name) {
            return Err(Diagnostic::error(format!(
                "no name, but navigable: association end `{}` of `{}`",
                end.id(),
                owner.name()
            ))
            .with_code(ErrorCode::E202)
            .with_label_at(self.schema.span(end.id()), "navigable end without a name")
            .with_help("name the end or remove its `class_` reference"));
        }

        let multiplicity = elaborate_utils::parse_multiplicity(self.schema, end)?;
        let derived = elaborate_utils::parse_flag(self.schema, end, "isDerived")?;
        let tags = self
            .resolver
            .end_tags(end)
            .map_err(|err| err.into_diagnostic(self.schema))?;
        let simple_attribute = self.is_simple_attribute_class(target.id());

        Ok(Some(
            AssociationEnd::new(end.id(), name.map(str::to_string), owner, target, multiplicity)
                .with_default_value(elaborate_utils::optional_text(end, "defaultValue"))
                .with_composite(end.value("aggregation") == Some("composite"))
                .with_derived(derived)
                .with_redefines(tags.redefines)
                .with_subsets(tags.subsets)
                .with_simple_attribute(simple_attribute),
        ))
    }
}

#[cfg(test)]
mod tests {
    use modelgen_core::semantic::{Bound, TagOrigin};

    use super::*;
    use crate::loader::load_schema;

    fn elaborate(source: &str) -> std::result::Result<Model, ParseError> {
        let schema = load_schema(source).expect("test schema should load");
        Builder::new(&ElaborateConfig::default(), &schema).build()
    }

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(Diagnostic::code).collect()
    }

    const HIERARCHY: &str = r#"
        [[element]]
        id = "c1"
        kind = "Class"
        values = { name = "Element" }
        references = { ownedAttribute = ["p1"], ownedOperation = ["o1"] }

        [[element]]
        id = "c2"
        kind = "Class"
        values = { name = "Comment" }

        [[element]]
        id = "g1"
        kind = "Generalization"
        references = { specific = "c2", general = "c1" }

        [[element]]
        id = "p1"
        kind = "Property"
        values = { name = "visibility", typeValue = "VisibilityKind", defaultValue = "public" }

        [[element]]
        id = "o1"
        kind = "Operation"
        values = { name = "isTemplate" }

        [[element]]
        id = "e1"
        kind = "Class"
        values = { name = "VisibilityKind" }
        references = { ownedAttribute = ["l1", "l2"] }

        [[element]]
        id = "l1"
        kind = "Property"
        values = { name = "public" }

        [[element]]
        id = "l2"
        kind = "Property"
        values = { name = "private" }
    "#;

    #[test]
    fn test_classify_hierarchy() {
        let model = elaborate(HIERARCHY).unwrap();

        let names: Vec<_> = model.classes().map(Class::name).collect();
        assert_eq!(names, ["Element", "Comment"]);

        let comment = model.class(Id::new("c2")).unwrap();
        assert_eq!(comment.generalizations(), &[Id::new("c1")]);
        let element = model.class(Id::new("c1")).unwrap();
        assert_eq!(element.specializations(), &[Id::new("c2")]);

        assert_eq!(element.attributes()[0].qualified_name(), "Element.visibility");
        assert_eq!(element.operations()[0].qualified_name(), "Element.isTemplate");

        let enumeration = model.enumerations().next().unwrap();
        assert_eq!(enumeration.name(), "VisibilityKind");
        assert_eq!(enumeration.literals(), ["public", "private"]);
    }

    #[test]
    fn test_custom_enumeration_suffix() {
        let schema = load_schema(HIERARCHY).unwrap();
        let cfg = ElaborateConfig::new(vec!["Enum".to_string()], "SimpleAttribute");
        let model = Builder::new(&cfg, &schema).build().unwrap();

        assert!(model.class(Id::new("e1")).is_some());
        assert_eq!(model.enumerations().count(), 0);
    }

    #[test]
    fn test_attribute_without_type() {
        let source = r#"
            [[element]]
            id = "c1"
            kind = "Class"
            values = { name = "Element" }
            references = { ownedAttribute = ["p1"] }

            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "body" }
        "#;

        let err = elaborate(source).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E203]);
        assert!(!err.diagnostics()[0].labels().is_empty());
    }

    #[test]
    fn test_collects_every_error() {
        let source = r#"
            [[element]]
            id = "c1"
            kind = "Class"
            values = { name = "Element" }
            references = { ownedAttribute = ["p1", "p2"] }

            [[element]]
            id = "g1"
            kind = "Generalization"
            references = { specific = "c1", general = "missing" }

            [[element]]
            id = "p1"
            kind = "Property"
            values = { name = "count", typeValue = "Integer", upperValue = "lots" }

            [[element]]
            id = "p2"
            kind = "Property"
            values = { name = "flag", typeValue = "Boolean", isDerived = "maybe" }
        "#;

        let err = elaborate(source).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E200, ErrorCode::E207, ErrorCode::E208]);
    }

    #[test]
    fn test_generalization_cycle() {
        let source = r#"
            [[element]]
            id = "a"
            kind = "Class"
            values = { name = "A" }

            [[element]]
            id = "b"
            kind = "Class"
            values = { name = "B" }

            [[element]]
            id = "g1"
            kind = "Generalization"
            references = { specific = "a", general = "b" }

            [[element]]
            id = "g2"
            kind = "Generalization"
            references = { specific = "b", general = "a" }
        "#;

        let err = elaborate(source).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E206]);
    }

    const ASSOCIATION: &str = r#"
        [[element]]
        id = "a"
        kind = "Class"
        values = { name = "A" }

        [[element]]
        id = "b"
        kind = "Class"
        values = { name = "B" }

        [[element]]
        id = "as1"
        kind = "Association"
        references = { memberEnd = ["ab", "ba"] }

        [[element]]
        id = "ab"
        kind = "Property"
        values = { name = "b", aggregation = "composite" }
        references = { class_ = "a", type = "b", association = "as1" }

        [[element]]
        id = "ba"
        kind = "Property"
        values = { name = "a", lowerValue = "1", upperValue = "1" }
        references = { class_ = "b", type = "a", association = "as1" }
    "#;

    #[test]
    fn test_association_ends() {
        let model = elaborate(ASSOCIATION).unwrap();
        let association = &model.associations()[0];
        let [ab, ba] = association.ends();

        assert_eq!(ab.qualified_name().as_deref(), Some("A.b"));
        assert_eq!(ab.target().name(), "B");
        assert!(ab.is_composite());
        assert_eq!((ab.lower(), ab.upper()), (Bound::ZERO, Bound::Many));
        assert_eq!((ba.lower(), ba.upper()), (Bound::ONE, Bound::ONE));
    }

    #[test]
    fn test_association_with_one_end() {
        let source = ASSOCIATION.replace(r#"memberEnd = ["ab", "ba"]"#, r#"memberEnd = ["ab"]"#);
        let err = elaborate(&source).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E201]);
    }

    #[test]
    fn test_navigable_end_without_name() {
        let source = ASSOCIATION.replace(r#"name = "b", "#, "");
        let err = elaborate(&source).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E202]);
    }

    #[test]
    fn test_metaclass_association_is_ignored() {
        let source = format!(
            "{ASSOCIATION}{}",
            r#"
            [[element]]
            id = "ext"
            kind = "Extension"
            references = { memberEnd = ["xe"] }

            [[element]]
            id = "xe"
            kind = "Property"
            references = { type = "b" }
            "#
        );

        let model = elaborate(&source).unwrap();
        assert!(model.class(Id::new("b")).is_none());
        assert!(model.associations().is_empty());
    }

    #[test]
    fn test_stereotype_propagation() {
        let source = r#"
            [[element]]
            id = "sa"
            kind = "Class"
            values = { name = "String" }
            references = { appliedStereotype = ["is1"] }

            [[element]]
            id = "sub"
            kind = "Class"
            values = { name = "Text" }

            [[element]]
            id = "g1"
            kind = "Generalization"
            references = { specific = "sub", general = "sa" }

            [[element]]
            id = "is1"
            kind = "InstanceSpecification"
            references = { classifier = ["st"] }

            [[element]]
            id = "st"
            kind = "Stereotype"
            values = { name = "SimpleAttribute" }
        "#;

        let model = elaborate(source).unwrap();
        let text = model.class(Id::new("sub")).unwrap().stereotype().unwrap();
        assert_eq!(text.name(), "SimpleAttribute");
        assert_eq!(text.origin(), TagOrigin::Inherited(Id::new("sa")));
        assert_eq!(model.taggings().len(), 2);
    }
}
