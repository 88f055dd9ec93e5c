//! Structural checks over the elaborated model.

use petgraph::{algo::toposort, graphmap::DiGraphMap};

use modelgen_core::{identifier::Id, semantic::Model};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    loader::Schema,
};

/// Check that the generalization relation is acyclic.
///
/// Class definitions are written parents first, which needs a DAG.
pub fn check_generalizations(schema: &Schema, model: &Model) -> Result<()> {
    let mut graph: DiGraphMap<Id, ()> = DiGraphMap::new();
    for class in model.classes() {
        graph.add_node(class.id());
        for &parent in class.generalizations() {
            graph.add_edge(parent, class.id(), ());
        }
    }

    toposort(&graph, None).map(|_| ()).map_err(|cycle| {
        let id = cycle.node_id();
        let name = model
            .class(id)
            .map_or_else(|| id.to_string(), |class| class.name().to_string());
        Diagnostic::error(format!("class `{name}` is its own ancestor"))
            .with_code(ErrorCode::E206)
            .with_label_at(schema.span(id), "part of a generalization cycle")
            .with_help("remove one of the generalizations in the cycle")
    })
}
