use crate::core::graph::Graph;
use crate::core::node::NodeId;
use crate::core::state::FilterState;

pub mod filter;
pub mod impact;
pub mod isolate;
pub mod sanitize;
pub mod scope;

/// Everything a recomputation depends on. The pipeline is a pure function of
/// these inputs; the controller re-runs it whenever any of them change.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInputs<'a> {
    pub graph: &'a Graph,
    pub filters: &'a FilterState,
    pub focus: Option<&'a NodeId>,
    pub scope: Option<&'a NodeId>,
}

/// Raw graph -> filtered -> isolated -> scoped -> sanitized.
pub fn run(inputs: PipelineInputs<'_>) -> Graph {
    let mut graph = filter::apply(inputs.graph, inputs.filters);
    if let Some(focus) = inputs.focus {
        graph = isolate::apply(&graph, focus);
    }
    if let Some(container) = inputs.scope {
        graph = scope::apply(&graph, container);
    }
    sanitize::apply(&mut graph);
    graph
}
