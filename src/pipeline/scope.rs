use std::collections::HashSet;

use crate::core::graph::Graph;
use crate::core::node::NodeId;

/// Restrict the graph to a container node and its direct children. One level
/// only; nested containers are not descended into.
pub fn apply(graph: &Graph, container: &NodeId) -> Graph {
    let mut keep: HashSet<NodeId> = HashSet::new();
    keep.insert(container.clone());
    for node in &graph.nodes {
        if node.parent.as_ref() == Some(container) {
            keep.insert(node.id.clone());
        }
    }
    graph.restrict_to(&keep)
}
