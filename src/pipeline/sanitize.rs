use std::collections::HashSet;

use crate::core::graph::Graph;
use crate::core::node::NodeId;

/// Clear containment references that point outside the surviving node set.
/// Runs after isolation and scoping; a dangling parent pointer would crash
/// the renderer, an un-parented node just becomes a root.
pub fn apply(graph: &mut Graph) {
    let ids: HashSet<NodeId> = graph.nodes.iter().map(|node| node.id.clone()).collect();
    for node in &mut graph.nodes {
        if node
            .parent
            .as_ref()
            .is_some_and(|parent| !ids.contains(parent))
        {
            node.parent = None;
        }
    }
}
