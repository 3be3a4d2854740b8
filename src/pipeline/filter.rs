use std::collections::HashSet;

use crate::core::graph::Graph;
use crate::core::node::{Node, NodeId};
use crate::core::state::{FilterState, Perspective};

/// Perspective exclusion, then per-type visibility, then edge cleanup.
/// Pure and idempotent: applying it to its own output changes nothing.
pub fn apply(graph: &Graph, filters: &FilterState) -> Graph {
    let nodes: Vec<Node> = graph
        .nodes
        .iter()
        .filter(|node| {
            if filters.perspective == Perspective::Architect && node.ty.is_technical() {
                return false;
            }
            filters.is_visible(node.ty)
        })
        .cloned()
        .collect();

    let present: HashSet<&NodeId> = nodes.iter().map(|node| &node.id).collect();
    let edges = graph
        .edges
        .iter()
        .filter(|edge| present.contains(&edge.source) && present.contains(&edge.target))
        .cloned()
        .collect();

    Graph { nodes, edges }
}
