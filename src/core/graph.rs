use std::collections::{HashMap, HashSet};

use crate::core::node::{Edge, Node, NodeId, NodeType};

/// An immutable snapshot of a lineage graph. Node order is preserved from
/// ingestion so every downstream stage is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Direct upstream/downstream neighbors of one node, with the edge label
/// each connection came in on.
#[derive(Debug, Clone, Default)]
pub struct Connections {
    pub inputs: Vec<(NodeId, Option<String>)>,
    pub outputs: Vec<(NodeId, Option<String>)>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node_ids(&self) -> HashSet<NodeId> {
        self.nodes.iter().map(|node| node.id.clone()).collect()
    }

    /// Keep only the given nodes, then drop edges that lost an endpoint.
    pub fn restrict_to(&self, keep: &HashSet<NodeId>) -> Graph {
        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|node| keep.contains(&node.id))
            .cloned()
            .collect();
        let present: HashSet<&NodeId> = nodes.iter().map(|node| &node.id).collect();
        let edges = self
            .edges
            .iter()
            .filter(|edge| present.contains(&edge.source) && present.contains(&edge.target))
            .cloned()
            .collect();
        Graph { nodes, edges }
    }

    pub fn type_counts(&self) -> HashMap<NodeType, usize> {
        let mut counts = HashMap::new();
        for node in &self.nodes {
            *counts.entry(node.ty).or_insert(0) += 1;
        }
        counts
    }

    pub fn connections_of(&self, id: &NodeId) -> Connections {
        let mut connections = Connections::default();
        for edge in &self.edges {
            if &edge.target == id && self.contains(&edge.source) {
                connections
                    .inputs
                    .push((edge.source.clone(), edge.label.clone()));
            }
            if &edge.source == id && self.contains(&edge.target) {
                connections
                    .outputs
                    .push((edge.target.clone(), edge.label.clone()));
            }
        }
        connections
    }
}
