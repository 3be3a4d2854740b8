use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::graph::Graph;
use crate::core::node::{Edge, Node, NodeId, NodeType};
use crate::error::Result;

/// Wire shape of a fetched lineage graph.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphPayload {
    #[serde(default)]
    pub nodes: Vec<NodePayload>,
    #[serde(default)]
    pub edges: Vec<EdgePayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodePayload {
    pub id: String,
    #[serde(default)]
    pub data: NodeData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeData {
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub label: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgePayload {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub rel: Option<String>,
}

pub fn parse_payload(raw: &str) -> Result<GraphPayload> {
    Ok(serde_json::from_str(raw)?)
}

/// Normalize a wire payload into the domain graph: types uppercased, labels
/// resolved, un-parented nodes ordered before parented ones.
pub fn into_graph(payload: GraphPayload) -> Graph {
    let mut raw_nodes = payload.nodes;
    raw_nodes.sort_by_key(|node| node.data.parent_id.is_some());

    let nodes = raw_nodes
        .into_iter()
        .map(|raw| {
            let ty_raw = raw.data.ty.unwrap_or_default().to_uppercase();
            let ty = NodeType::parse(&ty_raw);
            let label = raw
                .data
                .label
                .or(raw.data.name)
                .unwrap_or_else(|| raw.id.clone());
            Node {
                id: NodeId::new(raw.id),
                ty,
                ty_raw,
                label,
                parent: raw.data.parent_id.map(NodeId::new),
                attrs: raw.data.extra,
            }
        })
        .collect();

    let edges = payload
        .edges
        .into_iter()
        .map(|raw| Edge {
            id: raw.id,
            source: NodeId::new(raw.source),
            target: NodeId::new(raw.target),
            label: raw.label,
            rel: raw.rel,
        })
        .collect();

    Graph::new(nodes, edges)
}
