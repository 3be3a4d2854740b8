use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::graph::Graph;
use crate::core::node::{NodeId, NodeType};
use crate::layout::{LayoutMode, Position};

pub mod dot;

/// Rendering hint derived from the node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    Table,
    Transform,
    Group,
    Plain,
}

impl RenderKind {
    pub fn for_type(ty: NodeType) -> Self {
        match ty {
            NodeType::Source | NodeType::Sink | NodeType::Table | NodeType::View => Self::Table,
            NodeType::Transform => Self::Transform,
            NodeType::Package | NodeType::Container => Self::Group,
            _ => Self::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Normal,
    Impacted,
    Dimmed,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderNode {
    pub id: NodeId,
    pub kind: RenderKind,
    pub label: String,
    #[serde(rename = "type")]
    pub ty: NodeType,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    pub entry: AnchorSide,
    pub exit: AnchorSide,
    pub emphasis: Emphasis,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub emphasis: Emphasis,
    pub animated: bool,
}

/// The engine's outbound surface. `generation` bumps on every recomputation
/// and doubles as the re-fit-viewport signal for the renderer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub generation: u64,
}

/// Merge graph, geometry, and the optional impact overlay into render
/// geometry. The overlay only re-weights; node and edge sets are untouched.
pub fn build(
    graph: &Graph,
    positions: &HashMap<NodeId, Position>,
    mode: LayoutMode,
    impacted: Option<&HashSet<NodeId>>,
    generation: u64,
) -> RenderedGraph {
    let (entry, exit) = match mode {
        LayoutMode::TopBottom => (AnchorSide::Top, AnchorSide::Bottom),
        _ => (AnchorSide::Left, AnchorSide::Right),
    };

    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let emphasis = match impacted {
                Some(set) if set.contains(&node.id) => Emphasis::Impacted,
                Some(_) => Emphasis::Dimmed,
                None => Emphasis::Normal,
            };
            RenderNode {
                id: node.id.clone(),
                kind: RenderKind::for_type(node.ty),
                label: node.label.clone(),
                ty: node.ty,
                position: positions.get(&node.id).copied().unwrap_or_default(),
                parent: node.parent.clone(),
                entry,
                exit,
                emphasis,
                attrs: node.attrs.clone(),
            }
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|edge| {
            let (emphasis, animated) = match impacted {
                Some(set) => {
                    let hit = set.contains(&edge.source) && set.contains(&edge.target);
                    (
                        if hit {
                            Emphasis::Impacted
                        } else {
                            Emphasis::Dimmed
                        },
                        hit,
                    )
                }
                None => (Emphasis::Normal, true),
            };
            RenderEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                label: edge.label.clone(),
                emphasis,
                animated,
            }
        })
        .collect();

    RenderedGraph {
        nodes,
        edges,
        generation,
    }
}
