use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::graph::Graph;
use crate::core::node::{Node, NodeId};

pub mod circular;
pub mod layered;

pub const NODE_WIDTH: f64 = 220.0;
pub const NODE_HEIGHT: f64 = 80.0;
pub const GROUP_WIDTH: f64 = 600.0;
pub const GROUP_HEIGHT: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    #[default]
    LeftRight,
    TopBottom,
    Circular,
}

impl LayoutMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "lr" | "left-right" => Some(Self::LeftRight),
            "tb" | "top-bottom" => Some(Self::TopBottom),
            "circular" => Some(Self::Circular),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftRight => "lr",
            Self::TopBottom => "tb",
            Self::Circular => "circular",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

pub(crate) fn box_size(node: &Node) -> (f64, f64) {
    if node.ty.is_group() {
        (GROUP_WIDTH, GROUP_HEIGHT)
    } else {
        (NODE_WIDTH, NODE_HEIGHT)
    }
}

/// Assign a position to every node. Layered modes honor containment by
/// re-expressing child positions in the parent's local frame; circular mode
/// ignores hierarchy entirely.
pub fn compute(graph: &Graph, mode: LayoutMode) -> HashMap<NodeId, Position> {
    match mode {
        LayoutMode::Circular => circular::compute(graph),
        LayoutMode::LeftRight | LayoutMode::TopBottom => {
            let mut positions = layered::compute(graph, mode);
            relativize(graph, &mut positions);
            positions
        }
    }
}

/// Convert absolute child coordinates into offsets from the parent's
/// top-left corner. Works from a snapshot of the absolute positions so
/// nested containers read their parent's pre-adjustment coordinates. A node
/// whose parent has no position is left absolute.
fn relativize(graph: &Graph, positions: &mut HashMap<NodeId, Position>) {
    let absolute = positions.clone();
    for node in &graph.nodes {
        let Some(parent) = node.parent.as_ref() else {
            continue;
        };
        let Some(parent_pos) = absolute.get(parent) else {
            continue;
        };
        if let Some(pos) = positions.get_mut(&node.id) {
            pos.x -= parent_pos.x;
            pos.y -= parent_pos.y;
        }
    }
}
