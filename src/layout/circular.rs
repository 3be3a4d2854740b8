use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::core::graph::Graph;
use crate::core::node::NodeId;
use crate::layout::Position;

const RADIUS_PER_NODE: f64 = 30.0;
const MIN_RADIUS: f64 = 300.0;

/// Flat scatter around a circle centered at the origin. Radius grows with
/// node count but never drops below the floor. A single node sits at the
/// origin so the angle step never divides by anything degenerate.
pub fn compute(graph: &Graph) -> HashMap<NodeId, Position> {
    let mut positions = HashMap::new();
    let count = graph.nodes.len();
    if count == 0 {
        return positions;
    }
    if count == 1 {
        positions.insert(graph.nodes[0].id.clone(), Position::default());
        return positions;
    }

    let radius = (count as f64 * RADIUS_PER_NODE).max(MIN_RADIUS);
    let step = TAU / count as f64;
    for (index, node) in graph.nodes.iter().enumerate() {
        let angle = index as f64 * step;
        positions.insert(
            node.id.clone(),
            Position {
                x: radius * angle.cos(),
                y: radius * angle.sin(),
            },
        );
    }
    positions
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use crate::core::graph::Graph;
    use crate::core::node::{Node, NodeId, NodeType};
    use crate::layout::circular;
    use crate::layout::Position;

    fn node(id: &str) -> Node {
        Node {
            id: NodeId::new(id),
            ty: NodeType::Table,
            ty_raw: "TABLE".to_string(),
            label: id.to_string(),
            parent: None,
            attrs: Map::new(),
        }
    }

    fn assert_close(actual: Position, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn four_nodes_sit_on_the_floor_radius() {
        let graph = Graph::new(
            vec![node("n0"), node("n1"), node("n2"), node("n3")],
            Vec::new(),
        );

        let positions = circular::compute(&graph);

        // radius = max(4 * 30, 300) = 300, quarter-turn steps
        assert_close(positions[&NodeId::new("n0")], 300.0, 0.0);
        assert_close(positions[&NodeId::new("n1")], 0.0, 300.0);
        assert_close(positions[&NodeId::new("n2")], -300.0, 0.0);
        assert_close(positions[&NodeId::new("n3")], 0.0, -300.0);
    }

    #[test]
    fn radius_scales_past_the_floor() {
        let nodes: Vec<Node> = (0..12).map(|i| node(&format!("n{i}"))).collect();
        let graph = Graph::new(nodes, Vec::new());

        let positions = circular::compute(&graph);

        // 12 * 30 = 360 beats the 300 floor; node 0 sits at angle zero
        assert_close(positions[&NodeId::new("n0")], 360.0, 0.0);
    }

    #[test]
    fn single_node_lands_at_the_origin() {
        let graph = Graph::new(vec![node("only")], Vec::new());
        let positions = circular::compute(&graph);
        assert_close(positions[&NodeId::new("only")], 0.0, 0.0);
    }

    #[test]
    fn empty_graph_yields_no_positions() {
        let positions = circular::compute(&Graph::default());
        assert!(positions.is_empty());
    }
}
