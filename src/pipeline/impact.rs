use std::collections::{HashSet, VecDeque};

use crate::core::graph::Graph;
use crate::core::node::NodeId;

/// Forward-only BFS from the clicked node, inclusive of it. The result is a
/// presentation overlay; it never removes anything from the graph.
pub fn downstream_set(graph: &Graph, start: &NodeId) -> HashSet<NodeId> {
    let mut affected: HashSet<NodeId> = HashSet::new();
    affected.insert(start.clone());
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    queue.push_back(start.clone());

    while let Some(current) = queue.pop_front() {
        for edge in &graph.edges {
            if edge.source != current {
                continue;
            }
            if affected.insert(edge.target.clone()) {
                queue.push_back(edge.target.clone());
            }
        }
    }

    affected
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use crate::core::graph::Graph;
    use crate::core::node::{Edge, Node, NodeId, NodeType};
    use crate::pipeline::impact;

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

    fn edge(id: &str, source: &str, target: &str) -> Edge {
        Edge {
            id: id.to_string(),
            source: NodeId::new(source),
            target: NodeId::new(target),
            label: None,
            rel: None,
        }
    }

    fn chain() -> Graph {
        Graph::new(
            vec![node("a"), node("b"), node("c"), node("d")],
            vec![
                edge("e1", "a", "b"),
                edge("e2", "b", "c"),
                edge("e3", "c", "d"),
            ],
        )
    }

    #[test]
    fn impact_excludes_upstream_nodes() {
        let affected = impact::downstream_set(&chain(), &NodeId::new("b"));

        for expected in ["b", "c", "d"] {
            assert!(affected.contains(&NodeId::new(expected)), "missing {expected}");
        }
        assert!(!affected.contains(&NodeId::new("a")));
    }

    #[test]
    fn impact_set_is_forward_closed() {
        let graph = chain();
        let affected = impact::downstream_set(&graph, &NodeId::new("a"));

        for edge in &graph.edges {
            if affected.contains(&edge.source) {
                assert!(
                    affected.contains(&edge.target),
                    "edge {} escapes the impacted set",
                    edge.id
                );
            }
        }
    }

    #[test]
    fn impact_survives_cycles() {
        let graph = Graph::new(
            vec![node("a"), node("b")],
            vec![edge("e1", "a", "b"), edge("e2", "b", "a")],
        );

        let affected = impact::downstream_set(&graph, &NodeId::new("a"));

        assert_eq!(affected.len(), 2);
    }
}
