use std::collections::{HashSet, VecDeque};

use crate::core::graph::Graph;
use crate::core::node::NodeId;

#[derive(Debug, Clone, Copy)]
enum Direction {
    Upstream,
    Downstream,
}

/// Restrict the graph to the focus node plus everything reachable from it in
/// either direction. Two BFS runs share one reachable-node accumulator but
/// keep independent queues and visited-edge sets. A focus node already
/// filtered out upstream yields an empty graph.
pub fn apply(graph: &Graph, focus: &NodeId) -> Graph {
    let mut reachable: HashSet<NodeId> = HashSet::new();
    reachable.insert(focus.clone());
    traverse(graph, focus, Direction::Upstream, &mut reachable);
    traverse(graph, focus, Direction::Downstream, &mut reachable);

    if !graph.contains(focus) {
        return Graph::default();
    }
    graph.restrict_to(&reachable)
}

fn traverse(graph: &Graph, start: &NodeId, direction: Direction, reachable: &mut HashSet<NodeId>) {
    let mut visited_edges: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    queue.push_back(start.clone());

    while let Some(current) = queue.pop_front() {
        for edge in &graph.edges {
            if visited_edges.contains(edge.id.as_str()) {
                continue;
            }
            let next = match direction {
                Direction::Upstream => {
                    if edge.target != current {
                        continue;
                    }
                    &edge.source
                }
                Direction::Downstream => {
                    if edge.source != current {
                        continue;
                    }
                    &edge.target
                }
            };
            visited_edges.insert(edge.id.as_str());
            if reachable.insert(next.clone()) {
                queue.push_back(next.clone());
            }
        }
    }
}
