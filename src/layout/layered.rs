use std::collections::{HashMap, VecDeque};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::graph::Graph;
use crate::core::node::NodeId;
use crate::layout::{box_size, LayoutMode, Position};

const RANK_SEP: f64 = 150.0;
const NODE_SEP: f64 = 40.0;
const ORDERING_SWEEPS: usize = 2;

/// Layered hierarchical layout: longest-path ranks along the flow direction,
/// barycenter ordering within ranks, centered coordinates. Positions are box
/// top-left corners.
pub fn compute(graph: &Graph, mode: LayoutMode) -> HashMap<NodeId, Position> {
    let mut dag: DiGraph<NodeId, ()> = DiGraph::new();
    let mut index: HashMap<NodeId, NodeIndex> = HashMap::new();
    for node in &graph.nodes {
        let ix = dag.add_node(node.id.clone());
        index.insert(node.id.clone(), ix);
    }
    for edge in &graph.edges {
        if let (Some(&source), Some(&target)) =
            (index.get(&edge.source), index.get(&edge.target))
        {
            if source != target {
                dag.add_edge(source, target, ());
            }
        }
    }

    let ranks = assign_ranks(&dag);
    let layers = order_ranks(&dag, &ranks);
    coordinates(graph, &dag, &layers, mode)
}

/// Longest path from the sources. Graphs with cycles fall back to BFS ranks
/// so layout always produces something.
fn assign_ranks(dag: &DiGraph<NodeId, ()>) -> HashMap<NodeIndex, usize> {
    let mut ranks: HashMap<NodeIndex, usize> = HashMap::new();
    match toposort(dag, None) {
        Ok(sorted) => {
            for ix in sorted {
                let rank = dag
                    .neighbors_directed(ix, Direction::Incoming)
                    .filter_map(|pred| ranks.get(&pred).copied())
                    .max()
                    .map(|rank| rank + 1)
                    .unwrap_or(0);
                ranks.insert(ix, rank);
            }
        }
        Err(_) => {
            let mut queue: VecDeque<(NodeIndex, usize)> = dag
                .node_indices()
                .filter(|ix| {
                    dag.neighbors_directed(*ix, Direction::Incoming)
                        .next()
                        .is_none()
                })
                .map(|ix| (ix, 0))
                .collect();
            if queue.is_empty() {
                if let Some(first) = dag.node_indices().next() {
                    queue.push_back((first, 0));
                }
            }
            while let Some((ix, rank)) = queue.pop_front() {
                if ranks.contains_key(&ix) {
                    continue;
                }
                ranks.insert(ix, rank);
                for next in dag.neighbors_directed(ix, Direction::Outgoing) {
                    if !ranks.contains_key(&next) {
                        queue.push_back((next, rank + 1));
                    }
                }
            }
            for ix in dag.node_indices() {
                ranks.entry(ix).or_insert(0);
            }
        }
    }
    ranks
}

/// Group nodes by rank, then reduce crossings by sorting each layer on the
/// barycenter of its neighbors' slots. Ties keep the previous order.
fn order_ranks(
    dag: &DiGraph<NodeId, ()>,
    ranks: &HashMap<NodeIndex, usize>,
) -> Vec<Vec<NodeIndex>> {
    let max_rank = ranks.values().copied().max().unwrap_or(0);
    let mut layers: Vec<Vec<NodeIndex>> = vec![Vec::new(); max_rank + 1];
    for ix in dag.node_indices() {
        layers[ranks[&ix]].push(ix);
    }

    for _ in 0..ORDERING_SWEEPS {
        sweep(dag, &mut layers, Direction::Incoming);
        sweep(dag, &mut layers, Direction::Outgoing);
    }
    layers
}

fn sweep(dag: &DiGraph<NodeId, ()>, layers: &mut [Vec<NodeIndex>], toward: Direction) {
    let slots: HashMap<NodeIndex, usize> = layers
        .iter()
        .flat_map(|layer| layer.iter().enumerate().map(|(slot, &ix)| (ix, slot)))
        .collect();

    for layer in layers.iter_mut() {
        let mut keyed: Vec<(f64, usize, NodeIndex)> = layer
            .iter()
            .enumerate()
            .map(|(slot, &ix)| {
                let neighbor_slots: Vec<usize> = dag
                    .neighbors_directed(ix, toward)
                    .filter_map(|neighbor| slots.get(&neighbor).copied())
                    .collect();
                let barycenter = if neighbor_slots.is_empty() {
                    slot as f64
                } else {
                    neighbor_slots.iter().sum::<usize>() as f64 / neighbor_slots.len() as f64
                };
                (barycenter, slot, ix)
            })
            .collect();
        keyed.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        *layer = keyed.into_iter().map(|(_, _, ix)| ix).collect();
    }
}

fn coordinates(
    graph: &Graph,
    dag: &DiGraph<NodeId, ()>,
    layers: &[Vec<NodeIndex>],
    mode: LayoutMode,
) -> HashMap<NodeId, Position> {
    let sizes: HashMap<NodeId, (f64, f64)> = graph
        .nodes
        .iter()
        .map(|node| (node.id.clone(), box_size(node)))
        .collect();
    let horizontal = mode != LayoutMode::TopBottom;

    let mut positions = HashMap::new();
    let mut main_offset = 0.0;
    for layer in layers {
        if layer.is_empty() {
            continue;
        }

        let main_extent = |id: &NodeId| {
            let (w, h) = sizes[id];
            if horizontal {
                w
            } else {
                h
            }
        };
        let cross_extent = |id: &NodeId| {
            let (w, h) = sizes[id];
            if horizontal {
                h
            } else {
                w
            }
        };

        let layer_main = layer
            .iter()
            .map(|&ix| main_extent(&dag[ix]))
            .fold(0.0_f64, f64::max);
        let total_cross: f64 = layer.iter().map(|&ix| cross_extent(&dag[ix])).sum::<f64>()
            + NODE_SEP * (layer.len().saturating_sub(1)) as f64;

        let mut cross_cursor = -total_cross / 2.0;
        for &ix in layer {
            let id = dag[ix].clone();
            let (width, height) = sizes[&id];
            let main_center = main_offset + layer_main / 2.0;
            let cross_center = cross_cursor + cross_extent(&id) / 2.0;
            let (center_x, center_y) = if horizontal {
                (main_center, cross_center)
            } else {
                (cross_center, main_center)
            };
            positions.insert(
                id,
                Position {
                    x: center_x - width / 2.0,
                    y: center_y - height / 2.0,
                },
            );
            cross_cursor += cross_extent(&dag[ix]) + NODE_SEP;
        }
        main_offset += layer_main + RANK_SEP;
    }
    positions
}
