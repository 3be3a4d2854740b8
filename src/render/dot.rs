use std::collections::HashSet;

use crate::core::graph::Graph;
use crate::core::node::NodeId;
use crate::render::RenderKind;

/// Graphviz DOT export of the current graph, with optional impact
/// highlighting.
pub fn render_dot(graph: &Graph, impacted: Option<&HashSet<NodeId>>) -> String {
    let mut out = String::from("digraph lineage {\n  rankdir=LR;\n");

    for node in &graph.nodes {
        let mut attrs = vec![format!("label=\"{}\"", escape_dot_label(&node.label))];
        if RenderKind::for_type(node.ty) == RenderKind::Group {
            attrs.push("shape=folder".to_string());
        } else {
            attrs.push("shape=box".to_string());
        }
        if let Some(set) = impacted {
            if set.contains(&node.id) {
                attrs.push("color=orange".to_string());
                attrs.push("penwidth=2".to_string());
            } else {
                attrs.push("color=gray".to_string());
            }
        }
        out.push_str(&format!(
            "  \"{}\" [{}];\n",
            node.id.as_str(),
            attrs.join(", ")
        ));
    }

    for edge in &graph.edges {
        let mut attrs = Vec::new();
        if let Some(label) = edge.label.as_ref() {
            attrs.push(format!("label=\"{}\"", escape_dot_label(label)));
        }
        if let Some(set) = impacted {
            if set.contains(&edge.source) && set.contains(&edge.target) {
                attrs.push("color=orange".to_string());
                attrs.push("penwidth=2".to_string());
            } else {
                attrs.push("color=gray".to_string());
            }
        }
        let suffix = if attrs.is_empty() {
            String::new()
        } else {
            format!(" [{}]", attrs.join(", "))
        };
        out.push_str(&format!(
            "  \"{}\" -> \"{}\"{};\n",
            edge.source.as_str(),
            edge.target.as_str(),
            suffix
        ));
    }

    out.push_str("}\n");
    out
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
