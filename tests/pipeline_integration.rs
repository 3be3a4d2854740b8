use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

struct TestGraph {
    root: PathBuf,
    graph_path: PathBuf,
}

impl TestGraph {
    fn new(prefix: &str, payload: &str) -> Self {
        let root = unique_temp_dir(prefix);
        fs::create_dir_all(&root).expect("create temp dir");
        let graph_path = root.join("graph.json");
        fs::write(&graph_path, payload).expect("write graph payload");
        Self { root, graph_path }
    }

    fn run(&self, args: &[&str]) -> serde_json::Value {
        let output = Command::new(delver_bin())
            .arg("--input")
            .arg(&self.graph_path)
            .args(args)
            .output()
            .expect("run delver");
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        assert!(
            output.status.success(),
            "delver {args:?} failed\nstdout:\n{stdout}\nstderr:\n{stderr}"
        );
        serde_json::from_str(&stdout).expect("parse json output")
    }
}

impl Drop for TestGraph {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn delver_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_delver") {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().expect("resolve current test binary path");
    let target_dir = current_exe
        .parent()
        .and_then(Path::parent)
        .expect("derive cargo target dir from test binary path");
    let bin_name = if cfg!(windows) { "delver.exe" } else { "delver" };
    let fallback = target_dir.join(bin_name);

    if fallback.is_file() {
        fallback
    } else {
        panic!(
            "CARGO_BIN_EXE_delver is not set and fallback binary not found at {}",
            fallback.display()
        );
    }
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("delver-{prefix}-{pid}-{nanos}"))
}

fn node_ids(rendered: &serde_json::Value) -> Vec<String> {
    rendered["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|node| node["id"].as_str().expect("node id").to_string())
        .collect()
}

const CHAIN: &str = r#"{
    "nodes": [
        {"id": "A", "data": {"type": "TABLE", "label": "orders"}},
        {"id": "B", "data": {"type": "SCRIPT", "label": "load.py"}},
        {"id": "C", "data": {"type": "TABLE", "label": "orders_clean"}}
    ],
    "edges": [
        {"id": "e1", "source": "A", "target": "B"},
        {"id": "e2", "source": "B", "target": "C"}
    ]
}"#;

#[test]
fn architect_perspective_hides_scripts_and_their_edges() {
    let graph = TestGraph::new("architect", CHAIN);

    let rendered = graph.run(&["show", "--json", "--perspective", "architect"]);

    assert_eq!(node_ids(&rendered), vec!["A", "C"]);
    assert_eq!(rendered["edges"].as_array().expect("edges").len(), 0);
}

#[test]
fn engineer_focus_isolates_the_full_lineage() {
    let graph = TestGraph::new("focus", CHAIN);

    let rendered = graph.run(&[
        "show",
        "--json",
        "--perspective",
        "engineer",
        "--focus",
        "B",
    ]);

    assert_eq!(node_ids(&rendered), vec!["A", "B", "C"]);
    assert_eq!(rendered["edges"].as_array().expect("edges").len(), 2);
}

#[test]
fn package_scope_keeps_container_and_direct_children() {
    let payload = r#"{
        "nodes": [
            {"id": "P", "data": {"type": "CONTAINER", "label": "pkg"}},
            {"id": "X", "data": {"type": "TABLE", "parentId": "P"}},
            {"id": "Y", "data": {"type": "TABLE", "parentId": "P"}},
            {"id": "Z", "data": {"type": "TABLE"}}
        ],
        "edges": []
    }"#;
    let graph = TestGraph::new("scope", payload);

    let rendered = graph.run(&["show", "--json", "--scope", "P"]);

    assert_eq!(node_ids(&rendered), vec!["P", "X", "Y"]);
}

#[test]
fn impact_lists_the_downstream_closure_only() {
    let payload = r#"{
        "nodes": [
            {"id": "A", "data": {"type": "TABLE"}},
            {"id": "B", "data": {"type": "TABLE"}},
            {"id": "C", "data": {"type": "TABLE"}},
            {"id": "D", "data": {"type": "TABLE"}}
        ],
        "edges": [
            {"id": "e1", "source": "A", "target": "B"},
            {"id": "e2", "source": "B", "target": "C"},
            {"id": "e3", "source": "C", "target": "D"}
        ]
    }"#;
    let graph = TestGraph::new("impact", payload);

    let impacted = graph.run(&["impact", "B", "--json"]);

    let ids: Vec<&str> = impacted
        .as_array()
        .expect("impact array")
        .iter()
        .map(|id| id.as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["B", "C", "D"]);
}

#[test]
fn inspect_lists_direct_connections() {
    let graph = TestGraph::new("inspect", CHAIN);

    let detail = graph.run(&["inspect", "B", "--json"]);

    assert_eq!(detail["id"], "B");
    assert_eq!(detail["type"], "SCRIPT");
    assert_eq!(detail["label"], "load.py");
    assert_eq!(detail["inputs"][0]["id"], "A");
    assert_eq!(detail["outputs"][0]["id"], "C");
}

#[test]
fn inspect_rejects_unknown_nodes() {
    let graph = TestGraph::new("inspect-unknown", CHAIN);

    let output = Command::new(delver_bin())
        .arg("--input")
        .arg(&graph.graph_path)
        .args(["inspect", "nope", "--json"])
        .output()
        .expect("run delver");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown node: nope"), "stderr: {stderr}");
}

#[test]
fn hidden_types_are_filtered_out() {
    let graph = TestGraph::new("hide", CHAIN);

    let rendered = graph.run(&["show", "--json", "--hide", "script"]);

    assert_eq!(node_ids(&rendered), vec!["A", "C"]);
}

#[test]
fn everything_filtered_out_is_an_empty_render_not_an_error() {
    let graph = TestGraph::new("empty", CHAIN);

    let rendered = graph.run(&["show", "--json", "--hide", "table", "--hide", "script"]);

    assert!(node_ids(&rendered).is_empty());
    assert_eq!(rendered["edges"].as_array().expect("edges").len(), 0);
}
