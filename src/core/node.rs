use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed vocabulary of lineage node types. Anything outside the vocabulary
/// lands on `Default` so styling lookups never miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    Table,
    View,
    Database,
    Pipeline,
    Process,
    Script,
    File,
    Package,
    Container,
    Transform,
    Source,
    Sink,
    Task,
    Activity,
    Procedure,
    Code,
    Doc,
    Default,
}

impl NodeType {
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "TABLE" => Self::Table,
            "VIEW" => Self::View,
            "DATABASE" => Self::Database,
            "PIPELINE" => Self::Pipeline,
            "PROCESS" => Self::Process,
            "SCRIPT" => Self::Script,
            "FILE" => Self::File,
            "PACKAGE" => Self::Package,
            "CONTAINER" => Self::Container,
            "TRANSFORM" => Self::Transform,
            "SOURCE" => Self::Source,
            "SINK" => Self::Sink,
            "TASK" => Self::Task,
            "ACTIVITY" => Self::Activity,
            "PROCEDURE" => Self::Procedure,
            "CODE" => Self::Code,
            "DOC" => Self::Doc,
            _ => Self::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::Database => "DATABASE",
            Self::Pipeline => "PIPELINE",
            Self::Process => "PROCESS",
            Self::Script => "SCRIPT",
            Self::File => "FILE",
            Self::Package => "PACKAGE",
            Self::Container => "CONTAINER",
            Self::Transform => "TRANSFORM",
            Self::Source => "SOURCE",
            Self::Sink => "SINK",
            Self::Task => "TASK",
            Self::Activity => "ACTIVITY",
            Self::Procedure => "PROCEDURE",
            Self::Code => "CODE",
            Self::Doc => "DOC",
            Self::Default => "DEFAULT",
        }
    }

    /// Technical detail types hidden from the architect perspective.
    pub fn is_technical(self) -> bool {
        matches!(
            self,
            Self::Transform
                | Self::Script
                | Self::File
                | Self::Source
                | Self::Sink
                | Self::Pipeline
                | Self::Process
                | Self::Package
                | Self::Container
                | Self::Task
        )
    }

    pub fn is_group(self) -> bool {
        matches!(self, Self::Package | Self::Container)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub ty: NodeType,
    /// Case-normalized wire type, kept verbatim for downstream consumers.
    pub ty_raw: String,
    pub label: String,
    pub parent: Option<NodeId>,
    /// Opaque passthrough attributes (summary, schema, columns, ...).
    pub attrs: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub label: Option<String>,
    pub rel: Option<String>,
}
