use std::collections::HashSet;

use crate::core::graph::Graph;
use crate::core::node::{NodeId, NodeType};
use crate::core::state::{FilterState, Perspective};
use crate::error::Result;
use crate::ingest::{self, GraphPayload};
use crate::layout::{self, LayoutMode};
use crate::pipeline::{self, impact, PipelineInputs};
use crate::render::{self, RenderedGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// Issued per fetch; responses carrying an outdated token are discarded so a
/// slow response can never overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchToken(u64);

/// Owns the raw graph and all interactive state, and re-runs the full
/// pipeline whenever any of them change. Derived values are replaced
/// wholesale on each recomputation, never patched.
#[derive(Debug, Default)]
pub struct GraphController {
    phase: Phase,
    latest_token: u64,
    raw: Option<Graph>,
    filters: FilterState,
    focus: Option<NodeId>,
    scope: Option<NodeId>,
    impact_enabled: bool,
    impact_source: Option<NodeId>,
    layout: LayoutMode,
    current: Graph,
    impacted: HashSet<NodeId>,
    rendered: RenderedGraph,
    generation: u64,
}

impl GraphController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rendered(&self) -> &RenderedGraph {
        &self.rendered
    }

    /// The post-pipeline graph backing the current render.
    pub fn current_graph(&self) -> &Graph {
        &self.current
    }

    pub fn raw_graph(&self) -> Option<&Graph> {
        self.raw.as_ref()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn impacted(&self) -> &HashSet<NodeId> {
        &self.impacted
    }

    pub fn begin_fetch(&mut self) -> FetchToken {
        self.latest_token += 1;
        self.phase = Phase::Loading;
        FetchToken(self.latest_token)
    }

    /// Apply a fetch outcome. Stale tokens are dropped silently. A failure
    /// keeps the previous raw graph visible and hands the error back.
    pub fn complete_fetch(&mut self, token: FetchToken, result: Result<GraphPayload>) -> Result<bool> {
        if token.0 != self.latest_token {
            return Ok(false);
        }
        match result {
            Ok(payload) => {
                self.raw = Some(ingest::into_graph(payload));
                self.phase = Phase::Ready;
                self.recompute();
                Ok(true)
            }
            Err(err) => {
                self.phase = if self.raw.is_some() {
                    Phase::Ready
                } else {
                    Phase::Idle
                };
                Err(err)
            }
        }
    }

    pub fn set_perspective(&mut self, perspective: Perspective) {
        self.filters.perspective = perspective;
        self.recompute();
    }

    pub fn set_type_visible(&mut self, ty: NodeType, visible: bool) {
        self.filters.set_visible(ty, visible);
        self.recompute();
    }

    pub fn set_focus(&mut self, focus: Option<NodeId>) {
        self.focus = focus;
        self.recompute();
    }

    pub fn set_scope(&mut self, scope: Option<NodeId>) {
        self.scope = scope;
        self.recompute();
    }

    pub fn set_layout(&mut self, mode: LayoutMode) {
        self.layout = mode;
        self.recompute();
    }

    pub fn set_impact_mode(&mut self, enabled: bool) {
        self.impact_enabled = enabled;
        if !enabled {
            self.impact_source = None;
        }
        self.recompute();
    }

    /// Node click dispatch. A container click activates package scope and
    /// clears any impact selection; container clicks beat impact
    /// propagation. Otherwise, with impact mode on, the click selects the
    /// impact source.
    pub fn click_node(&mut self, id: &NodeId) {
        let is_group = self
            .raw
            .as_ref()
            .and_then(|graph| graph.node(id))
            .map(|node| node.ty.is_group())
            .unwrap_or(false);
        if is_group {
            self.scope = Some(id.clone());
            self.impact_source = None;
            self.recompute();
            return;
        }
        if self.impact_enabled {
            self.impact_source = Some(id.clone());
        } else {
            self.impact_source = None;
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        let Some(raw) = self.raw.as_ref() else {
            return;
        };

        let graph = pipeline::run(PipelineInputs {
            graph: raw,
            filters: &self.filters,
            focus: self.focus.as_ref(),
            scope: self.scope.as_ref(),
        });

        let positions = layout::compute(&graph, self.layout);

        self.impacted = match self.impact_source.as_ref() {
            Some(source) if self.impact_enabled && graph.contains(source) => {
                impact::downstream_set(&graph, source)
            }
            _ => HashSet::new(),
        };

        self.generation += 1;
        let overlay = (!self.impacted.is_empty()).then_some(&self.impacted);
        self.rendered = render::build(&graph, &positions, self.layout, overlay, self.generation);
        self.current = graph;
    }
}
