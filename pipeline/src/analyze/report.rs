//! Report records returned to the presentation layer.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;
use crate::parse::graph::PipelineGraph;
use crate::parse::types::{NodeKind, PipelineEdge, PipelineNode};

/// Histogram bucket for nodes without a recognized `type`.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Separator used when a cycle is rendered as a single line.
pub const CYCLE_SEPARATOR: &str = " → ";

pub const MSG_EMPTY: &str = "Empty graph is a valid DAG";
pub const MSG_VALID: &str = "Pipeline is a valid DAG (no cycles detected)";
pub const MSG_CYCLE: &str = "Pipeline contains a cycle and is not a valid DAG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagReport {
    #[serde(rename = "isDAG")]
    pub is_dag: bool,
    /// Distinct node ids.
    pub num_nodes: usize,
    /// Every edge in the snapshot, dangling ones included.
    pub num_edges: usize,
    pub message: String,
    /// Set exactly when `is_dag`.
    pub topological_order: Option<Vec<String>>,
    /// Set exactly when `!is_dag`; a closed walk such as `[a, b, a]`.
    pub cycle: Option<Vec<String>>,
}

impl DagReport {
    /// `a → b → a`, for display.
    pub fn cycle_display(&self) -> Option<String> {
        self.cycle.as_ref().map(|c| c.join(CYCLE_SEPARATOR))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    #[serde(flatten)]
    pub dag: DagReport,
    pub node_types: BTreeMap<String, usize>,
    pub isolated_nodes: Vec<String>,
    pub has_isolated_nodes: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl PipelineReport {
    pub fn is_dag(&self) -> bool {
        self.dag.is_dag
    }
}

/// Count nodes per type tag, one entry per distinct id. When an id repeats,
/// the last record decides its type.
pub fn count_node_types(nodes: &[PipelineNode], graph: &PipelineGraph) -> BTreeMap<String, usize> {
    let latest: HashMap<&str, &PipelineNode> =
        nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut counts = BTreeMap::new();
    for idx in graph.indices() {
        let tag = latest
            .get(graph.id(idx))
            .and_then(|n| n.kind())
            .map(NodeKind::tag)
            .unwrap_or(UNKNOWN_TYPE);
        *counts.entry(tag.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Node ids named by no edge at all. An edge whose other end is missing
/// still connects the endpoint that exists.
pub fn find_isolated(edges: &[PipelineEdge], graph: &PipelineGraph) -> Vec<String> {
    let connected: HashSet<&str> = edges
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();

    graph
        .indices()
        .map(|idx| graph.id(idx))
        .filter(|id| !connected.contains(id))
        .map(str::to_string)
        .collect()
}
