//! petgraph-based directed graph over a pipeline snapshot.
//!
//! Node indices follow the first occurrence of each id in the node list, and
//! successor lists follow edge order, so every traversal built on top of this
//! structure is deterministic for a given snapshot.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::{PipelineEdge, PipelineNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub edge_id: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

/// An edge left out of the adjacency because an endpoint is not a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingEdge {
    pub edge_id: String,
    pub source: String,
    pub target: String,
    pub missing_source: bool,
    pub missing_target: bool,
}

#[derive(Debug, Clone)]
pub struct PipelineGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    pub node_indices: HashMap<String, NodeIndex>,
    /// Edges skipped for adjacency/in-degree purposes.
    pub dangling: Vec<DanglingEdge>,
    /// Ids seen more than once in the node list, once per repeat.
    pub duplicate_nodes: Vec<String>,
    successors: Vec<Vec<NodeIndex>>,
}

impl PipelineGraph {
    /// Never fails: duplicate node ids collapse onto their first position and
    /// edges with an unknown endpoint are recorded in `dangling`.
    pub fn build(nodes: &[PipelineNode], edges: &[PipelineEdge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut duplicate_nodes = Vec::new();

        for node in nodes {
            if node_indices.contains_key(&node.id) {
                duplicate_nodes.push(node.id.clone());
                continue;
            }
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
        }

        let mut successors = vec![Vec::new(); graph.node_count()];
        let mut dangling = Vec::new();

        for edge in edges {
            let source_idx = node_indices.get(&edge.source);
            let target_idx = node_indices.get(&edge.target);

            match (source_idx, target_idx) {
                (Some(&s), Some(&t)) => {
                    graph.add_edge(
                        s,
                        t,
                        EdgeLabel {
                            edge_id: edge.id.clone(),
                            source_handle: edge.source_handle.clone(),
                            target_handle: edge.target_handle.clone(),
                        },
                    );
                    successors[s.index()].push(t);
                }
                (s, t) => dangling.push(DanglingEdge {
                    edge_id: edge.id.clone(),
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    missing_source: s.is_none(),
                    missing_target: t.is_none(),
                }),
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dangling = dangling.len(),
            duplicates = duplicate_nodes.len(),
            "built pipeline graph"
        );

        PipelineGraph {
            graph,
            node_indices,
            dangling,
            duplicate_nodes,
            successors,
        }
    }

    /// Distinct nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Edges that made it into the adjacency.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.node_indices.contains_key(node_id)
    }

    /// Node indices in node-list order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn id(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Successor indices in edge order; parallel edges repeat the target.
    pub fn ordered_successors(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.successors
            .get(idx.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn successors(&self, node_id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        self.ordered_successors(idx)
            .iter()
            .map(|&n| self.graph[n].as_str())
            .collect()
    }

    pub fn predecessors(&self, node_id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        let mut incoming: Vec<_> = self.graph.edges_directed(idx, Direction::Incoming).collect();
        incoming.sort_by_key(|e| e.id());
        incoming
            .into_iter()
            .map(|e| self.graph[e.source()].as_str())
            .collect()
    }

    pub fn in_degree(&self, node_id: &str) -> usize {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return 0;
        };
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    pub fn out_degree(&self, node_id: &str) -> usize {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return 0;
        };
        self.ordered_successors(idx).len()
    }
}
