//! The authoritative node/edge collections behind an editor session.
//!
//! A `GraphStore` is an owned value: whoever drives the editor holds it and
//! passes it by reference. The analyzer never sees it directly, only the
//! owned [`Pipeline`] returned by [`GraphStore::snapshot`].
//!
//! # Id contract
//!
//! [`GraphStore::next_id`] is the only source of fresh node ids. Counters are
//! per type tag, start at 1 and never go backwards, so removing `math-2` does
//! not make `math-2` available again. Loading a snapshot leaves counters
//! alone unless `reconcile_counters_on_load` is set; call
//! [`GraphStore::reconcile_id_counters`] to do it explicitly.
//!
//! # Duplicate ids
//!
//! Adding a node whose id already exists is a caller error. The store
//! resolves it last-write-wins: the old record is replaced in place and keeps
//! its position in iteration order.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::parse::{self, Pipeline, PipelineEdge, PipelineNode};

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<PipelineNode>,
    edges: Vec<PipelineEdge>,
    id_counters: BTreeMap<String, u64>,
    config: PipelineConfig,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        GraphStore {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Ids
    // -------------------------------------------------------------------------

    /// Mint `"<type>-<n>"` with `n` one past the last value issued for `type`.
    ///
    /// Once a counter reaches `u64::MAX` (only possible after reconciling
    /// against an imported id with that suffix), minting continues under the
    /// prefix `"<type>-18446744073709551615"`, giving `"<type>-18446744073709551615-1"`
    /// and so on.
    pub fn next_id(&mut self, node_type: &str) -> String {
        let counter = self.id_counters.entry(node_type.to_string()).or_insert(0);
        match counter.checked_add(1) {
            Some(n) => {
                *counter = n;
                format!("{}-{}", node_type, n)
            }
            None => {
                warn!(node_type, "id counter exhausted, minting under extended prefix");
                self.next_id(&format!("{}-{}", node_type, u64::MAX))
            }
        }
    }

    /// Last counter issued for `node_type`, if any.
    pub fn id_counter(&self, node_type: &str) -> Option<u64> {
        self.id_counters.get(node_type).copied()
    }

    /// Raise every counter to at least the highest `<type>-<n>` present among
    /// the current nodes. Counters never decrease.
    pub fn reconcile_id_counters(&mut self) {
        for node in &self.nodes {
            let Some((prefix, suffix)) = node.id.rsplit_once('-') else {
                continue;
            };
            let Ok(n) = suffix.parse::<u64>() else {
                continue;
            };
            let counter = self.id_counters.entry(prefix.to_string()).or_insert(0);
            if n > *counter {
                *counter = n;
            }
        }
        debug!(counters = ?self.id_counters, "reconciled id counters");
    }

    // -------------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------------

    pub fn add_node(&mut self, node: PipelineNode) {
        if let Some(existing) = self.nodes.iter_mut().find(|n| n.id == node.id) {
            warn!(id = %node.id, "node id already present, replacing existing record");
            *existing = node;
            return;
        }
        debug!(id = %node.id, node_type = ?node.type_tag(), "added node");
        self.nodes.push(node);
    }

    /// Remove a node and every edge touching it. No-op for unknown ids.
    pub fn remove_node(&mut self, node_id: &str) {
        let before = (self.nodes.len(), self.edges.len());
        self.nodes.retain(|n| n.id != node_id);
        self.edges.retain(|e| !e.touches(node_id));
        debug!(
            id = node_id,
            nodes_removed = before.0 - self.nodes.len(),
            edges_removed = before.1 - self.edges.len(),
            "removed node"
        );
    }

    /// Set one key of a node's `data`. Returns false if the node is absent.
    pub fn update_node_field(&mut self, node_id: &str, field: &str, value: Value) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) else {
            return false;
        };
        node.data = node.data.with_field(field, value);
        true
    }

    pub fn node(&self, node_id: &str) -> Option<&PipelineNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn nodes(&self) -> &[PipelineNode] {
        &self.nodes
    }

    // -------------------------------------------------------------------------
    // Edges
    // -------------------------------------------------------------------------

    /// Append an edge as given. Cycles and duplicates are left for analysis.
    pub fn add_edge(&mut self, edge: PipelineEdge) {
        debug!(id = %edge.id, source = %edge.source, target = %edge.target, "added edge");
        self.edges.push(edge);
    }

    /// Wire two handles together and return the new edge's id.
    pub fn connect(
        &mut self,
        source: &str,
        source_handle: Option<&str>,
        target: &str,
        target_handle: Option<&str>,
    ) -> String {
        let base = format!(
            "edge-{}{}-{}{}",
            source,
            source_handle.unwrap_or_default(),
            target,
            target_handle.unwrap_or_default()
        );
        let mut id = base.clone();
        let mut n = 1;
        while self.edges.iter().any(|e| e.id == id) {
            n += 1;
            id = format!("{}-{}", base, n);
        }

        let edge =
            PipelineEdge::new(id.clone(), source, target).with_handles(source_handle, target_handle);
        self.add_edge(edge);
        id
    }

    pub fn remove_edge(&mut self, edge_id: &str) {
        self.edges.retain(|e| e.id != edge_id);
    }

    pub fn edge(&self, edge_id: &str) -> Option<&PipelineEdge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    pub fn edges(&self) -> &[PipelineEdge] {
        &self.edges
    }

    // -------------------------------------------------------------------------
    // Whole-graph operations
    // -------------------------------------------------------------------------

    /// Replace both collections wholesale.
    pub fn load_snapshot(&mut self, nodes: Vec<PipelineNode>, edges: Vec<PipelineEdge>) {
        debug!(nodes = nodes.len(), edges = edges.len(), "loaded snapshot");
        self.nodes = nodes;
        self.edges = edges;
        if self.config.reconcile_counters_on_load {
            self.reconcile_id_counters();
        }
    }

    /// Parse a pipeline file and load it. On error the store is unchanged.
    pub fn import_json(&mut self, json: &str) -> Result<(), PipelineError> {
        let pipeline = parse::parse(json).inspect_err(|e| {
            warn!(error = %e, "rejected pipeline import");
        })?;
        self.load_snapshot(pipeline.nodes, pipeline.edges);
        Ok(())
    }

    pub fn export_json(&self) -> Result<String, PipelineError> {
        parse::to_json(&self.snapshot(), self.config.export_indent)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.id_counters.clear();
        debug!("cleared store");
    }

    /// Owned copy of the current nodes and edges.
    pub fn snapshot(&self) -> Pipeline {
        Pipeline {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
