//! Structural diagnostics (D001–D006).
//!
//! None of these fail analysis; they describe snapshot defects the analyzer
//! tolerates.

use std::collections::HashSet;

use crate::error::Diagnostic;
use crate::parse::graph::PipelineGraph;
use crate::parse::types::Pipeline;

/// Run every rule. Returns all findings in rule order.
pub fn validate_structural(pipeline: &Pipeline, graph: &PipelineGraph) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    d001_d002_dangling_endpoints(graph, &mut diagnostics);
    d003_no_duplicate_connections(pipeline, &mut diagnostics);
    d004_unique_node_ids(graph, &mut diagnostics);
    d005_unique_edge_ids(pipeline, &mut diagnostics);
    d006_no_self_loops(pipeline, &mut diagnostics);

    diagnostics
}

fn d001_d002_dangling_endpoints(graph: &PipelineGraph, diagnostics: &mut Vec<Diagnostic>) {
    for edge in &graph.dangling {
        if edge.missing_source {
            diagnostics.push(Diagnostic::structure(
                "D001",
                format!(
                    "Edge '{}' references unknown source node '{}'",
                    edge.edge_id, edge.source
                ),
                None,
            ));
        }
        if edge.missing_target {
            diagnostics.push(Diagnostic::structure(
                "D002",
                format!(
                    "Edge '{}' references unknown target node '{}'",
                    edge.edge_id, edge.target
                ),
                None,
            ));
        }
    }
}

fn d003_no_duplicate_connections(pipeline: &Pipeline, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for edge in &pipeline.edges {
        if !seen.insert(edge.connection_key()) {
            diagnostics.push(Diagnostic::structure(
                "D003",
                format!("Duplicate connection from '{}' to '{}'", edge.source, edge.target),
                None,
            ));
        }
    }
}

fn d004_unique_node_ids(graph: &PipelineGraph, diagnostics: &mut Vec<Diagnostic>) {
    for id in &graph.duplicate_nodes {
        diagnostics.push(Diagnostic::structure(
            "D004",
            format!("Node id '{}' appears more than once; the last record wins", id),
            Some(id.clone()),
        ));
    }
}

fn d005_unique_edge_ids(pipeline: &Pipeline, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for edge in &pipeline.edges {
        if !seen.insert(edge.id.as_str()) {
            diagnostics.push(Diagnostic::structure(
                "D005",
                format!("Edge id '{}' appears more than once", edge.id),
                None,
            ));
        }
    }
}

fn d006_no_self_loops(pipeline: &Pipeline, diagnostics: &mut Vec<Diagnostic>) {
    for edge in &pipeline.edges {
        if edge.source == edge.target {
            diagnostics.push(Diagnostic::structure(
                "D006",
                format!("Self-loop detected on node '{}'", edge.source),
                Some(edge.source.clone()),
            ));
        }
    }
}
