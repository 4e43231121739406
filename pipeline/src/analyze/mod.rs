//! Analysis phase: snapshot → DAG verdict and pipeline statistics.
//!
//! Everything here is a pure function of the snapshot passed in. Nothing is
//! cached between calls and the input is never modified.

pub mod cycle;
pub mod report;
pub mod topo;

pub use report::{DagReport, PipelineReport};

use crate::config::PipelineConfig;
use crate::parse::graph::PipelineGraph;
use crate::parse::types::Pipeline;
use crate::validate;

use report::{MSG_CYCLE, MSG_EMPTY, MSG_VALID};

/// Decide whether the snapshot is a DAG.
pub fn check_dag(pipeline: &Pipeline) -> DagReport {
    let graph = PipelineGraph::build(&pipeline.nodes, &pipeline.edges);
    dag_report(&graph, pipeline.edges.len())
}

/// Full analysis with default options.
pub fn analyze_pipeline(pipeline: &Pipeline) -> PipelineReport {
    analyze_with(pipeline, &PipelineConfig::default())
}

pub fn analyze_with(pipeline: &Pipeline, config: &PipelineConfig) -> PipelineReport {
    let graph = PipelineGraph::build(&pipeline.nodes, &pipeline.edges);
    let dag = dag_report(&graph, pipeline.edges.len());

    let node_types = report::count_node_types(&pipeline.nodes, &graph);
    let isolated_nodes = report::find_isolated(&pipeline.edges, &graph);
    let diagnostics = if config.include_diagnostics {
        validate::validate_structural(pipeline, &graph)
    } else {
        Vec::new()
    };

    PipelineReport {
        dag,
        node_types,
        has_isolated_nodes: !isolated_nodes.is_empty(),
        isolated_nodes,
        diagnostics,
    }
}

fn dag_report(graph: &PipelineGraph, num_edges: usize) -> DagReport {
    let num_nodes = graph.node_count();

    let report = match topo::topo_sort(graph) {
        Ok(order) => DagReport {
            is_dag: true,
            num_nodes,
            num_edges,
            message: (if num_nodes == 0 { MSG_EMPTY } else { MSG_VALID }).to_string(),
            topological_order: Some(order),
            cycle: None,
        },
        Err(_) => DagReport {
            is_dag: false,
            num_nodes,
            num_edges,
            message: MSG_CYCLE.to_string(),
            topological_order: None,
            // Kahn left nodes behind, so a cycle exists among them.
            cycle: Some(cycle::find_cycle(graph).unwrap_or_default()),
        },
    };

    tracing::debug!(
        is_dag = report.is_dag,
        nodes = num_nodes,
        edges = num_edges,
        "analyzed pipeline"
    );
    report
}
