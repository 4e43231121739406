//! Kahn's algorithm over the pipeline graph.

use std::collections::VecDeque;

use petgraph::Direction;
use petgraph::graph::NodeIndex;

use crate::parse::graph::PipelineGraph;

/// FIFO topological sort. Zero in-degree nodes are seeded in node-list order
/// and successors are released in edge order, so the result is one fixed
/// order per snapshot.
///
/// Returns the sorted ids on success, or `Err` with the partial order when a
/// cycle keeps some nodes from ever reaching in-degree 0.
pub fn topo_sort(graph: &PipelineGraph) -> Result<Vec<String>, Vec<String>> {
    let mut in_degree: Vec<usize> = graph
        .indices()
        .map(|idx| graph.graph.edges_directed(idx, Direction::Incoming).count())
        .collect();

    let mut queue: VecDeque<NodeIndex> = graph
        .indices()
        .filter(|idx| in_degree[idx.index()] == 0)
        .collect();
    let mut order = Vec::with_capacity(graph.node_count());

    while let Some(current) = queue.pop_front() {
        order.push(graph.id(current).to_string());

        for &next in graph.ordered_successors(current) {
            let degree = &mut in_degree[next.index()];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() == graph.node_count() {
        Ok(order)
    } else {
        Err(order)
    }
}
