//! Cycle extraction for reporting.

use petgraph::graph::NodeIndex;

use crate::parse::graph::PipelineGraph;

/// Find one cycle by depth-first search.
///
/// Roots are tried in node-list order and successors in edge order. The
/// returned walk starts and ends on the same node, e.g. `[a, b, c, a]`; a
/// self-loop yields `[a, a]`. No claim is made that the cycle is the shortest.
pub fn find_cycle(graph: &PipelineGraph) -> Option<Vec<String>> {
    let count = graph.node_count();
    let mut visited = vec![false; count];
    let mut on_path = vec![false; count];
    let mut path: Vec<NodeIndex> = Vec::new();

    for root in graph.indices() {
        if visited[root.index()] {
            continue;
        }

        // Each frame is a node on the current path and the position of the
        // next successor to try.
        let mut frames: Vec<(NodeIndex, usize)> = vec![(root, 0)];
        visited[root.index()] = true;
        on_path[root.index()] = true;
        path.push(root);

        while let Some(frame) = frames.last_mut() {
            let (node, cursor) = *frame;
            match graph.ordered_successors(node).get(cursor) {
                Some(&next) => {
                    frame.1 += 1;
                    if !visited[next.index()] {
                        visited[next.index()] = true;
                        on_path[next.index()] = true;
                        path.push(next);
                        frames.push((next, 0));
                    } else if on_path[next.index()] {
                        return Some(close_cycle(graph, &path, next));
                    }
                }
                None => {
                    on_path[node.index()] = false;
                    path.pop();
                    frames.pop();
                }
            }
        }
    }

    None
}

fn close_cycle(graph: &PipelineGraph, path: &[NodeIndex], repeated: NodeIndex) -> Vec<String> {
    let start = path.iter().position(|&n| n == repeated).unwrap_or(0);
    path[start..]
        .iter()
        .chain(std::iter::once(&repeated))
        .map(|&n| graph.id(n).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::{NodeKind, PipelineEdge, PipelineNode};

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> PipelineGraph {
        let nodes: Vec<_> = ids
            .iter()
            .map(|id| PipelineNode::of_kind(*id, NodeKind::Math))
            .collect();
        let edges: Vec<_> = edges
            .iter()
            .enumerate()
            .map(|(i, (s, t))| PipelineEdge::new(format!("e{}", i), *s, *t))
            .collect();
        PipelineGraph::build(&nodes, &edges)
    }

    #[test]
    fn acyclic_has_none() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("a", "c"), ("b", "c")]);
        assert_eq!(find_cycle(&g), None);
    }

    #[test]
    fn self_loop() {
        let g = graph(&["a"], &[("a", "a")]);
        assert_eq!(find_cycle(&g).unwrap(), vec!["a", "a"]);
    }

    #[test]
    fn cycle_slice_excludes_lead_in() {
        let g = graph(
            &["in", "a", "b", "c"],
            &[("in", "a"), ("a", "b"), ("b", "c"), ("c", "a")],
        );
        assert_eq!(find_cycle(&g).unwrap(), vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn cross_edge_into_finished_branch_is_not_a_cycle() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("c", "b")]);
        assert_eq!(find_cycle(&g), None);
    }

    #[test]
    fn first_cycle_in_dfs_order_wins() {
        let g = graph(
            &["x", "y", "p", "q"],
            &[("p", "q"), ("q", "p"), ("x", "y"), ("y", "x")],
        );
        assert_eq!(find_cycle(&g).unwrap(), vec!["x", "y", "x"]);
    }
}
