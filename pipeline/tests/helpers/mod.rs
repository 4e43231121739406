use pipeline::parse::*;

// =============================================================================
// Pipeline builders
// =============================================================================

/// Nodes as `(id, type)` pairs; edges as `(source, target)` pairs with ids
/// `e1`, `e2`, ... in order.
pub fn build_pipeline(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> Pipeline {
    Pipeline {
        nodes: nodes.iter().map(|(id, ty)| node(id, ty)).collect(),
        edges: edges
            .iter()
            .enumerate()
            .map(|(i, (s, t))| PipelineEdge::new(format!("e{}", i + 1), *s, *t))
            .collect(),
    }
}

/// Nodes of the `text` kind, named by id only.
pub fn text_pipeline(ids: &[&str], edges: &[(&str, &str)]) -> Pipeline {
    let nodes: Vec<(&str, &str)> = ids.iter().map(|id| (*id, "text")).collect();
    build_pipeline(&nodes, edges)
}

pub fn node(id: &str, node_type: &str) -> PipelineNode {
    let data = match NodeKind::from_tag(node_type) {
        Some(kind) => NodeData::default_for(kind),
        None => NodeData::Unrecognized {
            type_tag: Some(node_type.to_string()),
            data: serde_json::json!({}),
        },
    };
    PipelineNode::new(id, data)
}

// =============================================================================
// Assertions
// =============================================================================

/// Index of `id` in `order`, failing the test if it is missing.
pub fn position_of(order: &[String], id: &str) -> usize {
    order
        .iter()
        .position(|n| n == id)
        .unwrap_or_else(|| panic!("'{}' missing from order {:?}", id, order))
}

pub fn assert_has_diagnostic(diagnostics: &[pipeline::error::Diagnostic], code: &str) {
    assert!(
        diagnostics.iter().any(|d| d.code == code),
        "Expected diagnostic {}, got: {:?}",
        code,
        diagnostics
    );
}

pub fn assert_no_diagnostic(diagnostics: &[pipeline::error::Diagnostic], code: &str) {
    assert!(
        !diagnostics.iter().any(|d| d.code == code),
        "Did not expect diagnostic {}, but got: {:?}",
        code,
        diagnostics
    );
}
