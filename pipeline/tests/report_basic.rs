//! Integration tests for report aggregation: type histogram, isolation, diagnostics.

#[allow(dead_code)]
mod helpers;

use helpers::*;
use pipeline::analyze;
use pipeline::config::PipelineConfig;
use pipeline::parse;

#[test]
fn example_pipeline_report() {
    let json = include_str!("fixtures/example_pipeline.json");
    let p = parse::parse(json).unwrap();
    let report = analyze::analyze_pipeline(&p);

    assert!(report.is_dag());
    assert_eq!(report.node_types.len(), 5);
    assert!(report.node_types.values().all(|&count| count == 1));
    assert_eq!(report.isolated_nodes, vec!["date-1"]);
    assert!(report.has_isolated_nodes);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn node_types_fall_back_to_unknown() {
    let p = build_pipeline(
        &[("a", "math"), ("b", "math"), ("c", "widget"), ("d", "customInput")],
        &[],
    );
    let report = analyze::analyze_pipeline(&p);
    assert_eq!(report.node_types.get("math"), Some(&2));
    assert_eq!(report.node_types.get("unknown"), Some(&1));
    assert_eq!(report.node_types.get("customInput"), Some(&1));
    assert_eq!(report.node_types.get("widget"), None);
}

#[test]
fn duplicate_id_typed_by_last_record() {
    let p = build_pipeline(&[("x", "math"), ("x", "api")], &[]);
    let report = analyze::analyze_pipeline(&p);
    assert_eq!(report.dag.num_nodes, 1);
    assert_eq!(report.node_types.get("api"), Some(&1));
    assert_eq!(report.node_types.get("math"), None);
    assert_has_diagnostic(&report.diagnostics, "D004");
}

#[test]
fn node_with_only_dangling_edges_is_connected() {
    let p = text_pipeline(&["A", "B"], &[("A", "nowhere")]);
    let report = analyze::analyze_pipeline(&p);
    assert_eq!(report.isolated_nodes, vec!["B"]);

    let graph = parse::PipelineGraph::build(&p.nodes, &p.edges);
    assert!(graph.successors("A").is_empty());
}

#[test]
fn no_isolated_nodes_when_all_wired() {
    let p = text_pipeline(&["A", "B"], &[("A", "B")]);
    let report = analyze::analyze_pipeline(&p);
    assert!(report.isolated_nodes.is_empty());
    assert!(!report.has_isolated_nodes);
}

#[test]
fn structural_diagnostics() {
    let p = text_pipeline(
        &["A", "B"],
        &[("A", "B"), ("A", "B"), ("B", "B"), ("ghost", "A")],
    );
    let report = analyze::analyze_pipeline(&p);
    assert_has_diagnostic(&report.diagnostics, "D001");
    assert_no_diagnostic(&report.diagnostics, "D002");
    assert_has_diagnostic(&report.diagnostics, "D003");
    assert_has_diagnostic(&report.diagnostics, "D006");
    assert_no_diagnostic(&report.diagnostics, "D005");
    // Diagnostics never change the verdict.
    assert!(!report.is_dag());
    assert_eq!(report.dag.cycle, Some(vec!["B".to_string(), "B".to_string()]));
}

#[test]
fn duplicate_edge_ids_flagged() {
    let mut p = text_pipeline(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
    p.edges[1].id = "e1".into();
    let report = analyze::analyze_pipeline(&p);
    assert_has_diagnostic(&report.diagnostics, "D005");
}

#[test]
fn diagnostics_can_be_disabled() {
    let config = PipelineConfig {
        include_diagnostics: false,
        ..PipelineConfig::default()
    };
    let p = text_pipeline(&["A"], &[("A", "ghost")]);
    let report = analyze::analyze_with(&p, &config);
    assert!(report.diagnostics.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("diagnostics").is_none());
}

#[test]
fn dangling_report_snapshot() {
    let json = include_str!("fixtures/dangling_edge.json");
    let p = parse::parse(json).unwrap();
    let report = analyze::analyze_pipeline(&p);
    insta::assert_json_snapshot!(report, @r###"
    {
      "isDAG": true,
      "numNodes": 3,
      "numEdges": 3,
      "message": "Pipeline is a valid DAG (no cycles detected)",
      "topologicalOrder": [
        "api-1",
        "sort-1",
        "customOutput-1"
      ],
      "cycle": null,
      "nodeTypes": {
        "api": 1,
        "customOutput": 1,
        "unknown": 1
      },
      "isolatedNodes": [
        "sort-1"
      ],
      "hasIsolatedNodes": true,
      "diagnostics": [
        {
          "code": "D001",
          "phase": "structure",
          "message": "Edge 'e2' references unknown source node 'ghost-1'",
          "nodeId": null
        },
        {
          "code": "D002",
          "phase": "structure",
          "message": "Edge 'e3' references unknown target node 'llm-9'",
          "nodeId": null
        }
      ]
    }
    "###);
}

#[test]
fn cycle_report_snapshot() {
    let p = text_pipeline(&["A", "B"], &[("A", "B"), ("B", "A")]);
    let report = analyze::analyze_pipeline(&p);
    insta::assert_json_snapshot!(report, @r###"
    {
      "isDAG": false,
      "numNodes": 2,
      "numEdges": 2,
      "message": "Pipeline contains a cycle and is not a valid DAG",
      "topologicalOrder": null,
      "cycle": [
        "A",
        "B",
        "A"
      ],
      "nodeTypes": {
        "text": 2
      },
      "isolatedNodes": [],
      "hasIsolatedNodes": false
    }
    "###);
}
