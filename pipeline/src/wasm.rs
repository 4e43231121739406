//! WASM entry points for the browser editor.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::analyze::{self, DagReport, PipelineReport};
use crate::config::PipelineConfig;
use crate::error::{Diagnostic, PipelineError};
use crate::parse::{NodeData, NodeKind, PipelineNode};
use crate::store::GraphStore;

/// Analyze a pipeline JSON document.
/// Returns a `PipelineReport` object, or `{ status: "error", code, phase,
/// message }` for an unreadable file.
#[wasm_bindgen]
pub fn analyze_pipeline(json: &str) -> JsValue {
    let result = analyze_pipeline_inner(json);
    to_js(&result)
}

fn analyze_pipeline_inner(json: &str) -> AnalysisResult<PipelineReport> {
    match crate::parse::parse(json) {
        Ok(pipeline) => AnalysisResult::Report(analyze::analyze_pipeline(&pipeline)),
        Err(e) => AnalysisResult::from(e),
    }
}

/// DAG verdict only, without type counts or isolation data.
#[wasm_bindgen]
pub fn check_dag(json: &str) -> JsValue {
    let result = check_dag_inner(json);
    to_js(&result)
}

fn check_dag_inner(json: &str) -> AnalysisResult<DagReport> {
    match crate::parse::parse(json) {
        Ok(pipeline) => AnalysisResult::Report(analyze::check_dag(&pipeline)),
        Err(e) => AnalysisResult::from(e),
    }
}

/// One editor session: a graph store the canvas mutates through this handle.
#[wasm_bindgen]
pub struct PipelineEditor {
    store: GraphStore,
}

#[wasm_bindgen]
impl PipelineEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PipelineEditor {
        PipelineEditor {
            store: GraphStore::new(),
        }
    }

    /// Build an editor from a `PipelineConfig` JSON object.
    pub fn with_config(config_json: &str) -> Result<PipelineEditor, String> {
        let config = PipelineConfig::from_json(config_json).map_err(|e| e.to_string())?;
        Ok(PipelineEditor {
            store: GraphStore::with_config(config),
        })
    }

    #[wasm_bindgen(js_name = nextId)]
    pub fn next_id(&mut self, node_type: &str) -> String {
        self.store.next_id(node_type)
    }

    /// Mint an id for `node_type`, place an empty node there and return the id.
    #[wasm_bindgen(js_name = placeNode)]
    pub fn place_node(&mut self, node_type: &str, x: f64, y: f64) -> String {
        let id = self.store.next_id(node_type);
        let data = match NodeKind::from_tag(node_type) {
            Some(kind) => NodeData::default_for(kind),
            None => NodeData::Unrecognized {
                type_tag: Some(node_type.to_string()),
                data: serde_json::Value::Object(serde_json::Map::new()),
            },
        };
        self.store.add_node(PipelineNode::new(id.clone(), data).at(x, y));
        id
    }

    /// Add a node given as JSON. Same-id nodes are replaced.
    #[wasm_bindgen(js_name = addNode)]
    pub fn add_node(&mut self, node_json: &str) -> Result<(), String> {
        let node = serde_json::from_str(node_json).map_err(|e| e.to_string())?;
        self.store.add_node(node);
        Ok(())
    }

    #[wasm_bindgen(js_name = removeNode)]
    pub fn remove_node(&mut self, node_id: &str) {
        self.store.remove_node(node_id);
    }

    /// `value_json` is any JSON value; returns false for unknown nodes.
    #[wasm_bindgen(js_name = updateNodeField)]
    pub fn update_node_field(
        &mut self,
        node_id: &str,
        field: &str,
        value_json: &str,
    ) -> Result<bool, String> {
        let value = serde_json::from_str(value_json).map_err(|e| e.to_string())?;
        Ok(self.store.update_node_field(node_id, field, value))
    }

    pub fn connect(
        &mut self,
        source: &str,
        source_handle: Option<String>,
        target: &str,
        target_handle: Option<String>,
    ) -> String {
        self.store.connect(
            source,
            source_handle.as_deref(),
            target,
            target_handle.as_deref(),
        )
    }

    #[wasm_bindgen(js_name = removeEdge)]
    pub fn remove_edge(&mut self, edge_id: &str) {
        self.store.remove_edge(edge_id);
    }

    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, json: &str) -> Result<(), String> {
        self.store.import_json(json).map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, String> {
        self.store.export_json().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = reconcileIdCounters)]
    pub fn reconcile_id_counters(&mut self) {
        self.store.reconcile_id_counters();
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Report for the current graph as a JS object.
    pub fn analyze(&self) -> JsValue {
        to_js(&self.analyze_report())
    }

    /// Report for the current graph as a JSON string.
    #[wasm_bindgen(js_name = analyzeJson)]
    pub fn analyze_json(&self) -> Result<String, String> {
        serde_json::to_string(&self.analyze_report()).map_err(|e| e.to_string())
    }
}

impl PipelineEditor {
    fn analyze_report(&self) -> PipelineReport {
        analyze::analyze_with(&self.store.snapshot(), self.store.config())
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }
}

impl Default for PipelineEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize to plain JS objects. Maps and flattened structs become objects,
/// never `Map`s.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AnalysisResult<R> {
    Report(R),
    Error(ErrorDto),
}

#[derive(Debug, Serialize)]
struct ErrorDto {
    status: &'static str,
    #[serde(flatten)]
    diagnostic: Diagnostic,
}

impl<R> From<PipelineError> for AnalysisResult<R> {
    fn from(e: PipelineError) -> Self {
        AnalysisResult::Error(ErrorDto {
            status: "error",
            diagnostic: Diagnostic::import("I001", e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_inner_reports_cycle() {
        let json = r#"{
            "nodes": [{"id": "a", "type": "math"}, {"id": "b", "type": "math"}],
            "edges": [
                {"id": "e1", "source": "a", "target": "b"},
                {"id": "e2", "source": "b", "target": "a"}
            ]
        }"#;
        let AnalysisResult::Report(report) = analyze_pipeline_inner(json) else {
            panic!("expected a report");
        };
        assert!(!report.is_dag());
        assert_eq!(report.dag.cycle_display().as_deref(), Some("a → b → a"));
    }

    #[test]
    fn check_dag_inner_rejects_missing_edges_key() {
        let result = check_dag_inner(r#"{"nodes": []}"#);
        let AnalysisResult::Error(err) = result else {
            panic!("expected an error");
        };
        assert_eq!(err.status, "error");
        assert_eq!(err.diagnostic.code, "I001");
        assert!(err.diagnostic.message.starts_with("Invalid pipeline file"));
    }

    #[test]
    fn report_serializes_as_flat_record() {
        let json = r#"{
            "nodes": [{"id": "a", "type": "math"}, {"id": "b", "type": "math"}],
            "edges": [{"id": "e1", "source": "a", "target": "b"}]
        }"#;
        let value = serde_json::to_value(analyze_pipeline_inner(json)).unwrap();
        let record = value.as_object().expect("report is a record");
        assert_eq!(record["isDAG"], serde_json::json!(true));
        assert_eq!(record["topologicalOrder"], serde_json::json!(["a", "b"]));
        assert_eq!(record["nodeTypes"], serde_json::json!({ "math": 2 }));
        assert_eq!(record["isolatedNodes"], serde_json::json!([]));
        assert!(!record.contains_key("dag"));
    }

    #[test]
    fn error_serializes_as_flat_record() {
        let value = serde_json::to_value(check_dag_inner("not json")).unwrap();
        let record = value.as_object().expect("error is a record");
        assert_eq!(record["status"], serde_json::json!("error"));
        assert_eq!(record["code"], serde_json::json!("I001"));
        assert_eq!(record["phase"], serde_json::json!("import"));
        assert!(!record.contains_key("diagnostic"));
    }

    #[test]
    fn editor_session_flow() {
        let mut editor = PipelineEditor::new();
        let input = editor.place_node("customInput", 0.0, 0.0);
        let llm = editor.place_node("llm", 200.0, 0.0);
        assert_eq!(input, "customInput-1");
        assert_eq!(llm, "llm-1");

        editor.connect(&input, Some(format!("{}-value", input)), &llm, None);
        let json = editor.analyze_json().unwrap();
        let report: PipelineReport = serde_json::from_str(&json).unwrap();
        assert!(report.is_dag());
        assert_eq!(
            report.dag.topological_order,
            Some(vec![input.clone(), llm.clone()])
        );

        editor.remove_node(&llm);
        assert!(editor.store().edges().is_empty());
    }

    #[test]
    fn editor_rejects_bad_import_and_keeps_state() {
        let mut editor = PipelineEditor::new();
        editor.place_node("text", 0.0, 0.0);
        assert!(editor.import_json("not json").is_err());
        assert_eq!(editor.store().nodes().len(), 1);
    }
}
