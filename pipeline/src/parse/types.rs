//! Rust types for the editor's pipeline JSON.
//!
//! The wire shape is `{ "nodes": [...], "edges": [...] }` as written by the
//! canvas. Keys the core does not model (`width`, `selected`, edge styling,
//! ...) are kept in `extra` maps so export round-trips them untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// TOP-LEVEL PIPELINE
// =============================================================================

/// A full pipeline document. Also the snapshot handed to the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub nodes: Vec<PipelineNode>,
    pub edges: Vec<PipelineEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PipelineEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        PipelineEdge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            extra: Map::new(),
        }
    }

    pub fn with_handles(mut self, source_handle: Option<&str>, target_handle: Option<&str>) -> Self {
        self.source_handle = source_handle.map(str::to_string);
        self.target_handle = target_handle.map(str::to_string);
        self
    }

    /// Endpoints plus handles; two edges with equal keys draw the same wire.
    pub fn connection_key(&self) -> (&str, &str, Option<&str>, Option<&str>) {
        (
            &self.source,
            &self.target,
            self.source_handle.as_deref(),
            self.target_handle.as_deref(),
        )
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// =============================================================================
// NODE KINDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "customInput", alias = "input")]
    Input,
    #[serde(rename = "customOutput", alias = "output")]
    Output,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "llm")]
    Llm,
    #[serde(rename = "math")]
    Math,
    #[serde(rename = "api")]
    Api,
    #[serde(rename = "condition")]
    Condition,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "memory")]
    Memory,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Input,
        NodeKind::Output,
        NodeKind::Text,
        NodeKind::Llm,
        NodeKind::Math,
        NodeKind::Api,
        NodeKind::Condition,
        NodeKind::Date,
        NodeKind::Memory,
    ];

    /// Canonical wire tag, as the canvas registers it.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Input => "customInput",
            NodeKind::Output => "customOutput",
            NodeKind::Text => "text",
            NodeKind::Llm => "llm",
            NodeKind::Math => "math",
            NodeKind::Api => "api",
            NodeKind::Condition => "condition",
            NodeKind::Date => "date",
            NodeKind::Memory => "memory",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "customInput" | "input" => Some(NodeKind::Input),
            "customOutput" | "output" => Some(NodeKind::Output),
            "text" => Some(NodeKind::Text),
            "llm" => Some(NodeKind::Llm),
            "math" => Some(NodeKind::Math),
            "api" => Some(NodeKind::Api),
            "condition" => Some(NodeKind::Condition),
            "date" => Some(NodeKind::Date),
            "memory" => Some(NodeKind::Memory),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// NODE PAYLOADS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_name: Option<String>,
    /// `Text` or `File`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `{{name}}` placeholders found in `text`; each becomes an input handle.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextData {
    pub fn refresh_variables(&mut self) {
        self.variables = self
            .text
            .as_deref()
            .map(super::variables::extract_variables)
            .unwrap_or_default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// `get` or `set`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// NODE DATA: tagged union over the node kinds
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Input(InputData),
    Output(OutputData),
    Text(TextData),
    Llm(LlmData),
    Math(MathData),
    Api(ApiData),
    Condition(ConditionData),
    Date(DateData),
    Memory(MemoryData),
    /// Missing or unknown `type`, or a payload that does not fit its kind.
    Unrecognized {
        type_tag: Option<String>,
        data: Value,
    },
}

impl NodeData {
    /// Empty payload for a freshly placed node.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Input => NodeData::Input(InputData::default()),
            NodeKind::Output => NodeData::Output(OutputData::default()),
            NodeKind::Text => NodeData::Text(TextData::default()),
            NodeKind::Llm => NodeData::Llm(LlmData::default()),
            NodeKind::Math => NodeData::Math(MathData::default()),
            NodeKind::Api => NodeData::Api(ApiData::default()),
            NodeKind::Condition => NodeData::Condition(ConditionData::default()),
            NodeKind::Date => NodeData::Date(DateData::default()),
            NodeKind::Memory => NodeData::Memory(MemoryData::default()),
        }
    }

    /// Type a raw `(type, data)` pair. Never fails; anything that does not
    /// fit a known kind is kept as `Unrecognized`.
    pub fn from_parts(type_tag: Option<String>, data: Value) -> Self {
        let Some(kind) = type_tag.as_deref().and_then(NodeKind::from_tag) else {
            return NodeData::Unrecognized { type_tag, data };
        };

        let typed = match kind {
            NodeKind::Input => serde_json::from_value(data.clone()).map(NodeData::Input),
            NodeKind::Output => serde_json::from_value(data.clone()).map(NodeData::Output),
            NodeKind::Text => serde_json::from_value(data.clone()).map(NodeData::Text),
            NodeKind::Llm => serde_json::from_value(data.clone()).map(NodeData::Llm),
            NodeKind::Math => serde_json::from_value(data.clone()).map(NodeData::Math),
            NodeKind::Api => serde_json::from_value(data.clone()).map(NodeData::Api),
            NodeKind::Condition => serde_json::from_value(data.clone()).map(NodeData::Condition),
            NodeKind::Date => serde_json::from_value(data.clone()).map(NodeData::Date),
            NodeKind::Memory => serde_json::from_value(data.clone()).map(NodeData::Memory),
        };

        typed.unwrap_or(NodeData::Unrecognized { type_tag, data })
    }

    /// Split back into the wire `(type, data)` pair.
    pub fn to_parts(&self) -> (Option<String>, Value) {
        let typed = match self {
            NodeData::Input(d) => serde_json::to_value(d),
            NodeData::Output(d) => serde_json::to_value(d),
            NodeData::Text(d) => serde_json::to_value(d),
            NodeData::Llm(d) => serde_json::to_value(d),
            NodeData::Math(d) => serde_json::to_value(d),
            NodeData::Api(d) => serde_json::to_value(d),
            NodeData::Condition(d) => serde_json::to_value(d),
            NodeData::Date(d) => serde_json::to_value(d),
            NodeData::Memory(d) => serde_json::to_value(d),
            NodeData::Unrecognized { type_tag, data } => {
                return (type_tag.clone(), data.clone());
            }
        };
        let tag = self.kind().map(|k| k.tag().to_string());
        (tag, typed.unwrap_or_else(|_| Value::Object(Map::new())))
    }

    /// The kind this payload is typed as. `Unrecognized` payloads whose tag
    /// still names a known kind report that kind.
    pub fn kind(&self) -> Option<NodeKind> {
        match self {
            NodeData::Input(_) => Some(NodeKind::Input),
            NodeData::Output(_) => Some(NodeKind::Output),
            NodeData::Text(_) => Some(NodeKind::Text),
            NodeData::Llm(_) => Some(NodeKind::Llm),
            NodeData::Math(_) => Some(NodeKind::Math),
            NodeData::Api(_) => Some(NodeKind::Api),
            NodeData::Condition(_) => Some(NodeKind::Condition),
            NodeData::Date(_) => Some(NodeKind::Date),
            NodeData::Memory(_) => Some(NodeKind::Memory),
            NodeData::Unrecognized { type_tag, .. } => {
                type_tag.as_deref().and_then(NodeKind::from_tag)
            }
        }
    }

    /// Set one key of the payload and re-type the result.
    pub fn with_field(&self, field: &str, value: Value) -> Self {
        let (tag, data) = self.to_parts();
        let mut object = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        object.insert(field.to_string(), value);

        let mut updated = NodeData::from_parts(tag, Value::Object(object));
        if let NodeData::Text(text) = &mut updated {
            if field == "text" {
                text.refresh_variables();
            }
        }
        updated
    }
}

// =============================================================================
// NODE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub struct PipelineNode {
    pub id: String,
    pub position: Option<Position>,
    pub data: NodeData,
    pub extra: Map<String, Value>,
}

impl PipelineNode {
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        PipelineNode {
            id: id.into(),
            position: None,
            data,
            extra: Map::new(),
        }
    }

    pub fn of_kind(id: impl Into<String>, kind: NodeKind) -> Self {
        Self::new(id, NodeData::default_for(kind))
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.data.kind()
    }

    /// The `type` tag as it will be written on export.
    pub fn type_tag(&self) -> Option<&str> {
        match &self.data {
            NodeData::Unrecognized { type_tag, .. } => type_tag.as_deref(),
            typed => typed.kind().map(NodeKind::tag),
        }
    }
}

/// Wire form of a node: the flat record the canvas emits.
#[derive(Serialize, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(default = "empty_object")]
    data: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl From<RawNode> for PipelineNode {
    fn from(raw: RawNode) -> Self {
        PipelineNode {
            id: raw.id,
            position: raw.position,
            data: NodeData::from_parts(raw.node_type, raw.data),
            extra: raw.extra,
        }
    }
}

impl From<PipelineNode> for RawNode {
    fn from(node: PipelineNode) -> Self {
        let (node_type, data) = node.data.to_parts();
        RawNode {
            id: node.id,
            node_type,
            position: node.position,
            data,
            extra: node.extra,
        }
    }
}
