//! Parse phase: pipeline JSON ↔ Rust types, plus adjacency construction.

pub mod graph;
pub mod types;
pub mod variables;

pub use graph::PipelineGraph;
pub use types::*;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::PipelineError;

/// Deserialize a pipeline file. Both `nodes` and `edges` must be present.
pub fn parse(json: &str) -> Result<Pipeline, PipelineError> {
    serde_json::from_str::<Pipeline>(json).map_err(PipelineError::InvalidPipelineFile)
}

/// Pretty-print a pipeline with `indent` spaces per level.
pub fn to_json(pipeline: &Pipeline, indent: usize) -> Result<String, PipelineError> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    pipeline.serialize(&mut ser).map_err(PipelineError::Serialize)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
