//! Error and diagnostic types shared by the store and the analyzer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures surfaced to the collaborator. Analysis itself never fails; only
/// import, export and configuration loading do.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid pipeline file: {0}")]
    InvalidPipelineFile(#[source] serde_json::Error),

    #[error("Failed to serialize pipeline: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid pipeline config: {0}")]
    InvalidConfig(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Import,
    Structure,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Import => write!(f, "Import"),
            Phase::Structure => write!(f, "Structure"),
        }
    }
}

/// A non-fatal finding attached to an analysis report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub node_id: Option<String>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(
                f,
                "[{}:{}] {} (node '{}')",
                self.phase, self.code, self.message, id
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl Diagnostic {
    pub fn import(code: &str, message: impl Into<String>) -> Self {
        Diagnostic {
            code: code.into(),
            phase: Phase::Import,
            message: message.into(),
            node_id: None,
        }
    }

    pub fn structure(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Diagnostic {
            code: code.into(),
            phase: Phase::Structure,
            message: message.into(),
            node_id,
        }
    }
}
