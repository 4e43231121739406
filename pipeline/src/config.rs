//! Runtime options for the store and the analyzer.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

const DEFAULT_EXPORT_INDENT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Raise id counters past imported ids on `load_snapshot`.
    pub reconcile_counters_on_load: bool,
    /// Spaces per level in exported JSON.
    pub export_indent: usize,
    /// Attach structural diagnostics to analysis reports.
    pub include_diagnostics: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reconcile_counters_on_load: false,
            export_indent: DEFAULT_EXPORT_INDENT,
            include_diagnostics: true,
        }
    }
}

impl PipelineConfig {
    /// Missing keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(json).map_err(PipelineError::InvalidConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.export_indent, 2);
    }

    #[test]
    fn partial_override() {
        let config = PipelineConfig::from_json(r#"{"reconcileCountersOnLoad": true}"#).unwrap();
        assert!(config.reconcile_counters_on_load);
        assert!(config.include_diagnostics);
    }

    #[test]
    fn rejects_wrong_types() {
        let result = PipelineConfig::from_json(r#"{"exportIndent": "four"}"#);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }
}
