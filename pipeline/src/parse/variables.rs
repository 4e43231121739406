//! `{{name}}` placeholders in text node templates.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").unwrap());

/// Unique, trimmed placeholder names in first-seen order. Blank
/// placeholders (`{{  }}`) are ignored.
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in VARIABLE_RE.captures_iter(text) {
        let name = caps[1].trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitute known placeholders; unknown ones are left as written.
pub fn replace_variables(text: &str, values: &HashMap<String, String>) -> String {
    VARIABLE_RE
        .replace_all(text, |caps: &Captures| match values.get(caps[1].trim()) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
