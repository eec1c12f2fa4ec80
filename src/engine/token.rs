//! Token model and JSON tree flattening
//!
//! Token files use the Tokens Studio shape: nested groups whose leaves carry a
//! `value` (or `$value`) plus a `type` (or `$type`). Groups may declare a
//! `$type` that their descendants inherit.

use super::error::{EngineError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::trace;

/// A single design token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Group names followed by the token name
    pub path: Vec<String>,

    /// Declared kind (`color`, `spacing`, `typography`, ...)
    pub kind: Option<String>,

    /// Value as authored, references included
    pub original: Value,

    /// Value after reference resolution and math
    pub value: Value,

    pub description: Option<String>,

    /// File the token was read from
    pub file: PathBuf,
}

impl Token {
    /// Dotted path, the form used inside `{...}` references
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Whether this token was authored as a single `{...}` reference
    pub fn is_alias(&self) -> bool {
        self.original
            .as_str()
            .map(|s| super::resolve::whole_reference(s).is_some())
            .unwrap_or(false)
    }
}

fn field<'a>(node: &'a serde_json::Map<String, Value>, name: &str) -> Option<&'a Value> {
    node.get(name).or_else(|| node.get(&format!("${}", name)))
}

/// Flatten a parsed token file into tokens, in source order
///
/// Top-level keys starting with `$` (`$themes`, `$metadata`) are skipped. With
/// `exclude_parent_keys` the first path segment (the token set name) is
/// dropped from every token path.
pub fn flatten(tree: &Value, file: &Path, exclude_parent_keys: bool) -> Result<Vec<Token>> {
    let root = tree.as_object().ok_or_else(|| EngineError::NotAnObject {
        path: file.to_path_buf(),
    })?;

    let mut tokens = Vec::new();
    for (key, node) in root {
        if key.starts_with('$') {
            trace!("Skipping metadata key {} in {}", key, file.display());
            continue;
        }

        let is_set = node
            .as_object()
            .map(|o| field(o, "value").is_none())
            .unwrap_or(false);
        let path = if exclude_parent_keys && is_set {
            Vec::new()
        } else {
            vec![key.clone()]
        };
        walk(node, path, None, file, &mut tokens);
    }

    Ok(tokens)
}

fn walk(
    node: &Value,
    path: Vec<String>,
    inherited_kind: Option<&str>,
    file: &Path,
    out: &mut Vec<Token>,
) {
    let Some(object) = node.as_object() else {
        trace!(
            "Ignoring non-object node at {} in {}",
            path.join("."),
            file.display()
        );
        return;
    };

    if let Some(value) = field(object, "value") {
        let kind = field(object, "type")
            .and_then(Value::as_str)
            .or(inherited_kind)
            .map(str::to_string);
        let description = field(object, "description")
            .and_then(Value::as_str)
            .map(str::to_string);

        out.push(Token {
            path,
            kind,
            original: value.clone(),
            value: value.clone(),
            description,
            file: file.to_path_buf(),
        });
        return;
    }

    let group_kind = object
        .get("$type")
        .and_then(Value::as_str)
        .or(inherited_kind);

    for (key, child) in object {
        if key.starts_with('$') {
            continue;
        }
        let mut child_path = path.clone();
        child_path.push(key.clone());
        walk(child, child_path, group_kind, file, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(tree: Value) -> Vec<Token> {
        flatten(&tree, Path::new("tokens.json"), false).unwrap()
    }

    #[test]
    fn test_flatten_nested_groups() {
        let tokens = flat(json!({
            "colors": {
                "primary": { "value": "#336699", "type": "color" },
                "neutral": {
                    "100": { "value": "#f5f5f5", "type": "color" }
                }
            }
        }));

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].dotted_path(), "colors.primary");
        assert_eq!(tokens[0].kind(), Some("color"));
        assert_eq!(tokens[1].path, vec!["colors", "neutral", "100"]);
    }

    #[test]
    fn test_flatten_dollar_keys_and_inherited_type() {
        let tokens = flat(json!({
            "space": {
                "$type": "spacing",
                "sm": { "$value": "4px" },
                "lg": { "$value": "16px", "$description": "Large gap" }
            }
        }));

        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.kind() == Some("spacing")));
        assert_eq!(tokens[1].description.as_deref(), Some("Large gap"));
    }

    #[test]
    fn test_flatten_skips_metadata() {
        let tokens = flat(json!({
            "$themes": [],
            "$metadata": { "tokenSetOrder": ["global"] },
            "global": { "red": { "value": "#ff0000", "type": "color" } }
        }));

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].dotted_path(), "global.red");
    }

    #[test]
    fn test_flatten_exclude_parent_keys() {
        let tree = json!({
            "global": { "red": { "value": "#ff0000", "type": "color" } }
        });
        let tokens = flatten(&tree, Path::new("t.json"), true).unwrap();
        assert_eq!(tokens[0].dotted_path(), "red");
    }

    #[test]
    fn test_flatten_composite_value_is_one_token() {
        let tokens = flat(json!({
            "heading": {
                "value": { "fontFamily": "Inter", "fontSize": "24px" },
                "type": "typography"
            }
        }));

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].value.is_object());
    }

    #[test]
    fn test_flatten_preserves_source_order() {
        let tokens = flat(json!({
            "z": { "value": "1", "type": "number" },
            "a": { "value": "2", "type": "number" },
            "m": { "value": "3", "type": "number" }
        }));
        let names: Vec<_> = tokens.iter().map(|t| t.dotted_path()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_flatten_rejects_non_object_root() {
        let result = flatten(&json!([1, 2]), Path::new("bad.json"), false);
        assert!(matches!(result, Err(EngineError::NotAnObject { .. })));
    }

    #[test]
    fn test_is_alias() {
        let tokens = flat(json!({
            "a": { "value": "{b}", "type": "color" },
            "b": { "value": "#fff", "type": "color" },
            "c": { "value": "{b} * 2", "type": "number" }
        }));
        assert!(tokens[0].is_alias());
        assert!(!tokens[1].is_alias());
        assert!(!tokens[2].is_alias());
    }
}
