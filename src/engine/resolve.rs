//! Reference resolution
//!
//! A value may point at another token with `{group.token}`. When the whole
//! value is a single reference it adopts the referenced value as-is (objects
//! included); references embedded in a longer string are interpolated. After
//! substitution, string values of numeric kinds that form an arithmetic
//! expression are evaluated (see [`super::math`]). Composite fields take the
//! kind implied by their field name.

use super::error::{EngineError, Result};
use super::math;
use super::token::Token;
use super::transform::field_kind;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("valid reference regex"))
}

/// Return the referenced path if `value` is exactly one `{...}` reference
pub fn whole_reference(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    let inner = trimmed.strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains(['{', '}']) {
        return None;
    }
    Some(inner.trim())
}

/// Lookup from reference path to token index
///
/// Tokens are indexed by their full dotted path and, when unambiguous, by the
/// path without its first segment, so `{colors.red}` still finds
/// `global.colors.red` when token set names are kept in paths.
struct Index {
    paths: HashMap<String, usize>,
}

impl Index {
    fn build(tokens: &[Token]) -> Self {
        let mut paths = HashMap::new();
        for (idx, token) in tokens.iter().enumerate() {
            paths.insert(token.dotted_path(), idx);
        }

        let mut aliases: HashMap<String, Option<usize>> = HashMap::new();
        for (idx, token) in tokens.iter().enumerate() {
            if token.path.len() > 1 {
                let short = token.path[1..].join(".");
                aliases
                    .entry(short)
                    .and_modify(|slot| *slot = None)
                    .or_insert(Some(idx));
            }
        }
        for (short, idx) in aliases {
            if let Some(idx) = idx {
                paths.entry(short).or_insert(idx);
            }
        }

        Self { paths }
    }

    fn get(&self, reference: &str) -> Option<usize> {
        self.paths.get(reference).copied()
    }
}

struct Resolver<'a> {
    tokens: &'a [Token],
    index: Index,
    resolved: Vec<Option<Value>>,
    stack: Vec<usize>,
}

impl<'a> Resolver<'a> {
    fn resolve_token(&mut self, idx: usize) -> Result<Value> {
        if let Some(value) = &self.resolved[idx] {
            return Ok(value.clone());
        }

        if let Some(pos) = self.stack.iter().position(|&i| i == idx) {
            let mut chain: Vec<String> = self.stack[pos..]
                .iter()
                .map(|&i| self.tokens[i].dotted_path())
                .collect();
            chain.push(self.tokens[idx].dotted_path());
            return Err(EngineError::CircularReference {
                chain: chain.join(" -> "),
            });
        }

        self.stack.push(idx);
        let tokens = self.tokens;
        let token = &tokens[idx];
        let value = self.resolve_value(&token.original, idx, token.kind())?;
        self.stack.pop();

        self.resolved[idx] = Some(value.clone());
        Ok(value)
    }

    fn lookup(&mut self, reference: &str, owner: usize) -> Result<Value> {
        let target =
            self.index
                .get(reference)
                .ok_or_else(|| EngineError::UnresolvedReference {
                    token: self.tokens[owner].dotted_path(),
                    reference: reference.to_string(),
                })?;
        self.resolve_token(target)
    }

    fn resolve_value(&mut self, value: &Value, owner: usize, kind: Option<&str>) -> Result<Value> {
        match value {
            Value::String(s) => self.resolve_string(s, owner, kind),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(item, owner, kind))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut out = serde_json::Map::new();
                for (key, item) in map {
                    out.insert(key.clone(), self.resolve_value(item, owner, field_kind(key))?);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other.clone()),
        }
    }

    fn resolve_string(&mut self, s: &str, owner: usize, kind: Option<&str>) -> Result<Value> {
        if let Some(reference) = whole_reference(s) {
            return self.lookup(reference, owner);
        }

        let mut out = String::with_capacity(s.len());
        let mut last = 0;
        let mut substituted = false;
        for caps in reference_pattern().captures_iter(s) {
            let Some(whole) = caps.get(0) else { continue };
            let reference = caps[1].trim().to_string();
            let value = self.lookup(&reference, owner)?;
            out.push_str(&s[last..whole.start()]);
            out.push_str(&value_to_string(&value));
            last = whole.end();
            substituted = true;
        }
        out.push_str(&s[last..]);

        let simplified = kind
            .filter(|k| math::is_numeric_kind(k))
            .and_then(|_| math::simplify(&out));
        match simplified {
            Some(simplified) => {
                debug!("Evaluated '{}' to '{}'", out, simplified);
                Ok(Value::String(simplified))
            }
            None if substituted => Ok(Value::String(out)),
            None => Ok(Value::String(s.to_string())),
        }
    }
}

/// Render a resolved value for interpolation into a string
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Resolve every token's references in place
pub fn resolve_all(tokens: &mut [Token]) -> Result<()> {
    let values = {
        let shared: &[Token] = tokens;
        let mut resolver = Resolver {
            tokens: shared,
            index: Index::build(shared),
            resolved: vec![None; shared.len()],
            stack: Vec::new(),
        };
        (0..shared.len())
            .map(|idx| resolver.resolve_token(idx))
            .collect::<Result<Vec<_>>>()?
    };

    for (token, value) in tokens.iter_mut().zip(values) {
        token.value = value;
    }
    Ok(())
}
