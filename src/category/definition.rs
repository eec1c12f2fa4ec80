use crate::engine::{Filter, Token, Transform};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Predicate over a token's declared kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindFilter {
    kinds: BTreeSet<String>,
}

impl KindFilter {
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
        }
    }

    /// Tokens without a declared kind never match
    pub fn matches(&self, kind: Option<&str>) -> bool {
        kind.map(|k| self.kinds.contains(k)).unwrap_or(false)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(String::as_str)
    }

    /// Engine filter applying this predicate to a token's kind
    pub fn to_engine_filter(&self) -> Filter {
        let filter = self.clone();
        Filter::new(move |token: &Token| filter.matches(token.kind()))
    }
}

/// One row of the category table
///
/// # Example TOML
/// ```toml
/// [[category]]
/// key = "typography"
/// name = "Typography"
/// kinds = ["typography", "textCase", "textDecoration"]
/// compose_transforms = ["typography/compose/shorthand"]
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryRule {
    /// Short key, used in platform keys, directories and filter names
    pub key: String,

    /// Display name, used for the output file and type name
    pub name: String,

    /// Declared token kinds routed to this category
    pub kinds: Vec<String>,

    /// Extra transforms for the Compose platform only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compose_transforms: Vec<Transform>,

    /// Extra transforms for the iOS platform only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ios_transforms: Vec<Transform>,
}

impl CategoryRule {
    pub fn new(key: &str, name: &str, kinds: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            kinds: kinds.iter().map(|k| k.to_string()).collect(),
            compose_transforms: Vec::new(),
            ios_transforms: Vec::new(),
        }
    }

    pub fn accepts(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    pub fn kind_filter(&self) -> KindFilter {
        KindFilter::new(self.kinds.iter().cloned())
    }

    /// Name the filter is registered under
    pub fn filter_name(&self) -> String {
        format!("filterByType_{}", self.key)
    }

    pub fn transforms_for(&self, platform: Platform) -> &[Transform] {
        match platform {
            Platform::Compose => &self.compose_transforms,
            Platform::Ios => &self.ios_transforms,
        }
    }
}
