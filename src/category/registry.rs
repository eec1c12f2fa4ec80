use crate::category::{CategoryRule, Profile};
use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

const CATEGORIZED_TOML: &str = include_str!("../../presets/categorized.toml");
const EXTENDED_TOML: &str = include_str!("../../presets/extended.toml");

#[derive(Deserialize)]
struct CategoryFile {
    #[serde(default)]
    category: Vec<CategoryRule>,
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Lookup from category key to its accepted kinds and platform overrides
///
/// Construction enforces unique keys, unique display names, and that every
/// token kind belongs to at most one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    /// Rules in table order
    rules: Vec<CategoryRule>,

    /// Reverse index: token kind → category key
    kind_to_category: HashMap<String, String>,
}

impl CategoryTable {
    /// Build a table from rules, rejecting malformed ones
    ///
    /// # Errors
    /// Returns the first violated constraint: duplicate key or display name,
    /// a key or name that is not a plain identifier, a category with no kinds,
    /// or a kind claimed by two categories.
    pub fn from_rules(rules: Vec<CategoryRule>) -> std::result::Result<Self, ConfigError> {
        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        let mut kind_to_category = HashMap::new();

        for rule in &rules {
            if !is_identifier(&rule.key) {
                return Err(ConfigError::InvalidIdentifier {
                    field: "key",
                    value: rule.key.clone(),
                });
            }
            if !is_identifier(&rule.name) {
                return Err(ConfigError::InvalidIdentifier {
                    field: "name",
                    value: rule.name.clone(),
                });
            }
            if !keys.insert(rule.key.as_str()) {
                return Err(ConfigError::DuplicateCategoryKey(rule.key.clone()));
            }
            if !names.insert(rule.name.as_str()) {
                return Err(ConfigError::DuplicateCategoryName(rule.name.clone()));
            }
            if rule.kinds.is_empty() {
                return Err(ConfigError::EmptyCategory(rule.key.clone()));
            }

            for kind in &rule.kinds {
                if let Some(existing) = kind_to_category.insert(kind.clone(), rule.key.clone()) {
                    if existing != rule.key {
                        return Err(ConfigError::OverlappingKind {
                            kind: kind.clone(),
                            first: existing,
                            second: rule.key.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            rules,
            kind_to_category,
        })
    }

    /// Table shipped for a configuration profile
    ///
    /// The `single` profile has no categories: everything goes to one file.
    pub fn preset(profile: Profile) -> Result<Self> {
        let toml = match profile {
            Profile::Single => return Ok(Self::empty()),
            Profile::Categorized => CATEGORIZED_TOML,
            Profile::Extended => EXTENDED_TOML,
        };
        Self::from_toml_str(toml)
            .with_context(|| format!("Failed to load embedded '{}' category preset", profile))
    }

    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            kind_to_category: HashMap::new(),
        }
    }

    /// Load a table from a TOML file of `[[category]]` entries
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read category file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CategoryFile =
            toml::from_str(content).context("Failed to parse TOML category definitions")?;
        Ok(Self::from_rules(file.category)?)
    }

    /// Copy of this table without the named categories
    ///
    /// # Errors
    /// Fails if a key is not in the table.
    pub fn without<S: AsRef<str>>(&self, keys: &[S]) -> std::result::Result<Self, ConfigError> {
        for key in keys {
            if self.get(key.as_ref()).is_none() {
                return Err(ConfigError::UnknownCategory(key.as_ref().to_string()));
            }
        }
        let rules = self
            .rules
            .iter()
            .filter(|rule| !keys.iter().any(|k| k.as_ref() == rule.key))
            .cloned()
            .collect();
        Self::from_rules(rules)
    }

    pub fn get(&self, key: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|rule| rule.key == key)
    }

    /// Category a token kind is routed to
    pub fn category_for_kind(&self, kind: &str) -> Option<&CategoryRule> {
        let key = self.kind_to_category.get(kind)?;
        self.get(key)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
