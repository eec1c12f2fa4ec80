//! tokenforge.toml configuration
//!
//! # Example tokenforge.toml
//!
//! ```toml
//! source = ["tokens/**/*.json"]
//! build_root = "build"
//! profile = "extended"
//! omit = ["spaces"]
//! output_references = true
//!
//! [compose]
//! package_name = "com.example.tokens"
//! ```
//!
//! Every field is optional. `[[category]]` entries, when present, replace the
//! profile's category table.

use crate::category::{CategoryRule, CategoryTable, Profile};
use crate::cli::Cli;
use crate::engine::EngineConfig;
use crate::mapper::{self, MapperOptions, OutputPlan};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "tokenforge.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeSection {
    pub package_name: String,
}

impl Default for ComposeSection {
    fn default() -> Self {
        Self {
            package_name: "com.test".to_string(),
        }
    }
}

/// Settings of the `single` profile
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SingleSection {
    pub class_name: String,
}

impl Default for SingleSection {
    fn default() -> Self {
        Self {
            class_name: "DesignTokens".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Glob patterns selecting token files
    pub source: Vec<String>,
    pub build_root: PathBuf,
    pub profile: Profile,
    /// Category keys dropped from the table
    pub omit: Vec<String>,
    pub exclude_parent_keys: bool,
    pub output_references: bool,
    pub compose: ComposeSection,
    pub single: SingleSection,
    /// Custom category table replacing the profile's
    pub category: Vec<CategoryRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: vec!["tokens/**/*.json".to_string()],
            build_root: PathBuf::from("build"),
            profile: Profile::default(),
            omit: Vec::new(),
            exclude_parent_keys: false,
            output_references: true,
            compose: ComposeSection::default(),
            single: SingleSection::default(),
            category: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Load the config for a run
    ///
    /// An explicit path must exist. Without one, `tokenforge.toml` in
    /// `base_dir` is used when present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>, base_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = base_dir.join(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    debug!("Using {}", default.display());
                    Self::from_file(default)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply command-line overrides on top of the file settings
    pub fn apply_cli(&mut self, cli: &Cli) {
        if !cli.source.is_empty() {
            self.source = cli.source.clone();
        }
        if let Some(build_root) = &cli.build_root {
            self.build_root = build_root.clone();
        }
        if let Some(profile) = cli.profile {
            self.profile = profile;
        }
        if !cli.omit.is_empty() {
            self.omit.extend(cli.omit.iter().cloned());
        }
        if let Some(package_name) = &cli.package_name {
            self.compose.package_name = package_name.clone();
        }
    }

    /// Category table after custom entries and omissions
    pub fn category_table(&self) -> Result<CategoryTable> {
        let table = if self.category.is_empty() {
            CategoryTable::preset(self.profile)?
        } else {
            CategoryTable::from_rules(self.category.clone())
                .context("Invalid [[category]] table")?
        };
        Ok(table.without(self.omit.as_slice())?)
    }

    fn mapper_options(&self) -> MapperOptions {
        MapperOptions {
            build_root: self.build_root.clone(),
            package_name: self.compose.package_name.clone(),
            output_references: self.output_references,
        }
    }

    /// Output targets for this configuration
    pub fn plan(&self) -> Result<OutputPlan> {
        if self.profile == Profile::Single && self.category.is_empty() {
            if !self.omit.is_empty() {
                bail!("The single profile has no categories to omit");
            }
            return Ok(mapper::map_single(
                &self.mapper_options(),
                &self.single.class_name,
            ));
        }

        let table = self.category_table()?;
        Ok(mapper::map_categories(&table, &self.mapper_options())?)
    }

    pub fn engine_config(&self, plan: &OutputPlan, base_dir: &Path) -> Result<EngineConfig> {
        Ok(EngineConfig {
            source: self.source.clone(),
            base_dir: base_dir.to_path_buf(),
            exclude_parent_keys: self.exclude_parent_keys,
            platforms: plan.platforms()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source, vec!["tokens/**/*.json"]);
        assert_eq!(config.profile, Profile::Categorized);
        assert_eq!(config.compose.package_name, "com.test");
        assert!(config.output_references);
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(
            r#"
            source = ["design/**/*.json"]
            build_root = "generated"
            profile = "extended"
            omit = ["spaces"]
            exclude_parent_keys = true

            [compose]
            package_name = "com.example.tokens"
            "#,
        )
        .unwrap();

        assert_eq!(config.source, vec!["design/**/*.json"]);
        assert_eq!(config.build_root, PathBuf::from("generated"));
        assert_eq!(config.profile, Profile::Extended);
        assert_eq!(config.omit, vec!["spaces"]);
        assert!(config.exclude_parent_keys);
        assert_eq!(config.compose.package_name, "com.example.tokens");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Config::from_toml_str("sorce = []").is_err());
    }

    #[test]
    fn test_unknown_profile_rejected() {
        assert!(Config::from_toml_str("profile = \"everything\"").is_err());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::load(None, dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_load_default_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "profile = \"single\"").unwrap();
        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.profile, Profile::Single);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(missing.as_path()), dir.path()).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "tokenforge",
            "--source",
            "a/*.json",
            "--build-root",
            "out",
            "--profile",
            "extended",
            "--omit",
            "spaces",
            "--package-name",
            "org.tokens",
        ]);
        let mut config = Config::default();
        config.apply_cli(&cli);

        assert_eq!(config.source, vec!["a/*.json"]);
        assert_eq!(config.build_root, PathBuf::from("out"));
        assert_eq!(config.profile, Profile::Extended);
        assert_eq!(config.omit, vec!["spaces"]);
        assert_eq!(config.compose.package_name, "org.tokens");
    }

    #[test]
    fn test_plan_single_profile() {
        let config = Config {
            profile: Profile::Single,
            ..Config::default()
        };
        let plan = config.plan().unwrap();
        assert_eq!(plan.targets.len(), 1);
        assert_eq!(plan.targets[0].destination, "DesignTokens.kt");
    }

    #[test]
    fn test_plan_single_rejects_omit() {
        let config = Config {
            profile: Profile::Single,
            omit: vec!["color".to_string()],
            ..Config::default()
        };
        assert!(config.plan().is_err());
    }

    #[test]
    fn test_plan_with_omit() {
        let config = Config {
            omit: vec!["spaces".to_string()],
            ..Config::default()
        };
        let plan = config.plan().unwrap();
        assert!(plan.targets.iter().all(|t| t.category.as_deref() != Some("spaces")));
    }

    #[test]
    fn test_plan_with_unknown_omit() {
        let config = Config {
            omit: vec!["gradients".to_string()],
            ..Config::default()
        };
        assert!(config.plan().is_err());
    }

    #[test]
    fn test_custom_category_table() {
        let config = Config::from_toml_str(
            r#"
            [[category]]
            key = "brand"
            name = "Brand"
            kinds = ["color"]

            [[category]]
            key = "layout"
            name = "Layout"
            kinds = ["spacing", "sizing"]
            "#,
        )
        .unwrap();
        let plan = config.plan().unwrap();
        let keys: Vec<_> = plan.targets.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["compose_brand", "ios_brand", "compose_layout", "ios_layout"]
        );
    }

    #[test]
    fn test_engine_config() {
        let config = Config::default();
        let plan = config.plan().unwrap();
        let engine = config.engine_config(&plan, Path::new("/work")).unwrap();
        assert_eq!(engine.base_dir, PathBuf::from("/work"));
        assert_eq!(engine.platforms.len(), plan.targets.len());
    }
}
