//! Category-to-output mapping
//!
//! Turns a [`CategoryTable`] into one output target per category and platform,
//! assembles the engine's platform map, and registers the per-category kind
//! filters under `filterByType_<key>`.

use crate::category::{CategoryTable, KindFilter};
use crate::engine::{
    Engine, EngineError, FileTarget, FormatOptions, PlatformConfig, Transform,
};
use crate::error::ConfigError;
use crate::platform::Platform;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Settings shared by every output target
#[derive(Debug, Clone, PartialEq)]
pub struct MapperOptions {
    /// Root of all platform build directories
    pub build_root: PathBuf,
    /// Kotlin package of generated Compose objects
    pub package_name: String,
    pub output_references: bool,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            build_root: PathBuf::from("build"),
            package_name: "com.test".to_string(),
            output_references: true,
        }
    }
}

/// Everything the engine needs to produce one output file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTarget {
    /// Platform configuration key (`compose_color`)
    pub key: String,
    pub platform: Platform,
    /// Category key, `None` for the single combined file
    pub category: Option<String>,
    /// Registered filter name, `None` emits every token
    pub filter: Option<String>,
    pub build_path: PathBuf,
    pub destination: String,
    pub transforms: Vec<Transform>,
    pub options: FormatOptions,
}

impl OutputTarget {
    /// Path of the generated file, relative to the working directory
    pub fn output_path(&self) -> PathBuf {
        self.build_path.join(&self.destination)
    }

    fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            transform_group: self.platform.transform_group(),
            transforms: self.transforms.clone(),
            build_path: self.build_path.clone(),
            files: vec![FileTarget {
                destination: self.destination.clone(),
                format: self.platform.format(),
                filter: self.filter.clone(),
                options: self.options.clone(),
            }],
        }
    }
}

/// Builder for the engine's platform map that refuses to overwrite entries
#[derive(Debug, Default)]
pub struct PlatformsBuilder {
    platforms: BTreeMap<String, PlatformConfig>,
}

impl PlatformsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a platform configuration
    ///
    /// # Errors
    /// Fails if `key` was already added.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        config: PlatformConfig,
    ) -> Result<&mut Self, ConfigError> {
        let key = key.into();
        if self.platforms.contains_key(&key) {
            return Err(ConfigError::DuplicatePlatform(key));
        }
        self.platforms.insert(key, config);
        Ok(self)
    }

    pub fn build(self) -> BTreeMap<String, PlatformConfig> {
        self.platforms
    }
}

/// Output targets plus the filters they reference
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPlan {
    pub targets: Vec<OutputTarget>,
    pub filters: Vec<(String, KindFilter)>,
}

impl OutputPlan {
    /// Engine platform map, one entry per target
    pub fn platforms(&self) -> Result<BTreeMap<String, PlatformConfig>, ConfigError> {
        let mut builder = PlatformsBuilder::new();
        for target in &self.targets {
            builder.insert(target.key.clone(), target.platform_config())?;
        }
        Ok(builder.build())
    }

    /// Register every category filter with the engine
    ///
    /// # Errors
    /// Propagates the engine's error when a filter name is already taken.
    pub fn register_filters(&self, engine: &mut Engine) -> Result<(), EngineError> {
        for (name, filter) in &self.filters {
            engine.register_filter(name.clone(), filter.to_engine_filter())?;
        }
        Ok(())
    }

    pub fn targets_for<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a OutputTarget> + 'a {
        self.targets
            .iter()
            .filter(move |t| t.category.as_deref() == Some(category))
    }
}

fn base_transforms() -> Vec<Transform> {
    vec![Transform::NameCamel]
}

/// One target per category per platform
///
/// Files land in `<build_root>/<platform>/<key>/<Name>.<ext>`; category keys
/// and names are unique, so no two targets share a path.
pub fn map_categories(
    table: &CategoryTable,
    options: &MapperOptions,
) -> Result<OutputPlan, ConfigError> {
    let mut targets = Vec::with_capacity(table.len() * Platform::ALL.len());
    let mut filters = Vec::with_capacity(table.len());

    for rule in table.rules() {
        let filter_name = rule.filter_name();
        filters.push((filter_name.clone(), rule.kind_filter()));

        for platform in Platform::ALL {
            let mut transforms = base_transforms();
            transforms.extend_from_slice(rule.transforms_for(platform));

            let target = OutputTarget {
                key: format!("{}_{}", platform.key(), rule.key),
                platform,
                category: Some(rule.key.clone()),
                filter: Some(filter_name.clone()),
                build_path: options.build_root.join(platform.key()).join(&rule.key),
                destination: format!("{}.{}", rule.name, platform.extension()),
                transforms,
                options: FormatOptions {
                    class_name: rule.name.clone(),
                    package_name: platform
                        .uses_package()
                        .then(|| options.package_name.clone()),
                    output_references: options.output_references,
                },
            };
            debug!(
                "Mapped {} -> {}",
                target.key,
                target.output_path().display()
            );
            targets.push(target);
        }
    }

    let plan = OutputPlan { targets, filters };
    // Surface duplicate platform keys here rather than at engine setup
    plan.platforms()?;
    Ok(plan)
}

/// The combined-file layout: one Compose object with every token, no filter
pub fn map_single(options: &MapperOptions, class_name: &str) -> OutputPlan {
    let platform = Platform::Compose;
    OutputPlan {
        targets: vec![OutputTarget {
            key: platform.key().to_string(),
            platform,
            category: None,
            filter: None,
            build_path: options.build_root.join(platform.key()),
            destination: format!("{}.{}", class_name, platform.extension()),
            transforms: base_transforms(),
            options: FormatOptions {
                class_name: class_name.to_string(),
                package_name: Some(options.package_name.clone()),
                output_references: options.output_references,
            },
        }],
        filters: Vec::new(),
    }
}
