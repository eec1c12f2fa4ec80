// Token transformation engine
//
// Loads token files, resolves references, transforms values per platform and
// writes one source file per configured output. The build pipeline talks to it
// through three calls only: register_filter, clean_all_platforms and
// build_all_platforms.

pub mod error;
pub mod format;
pub mod math;
pub mod resolve;
pub mod source;
pub mod token;
pub mod transform;

pub use error::{EngineError, Result};
pub use format::{Format, FormatOptions};
pub use token::Token;
pub use transform::{Transform, TransformContext, TransformGroup};

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Predicate deciding whether a token goes into a file
#[derive(Clone)]
pub struct Filter(Arc<dyn Fn(&Token) -> bool + Send + Sync>);

impl Filter {
    pub fn new(predicate: impl Fn(&Token) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    pub fn matches(&self, token: &Token) -> bool {
        (self.0)(token)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// One output file of a platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileTarget {
    /// File name relative to the platform build path
    pub destination: String,
    pub format: Format,
    /// Name of a registered filter; `None` emits every token
    pub filter: Option<String>,
    pub options: FormatOptions,
}

/// One platform configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformConfig {
    pub transform_group: TransformGroup,
    pub transforms: Vec<Transform>,
    pub build_path: PathBuf,
    pub files: Vec<FileTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Glob patterns selecting token files, relative to `base_dir`
    pub source: Vec<String>,
    /// Directory sources and build paths are resolved against
    pub base_dir: PathBuf,
    /// Drop the token set name from token paths
    pub exclude_parent_keys: bool,
    pub platforms: BTreeMap<String, PlatformConfig>,
}

/// Files removed by a clean
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub format: Format,
    pub token_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformReport {
    pub platform: String,
    pub files: Vec<WrittenFile>,
}

/// Files written by a build, grouped by platform key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub token_count: usize,
    pub platforms: Vec<PlatformReport>,
}

impl BuildReport {
    pub fn file_count(&self) -> usize {
        self.platforms.iter().map(|p| p.files.len()).sum()
    }
}

pub struct Engine {
    config: EngineConfig,
    filters: BTreeMap<String, Filter>,
    tokens: Option<Vec<Token>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            filters: BTreeMap::new(),
            tokens: None,
        }
    }

    /// Register a named filter
    ///
    /// # Errors
    /// Fails if a filter with the same name is already registered.
    pub fn register_filter(&mut self, name: impl Into<String>, filter: Filter) -> Result<()> {
        let name = name.into();
        if self.filters.contains_key(&name) {
            return Err(EngineError::FilterAlreadyRegistered(name));
        }
        debug!("Registered filter {}", name);
        self.filters.insert(name, filter);
        Ok(())
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.base_dir.join(path)
        }
    }

    /// Remove every configured output file and empty build directories
    ///
    /// Files that do not exist are skipped, so cleaning twice is harmless.
    pub fn clean_all_platforms(&mut self) -> Result<CleanReport> {
        let mut report = CleanReport::default();

        for (key, platform) in &self.config.platforms {
            for file in &platform.files {
                let relative = platform.build_path.join(&file.destination);
                let path = self.resolve_path(&relative);
                if !path.exists() {
                    continue;
                }
                fs::remove_file(&path).map_err(|source| EngineError::Remove {
                    path: path.clone(),
                    source,
                })?;
                debug!("{}: removed {}", key, relative.display());
                report.removed_files.push(relative);
            }

            let dir = self.resolve_path(&platform.build_path);
            if is_empty_dir(&dir) {
                fs::remove_dir(&dir).map_err(|source| EngineError::Remove {
                    path: dir.clone(),
                    source,
                })?;
                report.removed_dirs.push(platform.build_path.clone());
            }
        }

        info!(
            "Cleaned {} files and {} directories",
            report.removed_files.len(),
            report.removed_dirs.len()
        );
        Ok(report)
    }

    fn load_tokens(&mut self) -> Result<&[Token]> {
        if self.tokens.is_none() {
            let tokens = source::load(
                &self.config.base_dir,
                &self.config.source,
                self.config.exclude_parent_keys,
            )?;
            self.tokens = Some(tokens);
        }
        Ok(self.tokens.as_deref().unwrap_or_default())
    }

    /// Generate every configured output file
    ///
    /// Filter names are checked before anything is written.
    pub fn build_all_platforms(&mut self) -> Result<BuildReport> {
        for (key, platform) in &self.config.platforms {
            for file in &platform.files {
                if let Some(filter) = &file.filter {
                    if !self.filters.contains_key(filter) {
                        return Err(EngineError::UnknownFilter {
                            platform: key.clone(),
                            filter: filter.clone(),
                        });
                    }
                }
            }
        }

        self.load_tokens()?;
        let tokens = self.tokens.as_deref().unwrap_or_default();

        // Render everything first so a bad file leaves the tree untouched
        let mut pending = Vec::new();
        for (key, platform) in &self.config.platforms {
            let ctx = TransformContext::new(platform.transform_group, &platform.transforms);
            for file in &platform.files {
                let filter = file.filter.as_ref().and_then(|name| self.filters.get(name));
                let rendered: Vec<_> = tokens
                    .iter()
                    .filter(|token| filter.map(|f| f.matches(token)).unwrap_or(true))
                    .map(|token| ctx.render(token))
                    .collect();

                let relative = platform.build_path.join(&file.destination);
                if let Some((name, first, second)) = find_name_collision(&rendered) {
                    return Err(EngineError::NameCollision {
                        file: relative,
                        name,
                        first,
                        second,
                    });
                }

                let file_name = Path::new(&file.destination)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.destination.clone());
                let contents = file.format.render(&rendered, &file.options, &file_name);
                pending.push((key, relative, file.format, rendered.len(), contents));
            }
        }

        let mut report = BuildReport {
            token_count: tokens.len(),
            platforms: Vec::new(),
        };

        for (key, relative, format, token_count, contents) in pending {
            let path = self.resolve_path(&relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| EngineError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&path, contents).map_err(|source| EngineError::Write {
                path: path.clone(),
                source,
            })?;
            debug!(
                "{}: wrote {} tokens to {}",
                key,
                token_count,
                relative.display()
            );

            let written = WrittenFile {
                path: relative,
                format,
                token_count,
            };
            match report.platforms.last_mut() {
                Some(last) if &last.platform == key => last.files.push(written),
                _ => report.platforms.push(PlatformReport {
                    platform: key.clone(),
                    files: vec![written],
                }),
            }
        }

        info!(
            "Built {} files from {} tokens",
            report.file_count(),
            report.token_count
        );
        Ok(report)
    }
}

/// First generated member name claimed by two tokens: (name, first path, second path)
fn find_name_collision(rendered: &[transform::Rendered]) -> Option<(String, String, String)> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for token in rendered {
        for entry in &token.entries {
            if let Some(first) = seen.insert(entry.name.as_str(), token.path.as_str()) {
                return Some((entry.name.clone(), first.to_string(), token.path.clone()));
            }
        }
    }
    None
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
