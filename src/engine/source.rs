//! Token source discovery and loading

use super::error::{EngineError, Result};
use super::resolve;
use super::token::{self, Token};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

fn is_glob_meta(c: char) -> bool {
    matches!(c, '*' | '?' | '[' | ']' | '{' | '}')
}

/// Leading directory of a pattern that contains no glob metacharacters
///
/// `tokens/**/*.json` walks from `tokens`, `*.json` from the base directory.
fn literal_root(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();
    let components: Vec<&str> = pattern.split('/').collect();
    for component in &components[..components.len().saturating_sub(1)] {
        if component.chars().any(is_glob_meta) {
            break;
        }
        root.push(component);
    }
    root
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| EngineError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| EngineError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}

/// Find all files under `base_dir` matching any of `patterns`
///
/// Patterns are matched against paths relative to `base_dir`. The result is
/// sorted and free of duplicates.
pub fn discover(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let globs = build_globset(patterns)?;
    let mut found = Vec::new();

    for pattern in patterns {
        let root = base_dir.join(literal_root(pattern));
        if !root.is_dir() {
            debug!("Source root {} does not exist", root.display());
            continue;
        }

        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(|source| EngineError::Walk {
                path: root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(base_dir)
                .unwrap_or_else(|_| entry.path());
            if globs.is_match(relative) {
                found.push(entry.path().to_path_buf());
            }
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}

/// Load, merge and resolve every token matched by `patterns`
///
/// Files are read in sorted order. A token path defined twice keeps the
/// position of its first definition and the value of its last.
pub fn load(base_dir: &Path, patterns: &[String], exclude_parent_keys: bool) -> Result<Vec<Token>> {
    let files = discover(base_dir, patterns)?;
    if files.is_empty() {
        return Err(EngineError::NoSources {
            patterns: patterns.to_vec(),
            base_dir: base_dir.to_path_buf(),
        });
    }

    let mut tokens: Vec<Token> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for file in &files {
        let contents = fs::read_to_string(file).map_err(|source| EngineError::Read {
            path: file.clone(),
            source,
        })?;
        let tree: serde_json::Value =
            serde_json::from_str(&contents).map_err(|source| EngineError::Parse {
                path: file.clone(),
                source,
            })?;

        let parsed = token::flatten(&tree, file, exclude_parent_keys)?;
        debug!("Read {} tokens from {}", parsed.len(), file.display());

        for token in parsed {
            let path = token.dotted_path();
            match positions.get(&path) {
                Some(&idx) => {
                    warn!(
                        "Token collision: '{}' in {} overrides {}",
                        path,
                        token.file.display(),
                        tokens[idx].file.display()
                    );
                    tokens[idx] = token;
                }
                None => {
                    positions.insert(path, tokens.len());
                    tokens.push(token);
                }
            }
        }
    }

    resolve::resolve_all(&mut tokens)?;
    info!("Loaded {} tokens from {} files", tokens.len(), files.len());
    Ok(tokens)
}
