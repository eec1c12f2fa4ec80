//! Engine error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, resolving, transforming or writing tokens
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No token files matched the source patterns {patterns:?} under {base_dir}")]
    NoSources {
        patterns: Vec<String>,
        base_dir: PathBuf,
    },

    #[error("Invalid source glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid token JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Token file {path} must contain a JSON object at the top level")]
    NotAnObject { path: PathBuf },

    #[error("Reference {{{reference}}} in token '{token}' does not resolve to any token")]
    UnresolvedReference { token: String, reference: String },

    #[error("Circular reference detected: {chain}")]
    CircularReference { chain: String },

    #[error("Filter '{0}' is already registered")]
    FilterAlreadyRegistered(String),

    #[error("Platform '{platform}' references unknown filter '{filter}'")]
    UnknownFilter { platform: String, filter: String },

    #[error("Tokens '{first}' and '{second}' both generate member '{name}' in {file}")]
    NameCollision {
        file: PathBuf,
        name: String,
        first: String,
        second: String,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
