//! Configuration errors surfaced before the engine runs

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Duplicate category key '{0}'")]
    DuplicateCategoryKey(String),

    #[error("Duplicate category display name '{0}'")]
    DuplicateCategoryName(String),

    #[error("Token kind '{kind}' claimed by both '{first}' and '{second}'")]
    OverlappingKind {
        kind: String,
        first: String,
        second: String,
    },

    #[error("Category '{0}' accepts no token kinds")]
    EmptyCategory(String),

    #[error("Invalid category {field} '{value}': expected letters and digits, starting with a letter")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Duplicate platform configuration key '{0}'")]
    DuplicatePlatform(String),
}
