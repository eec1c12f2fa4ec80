// Token categories
//
// A category routes a fixed set of declared token kinds to one output file per
// platform. The tables ship as embedded TOML presets (presets/*.toml) and can
// be replaced by `[[category]]` entries in tokenforge.toml, so adding or
// removing a category never touches code.

mod definition;
mod registry;

pub use definition::{CategoryRule, KindFilter};
pub use registry::CategoryTable;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// One Compose object holding every token
    Single,
    /// Core categories, one file per category and platform
    #[default]
    Categorized,
    /// Core categories plus one category per typography/stroke primitive
    Extended,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Profile::Single => "single",
            Profile::Categorized => "categorized",
            Profile::Extended => "extended",
        })
    }
}
