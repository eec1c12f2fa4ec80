//! Supported output platforms

use crate::engine::{Format, TransformGroup};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target output ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Jetpack Compose: Kotlin `object` with a package
    Compose,
    /// iOS: Swift `enum`
    Ios,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Compose, Platform::Ios];

    pub fn key(&self) -> &'static str {
        match self {
            Platform::Compose => "compose",
            Platform::Ios => "ios",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Platform::Compose => "kt",
            Platform::Ios => "swift",
        }
    }

    pub fn transform_group(&self) -> TransformGroup {
        match self {
            Platform::Compose => TransformGroup::Compose,
            Platform::Ios => TransformGroup::IosSwift,
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Platform::Compose => Format::ComposeObject,
            Platform::Ios => Format::IosSwiftEnum,
        }
    }

    /// Whether the format takes a package name
    pub fn uses_package(&self) -> bool {
        matches!(self, Platform::Compose)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_properties() {
        assert_eq!(Platform::Compose.extension(), "kt");
        assert_eq!(Platform::Ios.extension(), "swift");
        assert_eq!(Platform::Compose.format(), Format::ComposeObject);
        assert_eq!(Platform::Ios.transform_group(), TransformGroup::IosSwift);
        assert!(Platform::Compose.uses_package());
        assert!(!Platform::Ios.uses_package());
    }
}
