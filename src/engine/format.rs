//! Output file formats

use super::transform::{Entry, Rendered};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const HEADER: &str = "Do not edit directly, this file was auto-generated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// Kotlin `object` for Jetpack Compose
    #[serde(rename = "compose/object")]
    ComposeObject,

    /// Swift `enum` namespace of static constants
    #[serde(rename = "ios-swift/enum.swift")]
    IosSwiftEnum,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::ComposeObject => "compose/object",
            Format::IosSwiftEnum => "ios-swift/enum.swift",
        }
    }

    /// Render `tokens` as the contents of `file_name`
    pub fn render(&self, tokens: &[Rendered], options: &FormatOptions, file_name: &str) -> String {
        let entries = members(tokens, options.output_references);
        match self {
            Format::ComposeObject => compose_object(&entries, options),
            Format::IosSwiftEnum => swift_enum(&entries, options, file_name),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Format-specific options of one output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatOptions {
    /// Kotlin object / Swift enum name
    pub class_name: String,

    /// Kotlin package, ignored by the Swift format
    pub package_name: Option<String>,

    /// Emit aliases as references to the aliased member
    pub output_references: bool,
}

struct Member<'a> {
    description: Option<&'a str>,
    entry: Entry,
}

/// Flatten rendered tokens into members, rewriting aliases when requested
///
/// An alias is written as a reference only when the aliased token is emitted
/// in the same file and expands to the same number of entries.
fn members(tokens: &[Rendered], output_references: bool) -> Vec<Member<'_>> {
    let by_path: HashMap<&str, &Rendered> = tokens.iter().map(|t| (t.path.as_str(), t)).collect();

    let mut out = Vec::new();
    for token in tokens {
        let target = token
            .alias_of
            .as_deref()
            .filter(|_| output_references)
            .and_then(|path| by_path.get(path))
            .filter(|target| target.entries.len() == token.entries.len() && target.path != token.path);

        for (i, entry) in token.entries.iter().enumerate() {
            let entry = match target {
                Some(target) => Entry {
                    name: entry.name.clone(),
                    value: target.entries[i].name.clone(),
                },
                None => entry.clone(),
            };
            out.push(Member {
                description: if i == 0 { token.description.as_deref() } else { None },
                entry,
            });
        }
    }
    out
}

fn compose_object(members: &[Member<'_>], options: &FormatOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!("// {}\n\n", HEADER));
    if let Some(package) = &options.package_name {
        out.push_str(&format!("package {}\n\n", package));
    }
    out.push_str("import androidx.compose.ui.graphics.Color\n");
    out.push_str("import androidx.compose.ui.text.TextStyle\n");
    out.push_str("import androidx.compose.ui.text.font.FontWeight\n");
    out.push_str("import androidx.compose.ui.text.style.TextDecoration\n");
    out.push_str("import androidx.compose.ui.unit.*\n\n");

    out.push_str(&format!("object {} {{\n", options.class_name));
    for member in members {
        if let Some(description) = member.description {
            out.push_str(&format!("  /** {} */\n", description.replace("*/", "* /")));
        }
        out.push_str(&format!(
            "  val {} = {}\n",
            member.entry.name, member.entry.value
        ));
    }
    out.push_str("}\n");
    out
}

fn swift_enum(members: &[Member<'_>], options: &FormatOptions, file_name: &str) -> String {
    let mut out = String::new();
    out.push_str("//\n");
    out.push_str(&format!("// {}\n", file_name));
    out.push_str("//\n");
    out.push_str(&format!("// {}\n", HEADER));
    out.push_str("//\n\n");
    out.push_str("import UIKit\n\n");

    out.push_str(&format!("public enum {} {{\n", options.class_name));
    for member in members {
        if let Some(description) = member.description {
            out.push_str(&format!("    /// {}\n", description.replace('\n', " ")));
        }
        out.push_str(&format!(
            "    public static let {} = {}\n",
            member.entry.name, member.entry.value
        ));
    }
    out.push_str("}\n");
    out
}
