//! Console output for runs and target listings

use crate::driver::RunSummary;
use crate::mapper::OutputPlan;
use serde::Serialize;

/// JSON summary document
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub version: &'static str,
    pub format: &'static str,
    #[serde(flatten)]
    pub summary: &'a RunSummary,
}

impl<'a> JsonSummary<'a> {
    pub fn new(summary: &'a RunSummary) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            format: "tokenforge-json-v1",
            summary,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Progress lines: one header per platform key, one line per written file
pub fn render_text(summary: &RunSummary) -> String {
    let mut out = String::new();

    if !summary.cleaned.removed_files.is_empty() {
        out.push_str(&format!(
            "Cleaned {} generated files\n",
            summary.cleaned.removed_files.len()
        ));
    }

    if let Some(built) = &summary.built {
        for platform in &built.platforms {
            out.push_str(&format!("\n{}\n", platform.platform));
            for file in &platform.files {
                out.push_str(&format!(
                    "✔︎ {} ({} tokens)\n",
                    file.path.display(),
                    file.token_count
                ));
            }
        }
        out.push_str(&format!(
            "\nGenerated {} files from {} tokens\n",
            built.file_count(),
            built.token_count
        ));
    }

    out
}

/// One line per output target
pub fn render_targets(plan: &OutputPlan) -> String {
    let width = plan.targets.iter().map(|t| t.key.len()).max().unwrap_or(0);
    let mut out = String::new();
    for target in &plan.targets {
        out.push_str(&format!(
            "{:width$}  {}  {}\n",
            target.key,
            target.output_path().display(),
            target.filter.as_deref().unwrap_or("-"),
            width = width
        ));
    }
    out
}
