//! Build driver: clean, then build
//!
//! Both phases run strictly in sequence against one engine. Errors from
//! either phase are returned to the caller untouched, there is no retry.

use crate::config::Config;
use crate::engine::{BuildReport, CleanReport, Engine};
use crate::mapper::OutputPlan;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Which phases to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Clean, then build
    Full,
    /// Clean only
    CleanOnly,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub cleaned: CleanReport,
    /// `None` in clean-only mode
    pub built: Option<BuildReport>,
}

/// Assemble the engine for a configuration and register its filters
pub fn prepare(config: &Config, base_dir: &Path) -> Result<(Engine, OutputPlan)> {
    let plan = config.plan()?;
    let mut engine = Engine::new(config.engine_config(&plan, base_dir)?);
    plan.register_filters(&mut engine)
        .context("Failed to register category filters")?;
    info!(
        "Prepared {} output targets with {} filters",
        plan.targets.len(),
        plan.filters.len()
    );
    Ok((engine, plan))
}

/// Run the pipeline on a prepared engine
pub fn run(engine: &mut Engine, mode: RunMode) -> Result<RunSummary> {
    let cleaned = engine
        .clean_all_platforms()
        .context("Cleaning generated output failed")?;

    let built = match mode {
        RunMode::CleanOnly => None,
        RunMode::Full => Some(
            engine
                .build_all_platforms()
                .context("Building token output failed")?,
        ),
    };

    Ok(RunSummary { cleaned, built })
}
