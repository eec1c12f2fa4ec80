//! CLI argument parsing for tokenforge

use crate::category::Profile;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Progress lines per generated file (default)
    Text,
    /// JSON summary for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tokenforge")]
#[command(version)]
#[command(about = "Generate Compose and Swift sources from design tokens, one file per category", long_about = None)]
pub struct Cli {
    /// Config file (default: tokenforge.toml in the working directory, if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Token source glob, repeatable (default: tokens/**/*.json)
    #[arg(short, long = "source", value_name = "GLOB")]
    pub source: Vec<String>,

    /// Root directory of generated platform sources
    #[arg(short = 'o', long = "build-root", value_name = "DIR")]
    pub build_root: Option<PathBuf>,

    /// Configuration preset
    #[arg(short, long, value_enum)]
    pub profile: Option<Profile>,

    /// Drop a category from the table, repeatable
    #[arg(long, value_name = "KEY")]
    pub omit: Vec<String>,

    /// Kotlin package of generated Compose objects
    #[arg(long = "package-name", value_name = "PACKAGE")]
    pub package_name: Option<String>,

    /// Remove previously generated files and stop
    #[arg(long = "clean-only")]
    pub clean_only: bool,

    /// Print the output targets without touching the filesystem
    #[arg(long = "list-targets", conflicts_with = "clean_only")]
    pub list_targets: bool,

    /// Summary format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing to stderr
    #[arg(long)]
    pub debug: bool,
}
