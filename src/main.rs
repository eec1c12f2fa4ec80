use anyhow::{Context, Result};
use clap::Parser;
use tokenforge::cli::{Cli, OutputFormat};
use tokenforge::config::Config;
use tokenforge::driver::{self, RunMode};
use tokenforge::report;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let base_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let mut config = Config::load(args.config.as_deref(), &base_dir)?;
    config.apply_cli(&args);

    let (mut engine, plan) = driver::prepare(&config, &base_dir)?;

    if args.list_targets {
        print!("{}", report::render_targets(&plan));
        return Ok(());
    }

    let mode = if args.clean_only {
        RunMode::CleanOnly
    } else {
        RunMode::Full
    };
    let summary = driver::run(&mut engine, mode)?;

    match args.format {
        OutputFormat::Text => print!("{}", report::render_text(&summary)),
        OutputFormat::Json => println!("{}", report::JsonSummary::new(&summary).to_json()?),
    }

    Ok(())
}
