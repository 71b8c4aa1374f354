//! `crime-rank` — build the site's city crime ranking artifact.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Read the source location and run date ([`config::load_config`]).
//! 3. Fetch and parse the source table ([`source`], [`parser`]).
//! 4. Normalize, score and rank cities ([`pipeline::transform`]).
//! 5. Write `public/data/crime.json` ([`artifact::write_artifact`]).
//! 6. Render the requested summary ([`report`]).
//!
//! Any failure exits non-zero before the artifact is touched.

mod artifact;
mod cli;
mod config;
mod error;
mod models;
mod normalizer;
mod parser;
mod pipeline;
mod ranker;
mod report;
mod scorer;
mod source;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Fails before any network activity when the source is unset
    let config = load_config()?;

    let root = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let client = source::build_client()?;
    let spinner = (!cli.quiet).then(|| fetch_spinner(&config.source_url));
    let fetched = source::fetch_records(&client, &config.source_url).await;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let records = fetched.with_context(|| format!("reading {}", config.source_url))?;
    info!(rows = records.len(), "parsed source rows");

    let output = pipeline::transform(&records, &config.today)?;

    let artifact_path = artifact::write_artifact(&root, &output.document)?;
    info!(
        path = %artifact_path.display(),
        cities = output.document.meta.total_cities,
        "wrote artifact"
    );

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(
            &output.document,
            &output.stats,
            &artifact_path,
            cli.verbose,
            cli.quiet,
        )?,
        ReportFormat::Json => report::json::render(&output.document)?,
    }

    Ok(())
}

/// Log to stderr so `--report json` keeps stdout clean. `RUST_LOG` overrides
/// the verbosity flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default = match (verbose, quiet) {
        (true, _) => "crime_rank=debug",
        (false, true) => "crime_rank=warn",
        (false, false) => "crime_rank=info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn fetch_spinner(url: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching {}", url));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
