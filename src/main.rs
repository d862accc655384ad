//! Techcrawl main entry point
//!
//! This is the command-line interface for the Techcrawl fingerprinting crawler.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use techcrawl::config::{load_options, CrawlOptions};
use techcrawl::detector::{CategoryCatalog, CommandDetector};
use techcrawl::output::{format_json_result, format_markdown_report, write_report};
use techcrawl::render::HttpRenderer;
use techcrawl::Driver;
use tracing_subscriber::EnvFilter;

/// Techcrawl: identify the technologies behind a website
///
/// Techcrawl renders a page (and optionally the same-host pages it links to),
/// hands each page's headers, HTML, scripts, globals and robots.txt to a
/// fingerprinting engine, and reports every technology detected.
#[derive(Parser, Debug)]
#[command(name = "techcrawl")]
#[command(version = "1.0.0")]
#[command(about = "A technology fingerprinting crawler", long_about = None)]
struct Cli {
    /// URL to analyze
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output, including step timings
    #[arg(long)]
    debug: bool,

    /// Wait in milliseconds between sibling requests
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Maximum link depth to follow
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of pages to analyze
    #[arg(long)]
    max_urls: Option<usize>,

    /// Wait in milliseconds for each page to settle
    #[arg(long, value_name = "MS")]
    max_wait: Option<u64>,

    /// Follow links on the same host
    #[arg(short, long)]
    recursive: bool,

    /// Timeout in milliseconds for each HTTP request and detector run
    #[arg(long, value_name = "MS")]
    request_timeout: Option<u64>,

    /// User agent for every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Category catalog (JSON) used to name detected categories
    #[arg(long, value_name = "FILE")]
    categories: Option<PathBuf>,

    /// Fingerprinting engine to run for each page
    #[arg(long, value_name = "PROGRAM")]
    detector: Option<String>,

    /// Argument passed to the detector program (repeatable)
    #[arg(long = "detector-arg", value_name = "ARG", allow_hyphen_values = true)]
    detector_args: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = resolve_options(&cli)?;
    setup_logging(options.debug);

    let Some(program) = cli.detector.clone() else {
        bail!("No detector configured; pass --detector <PROGRAM>");
    };

    let catalog = match &cli.categories {
        Some(path) => {
            tracing::info!("Loading categories from: {}", path.display());
            CategoryCatalog::load(path)
                .with_context(|| format!("Failed to load categories from {}", path.display()))?
        }
        None => CategoryCatalog::default(),
    };

    let renderer = HttpRenderer::new(&options.user_agent, options.request_timeout())
        .context("Failed to build HTTP client")?;
    let detector = CommandDetector::new(
        program,
        cli.detector_args.clone(),
        options.request_timeout(),
    );

    let driver = Driver::new(
        &cli.url,
        options,
        Arc::new(renderer),
        Arc::new(detector),
        Arc::new(catalog),
    )?;

    let report = driver.analyze_report().await;
    tracing::info!(
        "Analyzed {} pages in {:.2}s",
        report.visited.len(),
        report.duration_seconds()
    );

    let content = match cli.format {
        Format::Json => format_json_result(&report.result)?,
        Format::Markdown => format_markdown_report(&report),
    };
    write_report(&content, cli.output.as_deref())?;

    if let Some(path) = &cli.output {
        tracing::info!("Report written to: {}", path.display());
    }

    Ok(())
}

/// Loads the config file, if any, and applies command-line overrides
fn resolve_options(cli: &Cli) -> anyhow::Result<CrawlOptions> {
    let mut options = match &cli.config {
        Some(path) => load_options(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => CrawlOptions::default(),
    };

    options.debug |= cli.debug;
    options.recursive |= cli.recursive;
    if let Some(delay) = cli.delay {
        options.delay_ms = delay;
    }
    if let Some(max_depth) = cli.max_depth {
        options.max_depth = max_depth;
    }
    if let Some(max_urls) = cli.max_urls {
        options.max_urls = max_urls;
    }
    if let Some(max_wait) = cli.max_wait {
        options.max_wait_ms = max_wait;
    }
    if let Some(timeout) = cli.request_timeout {
        options.request_timeout_ms = timeout;
    }
    if let Some(user_agent) = &cli.user_agent {
        options.user_agent = user_agent.clone();
    }

    Ok(options)
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--debug` raises this crate to debug.
fn setup_logging(debug: bool) {
    let default = if debug {
        "techcrawl=debug,warn"
    } else {
        "techcrawl=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
