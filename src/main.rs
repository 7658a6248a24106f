//! `pagetext` CLI - extract readable text from web pages and PDFs

mod cmd;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pagetext::{ExtractConfig, ExtractError, RendererKind};

#[derive(Parser)]
#[command(name = "pagetext")]
#[command(about = "Extract readable text from web pages and PDF documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    /// Config file (default: ~/.config/pagetext/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable text
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the visible text of a web page
    Url {
        /// Page URL (http or https)
        url: String,

        /// Page renderer (http, chrome)
        #[arg(short, long)]
        renderer: Option<RendererKind>,

        /// Retries after the first failed attempt
        #[arg(long)]
        retries: Option<u32>,

        /// Navigation timeout per attempt, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Extract structured lines from a PDF file
    Pdf {
        /// Path to the PDF
        file: PathBuf,

        /// File name used for the title fallback (default: FILE)
        #[arg(short, long)]
        name: Option<String>,

        /// Vertical line-grouping tolerance, in points
        #[arg(long)]
        tolerance: Option<f64>,

        /// Mean font size above which a line is a heading
        #[arg(long)]
        heading_threshold: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays parseable
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cmd::output::print_error(&err, format);
            let client_error = err
                .downcast_ref::<ExtractError>()
                .is_some_and(ExtractError::is_client_error);
            if client_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ExtractConfig::load_from(path)?,
        None => ExtractConfig::load().context("failed to load config")?,
    };

    match cli.command {
        Commands::Url {
            url,
            renderer,
            retries,
            timeout,
        } => {
            if let Some(renderer) = renderer {
                config.renderer = renderer;
            }
            if let Some(retries) = retries {
                config.max_retries = retries;
            }
            if let Some(timeout) = timeout {
                config.navigation_timeout_secs = timeout;
            }
            cmd::url::cmd_url(config, &url, cli.format).await
        }
        Commands::Pdf {
            file,
            name,
            tolerance,
            heading_threshold,
        } => {
            if let Some(tolerance) = tolerance {
                anyhow::ensure!(tolerance > 0.0, "--tolerance must be positive, got {tolerance}");
                config.line_tolerance = tolerance;
            }
            if let Some(threshold) = heading_threshold {
                config.heading_threshold = threshold;
            }
            cmd::pdf::cmd_pdf(config, &file, name.as_deref(), cli.format).await
        }
    }
}
