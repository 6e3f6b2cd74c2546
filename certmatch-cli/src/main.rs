//! certmatch CLI

use anyhow::{Context, Result};
use certmatch_config::{load_settings, validate_settings, LogFormat, Settings};
use certmatch_core::{KeyPair, OutputFormat};
use certmatch_emit::TraefikEmitter;
use certmatch_tls::{ScanReport, Scanner};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "certmatch")]
#[command(about = "Generator for Traefik TLS certificate config", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a certificate directory and write the TLS config
    Generate {
        /// Certificate directory
        dir: PathBuf,

        /// Path of the generated config file
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Path prefix for cert and key file paths in the config file
        #[arg(short, long)]
        path_prefix: Option<PathBuf>,

        /// Output format (traefik-toml, traefik-yaml)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Scan a certificate directory and print the pairs found
    Scan {
        /// Certificate directory
        dir: PathBuf,

        /// Print pairs as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Validate a settings file
    Validate {
        /// Path to settings file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct CommonArgs {
    /// Path to settings file (YAML, TOML, or JSON)
    #[arg(short, long, env = "CERTMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum files or certificates processed at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Give up on a single file after this long (e.g. "10s")
    #[arg(long, value_parser = parse_duration)]
    task_timeout: Option<Duration>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

impl CommonArgs {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(concurrency) = self.concurrency {
            settings.scan.concurrency = concurrency;
        }
        if let Some(timeout) = self.task_timeout {
            settings.scan.task_timeout = Some(timeout);
        }
        if let Some(ref level) = self.log_level {
            settings.logging.level = level.clone();
        }

        validate_settings(&settings)?;
        Ok(settings)
    }
}

fn parse_duration(value: &str) -> std::result::Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            dir,
            out,
            path_prefix,
            format,
            common,
        } => {
            let mut settings = common.settings()?;
            if out.is_some() {
                settings.output.path = out;
            }
            if path_prefix.is_some() {
                settings.output.path_prefix = path_prefix;
            }
            if let Some(format) = format {
                settings.output.format = format;
            }

            init_tracing(&settings)?;

            let out = settings
                .output
                .path
                .clone()
                .context("Output file not set (use --out or output.path)")?;

            let report = scan(&dir, &settings).await?;

            let emitter = TraefikEmitter::new(settings.output.format)
                .with_entry_points(settings.output.entry_points.clone())
                .with_path_prefix(settings.output.path_prefix.clone());
            let mode = emitter.write(&report.pairs, &out)?;

            tracing::info!(out = %out.display(), ?mode, "Config written");
            Ok(())
        }

        Commands::Scan { dir, json, common } => {
            let settings = common.settings()?;
            init_tracing(&settings)?;

            let report = scan(&dir, &settings).await?;

            if json {
                let pairs: Vec<PairView<'_>> = report.pairs.iter().map(PairView::from).collect();
                println!("{}", serde_json::to_string_pretty(&pairs)?);
            } else {
                for pair in &report.pairs {
                    println!(
                        "{} + {}",
                        pair.cert_path().display(),
                        pair.key_path().display()
                    );
                }
            }
            Ok(())
        }

        Commands::Validate { config } => {
            tracing_subscriber::fmt().with_target(false).init();

            tracing::info!("Validating settings: {}", config.display());

            match load_settings(&config) {
                Ok(settings) => {
                    tracing::info!("✓ Settings are valid");
                    tracing::info!("  Concurrency: {}", settings.scan.concurrency);
                    tracing::info!("  Output format: {:?}", settings.output.format);
                    tracing::info!("  Entry points: {}", settings.output.entry_points.join(", "));
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("✗ Settings validation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("certmatch");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

async fn scan(dir: &Path, settings: &Settings) -> Result<ScanReport> {
    tracing::info!(dir = %dir.display(), "Searching for certificates and private keys");

    let report = Scanner::new(settings.scan.clone())?
        .scan(dir)
        .await
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    let stats = report.stats;
    tracing::info!(
        files = stats.files,
        certificates = stats.certificates,
        private_keys = stats.private_keys,
        expired = stats.expired,
        unmatched = stats.unmatched,
        pairs = stats.pairs,
        "Found {} valid keypairs",
        stats.pairs
    );

    Ok(report)
}

#[derive(Serialize)]
struct PairView<'a> {
    cert: &'a Path,
    key: &'a Path,
    subject: &'a str,
    not_after: String,
}

impl<'a> From<&'a KeyPair> for PairView<'a> {
    fn from(pair: &'a KeyPair) -> Self {
        Self {
            cert: pair.cert_path(),
            key: pair.key_path(),
            subject: &pair.certificate().subject,
            not_after: pair.certificate().not_after.to_string(),
        }
    }
}

fn init_tracing(settings: &Settings) -> Result<()> {
    let filter = match settings.logging.level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(filter.into());

    // Logs go to stderr so `scan` output stays pipeable.
    match settings.logging.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_level(true),
            )
            .with(env_filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(env_filter)
            .init(),
    }

    Ok(())
}
