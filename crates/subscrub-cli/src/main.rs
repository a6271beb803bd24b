//! Batch video pipeline binary.
//!
//! Reads a CSV manifest of videos and removal ranges, cuts the ranges with
//! FFmpeg, removes burned-in subtitles through the inpainting service, and
//! prints a summary report.

mod manifest;
mod report;
mod settings;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use subscrub_inpaint::{InpaintClient, InpaintClientConfig};
use subscrub_media::FfmpegCutter;
use subscrub_models::InpaintAlgorithm;
use subscrub_pipeline::run_pipeline;

#[derive(Parser)]
#[command(name = "subscrub")]
#[command(about = "Cut time ranges out of videos, then remove burned-in subtitles")]
#[command(version)]
pub struct Cli {
    /// CSV manifest: video path in column 1, removal ranges in the rest
    pub manifest: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Final output directory (overrides configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Intermediate output directory (overrides configuration)
    #[arg(long)]
    pub intermediate_dir: Option<PathBuf>,

    /// Keep intermediate files after successful subtitle removal
    #[arg(long)]
    pub keep_temp: bool,

    /// Queue capacity between the two stages
    #[arg(long)]
    pub queue_size: Option<usize>,

    /// Inpainting algorithm: sttn, lama, or propainter
    #[arg(long)]
    pub algorithm: Option<InpaintAlgorithm>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "subscrub=debug" } else { "subscrub=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .with(env_filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = settings::load(&cli)?;
    let area = settings::load_subtitle_area(&config.subtitle_area_config);

    let specs = manifest::read_manifest(&cli.manifest)?;
    info!(
        manifest = %cli.manifest.display(),
        rows = specs.len(),
        algorithm = %config.algorithm,
        keep_intermediate = config.keep_intermediate,
        "Manifest loaded"
    );
    if specs.is_empty() {
        warn!("Manifest has no processable rows");
    }

    let cutter = FfmpegCutter::new();

    let client_config = InpaintClientConfig::from_env();
    let service_url = client_config.base_url.clone();
    let client = InpaintClient::new(client_config).context("cannot create inpainting client")?;

    // Surface a dead service once at startup instead of failing every row
    let healthy = client
        .health_check()
        .await
        .context("inpainting service health check failed")?;
    anyhow::ensure!(
        healthy,
        "inpainting service at {service_url} is not healthy"
    );

    let final_dir = config.final_dir.clone();
    let run_report = tokio::select! {
        result = run_pipeline(cutter, client, config, area, specs) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted");
            return Ok(130);
        }
    };

    report::print_report(&run_report, &final_dir);
    if let Some(log_path) = report::write_failure_log(&run_report, &final_dir)? {
        info!(path = %log_path.display(), "Failure log written");
    }

    Ok(if run_report.total_failed() > 0 { 1 } else { 0 })
}
