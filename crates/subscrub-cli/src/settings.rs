//! Layered configuration loading.
//!
//! Precedence, lowest to highest: built-in defaults, optional YAML file,
//! `SUBSCRUB_*` environment variables, CLI flags.

use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File};
use tracing::{info, warn};

use subscrub_models::{PipelineConfig, SubtitleArea};

use crate::Cli;

/// Resolve the pipeline configuration and create the output directories.
pub fn load(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut builder = Config::builder();

    builder = match &cli.config {
        Some(path) => builder.add_source(File::from(path.as_path())),
        // Optional default file next to the working directory
        None => builder.add_source(File::with_name("subscrub").required(false)),
    };
    // try_parsing so numeric/bool env values deserialize into typed fields
    builder = builder.add_source(Environment::with_prefix("SUBSCRUB").try_parsing(true));

    let mut config: PipelineConfig = builder
        .build()
        .context("cannot load configuration")?
        .try_deserialize()
        .context("invalid configuration")?;

    if let Some(dir) = &cli.output {
        config.final_dir = dir.clone();
    }
    if let Some(dir) = &cli.intermediate_dir {
        config.intermediate_dir = dir.clone();
    }
    if cli.keep_temp {
        config.keep_intermediate = true;
    }
    if let Some(size) = cli.queue_size {
        config.max_queue_size = size;
    }
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }

    config.validate()?;

    std::fs::create_dir_all(&config.intermediate_dir).with_context(|| {
        format!(
            "cannot create intermediate directory {}",
            config.intermediate_dir.display()
        )
    })?;
    std::fs::create_dir_all(&config.final_dir).with_context(|| {
        format!("cannot create final directory {}", config.final_dir.display())
    })?;

    Ok(config)
}

/// Load the subtitle region file.
///
/// A missing or unreadable region file is not fatal: the service falls
/// back to full-frame detection.
pub fn load_subtitle_area(path: &Path) -> Option<SubtitleArea> {
    let loaded = Config::builder()
        .add_source(File::from(path))
        .build()
        .and_then(|c| c.try_deserialize::<SubtitleArea>());

    match loaded {
        Ok(area) => {
            info!(
                path = %path.display(),
                ymin = area.ymin,
                ymax = area.ymax,
                "Loaded subtitle region"
            );
            Some(area)
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Cannot read subtitle region file, using full-frame detection"
            );
            None
        }
    }
}
