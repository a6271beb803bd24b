//! Two-stage video pipeline coordination.
//!
//! This crate provides:
//! - The cutter (producer) and subtitle-removal (consumer) stages
//! - Run statistics with per-stage tallies and an ordered failure list
//! - Output path construction for both stages
//! - The runner wiring stages, queue, and accelerator lock together

pub mod cutter;
pub mod error;
pub mod paths;
pub mod remover;
pub mod runner;
pub mod stats;

pub use cutter::CutterStage;
pub use error::{PipelineError, PipelineResult};
pub use paths::{final_path, intermediate_path};
pub use remover::SubtitleRemovalStage;
pub use runner::run_pipeline;
pub use stats::{FailureRecord, PipelineStage, RunReport, RunStatistics, StageTally};
