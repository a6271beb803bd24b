//! Shared data models for the subscrub pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Task records flowing from the cutter stage to the subtitle-removal stage
//! - Time ranges and timestamp parsing
//! - Pipeline configuration and the inpainting algorithm set
//! - Subtitle region descriptions

pub mod config;
pub mod range;
pub mod task;
pub mod timestamp;

// Re-export common types
pub use config::{ConfigError, InpaintAlgorithm, PipelineConfig, SubtitleArea};
pub use range::{keep_spans, merge_ranges, TimeRange};
pub use task::{CutSpec, StageStatus, TaskRecord};
pub use timestamp::{format_seconds, parse_timestamp, TimestampError};
