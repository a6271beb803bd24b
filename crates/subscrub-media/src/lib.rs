//! FFmpeg CLI wrapper for video range removal.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - FFprobe-based video inspection
//! - The range-removal collaborator used by the cutter stage

pub mod command;
pub mod cut;
pub mod error;
pub mod probe;

pub use command::FfmpegCommand;
pub use cut::{FfmpegCutter, RangeCutter};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
