//! Range removal: excise time ranges from a video with FFmpeg.
//!
//! # Strategy
//!
//! The removal ranges are complemented against the probed duration into
//! keep spans, then:
//!
//! - one keep span: single stream-copy extraction (`-ss`/`-t -c copy`)
//! - several spans: extract each span into a temp directory with two-pass
//!   seeking and a re-encode (stream copy cannot cut between keyframes),
//!   then concatenate with the concat demuxer and stream copy
//!
//! The re-encode is restricted to the multi-span path; the common
//! single-span case preserves the original streams untouched.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use subscrub_models::{keep_spans, TimeRange};

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;

/// Range-removal collaborator.
///
/// One black-box call per video: given the source, the ranges to remove,
/// and a destination, produce the destination file or fail.
#[async_trait]
pub trait RangeCutter: Send + Sync {
    /// Remove `ranges` from `source`, writing the result to `dest`.
    async fn remove_ranges(
        &self,
        source: &Path,
        ranges: &[TimeRange],
        dest: &Path,
    ) -> MediaResult<()>;

    /// Collaborator name for logging.
    fn name(&self) -> &'static str;
}

/// FFmpeg-backed range removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegCutter;

impl FfmpegCutter {
    pub fn new() -> Self {
        Self
    }

    async fn extract_span_copy(source: &Path, span: &TimeRange, dest: &Path) -> MediaResult<()> {
        FfmpegCommand::new(source, dest)
            .seek(span.start_secs)
            .duration(span.duration_secs())
            .codec_copy()
            .run()
            .await
    }

    /// Extract a span with frame accuracy: fast input seek to get close,
    /// accurate output seek from there, re-encoding the result.
    async fn extract_span_accurate(
        source: &Path,
        span: &TimeRange,
        dest: &Path,
    ) -> MediaResult<()> {
        let fast_seek = (span.start_secs - 5.0).max(0.0);
        let accurate_seek = span.start_secs - fast_seek;

        FfmpegCommand::new(source, dest)
            .seek(fast_seek)
            .output_seek(accurate_seek)
            .duration(span.duration_secs())
            .output_args(["-c:v", "libx264", "-preset", "fast", "-crf", "18"])
            .output_args(["-c:a", "aac"])
            .run()
            .await
    }

    async fn concat_spans(source: &Path, spans: &[TimeRange], dest: &Path) -> MediaResult<()> {
        let temp_dir = tempfile::tempdir()?;
        let mut list = String::new();

        for (i, span) in spans.iter().enumerate() {
            let seg_path = temp_dir.path().join(format!("seg_{:04}.mp4", i));
            debug!(
                segment = i,
                start_secs = span.start_secs,
                duration_secs = span.duration_secs(),
                "Extracting keep span"
            );
            Self::extract_span_accurate(source, span, &seg_path).await?;
            list.push_str(&format!("file '{}'\n", seg_path.display()));
        }

        let list_path = temp_dir.path().join("segments.txt");
        tokio::fs::write(&list_path, list).await?;

        FfmpegCommand::new(&list_path, dest)
            .concat_list()
            .codec_copy()
            .run()
            .await
    }
}

#[async_trait]
impl RangeCutter for FfmpegCutter {
    async fn remove_ranges(
        &self,
        source: &Path,
        ranges: &[TimeRange],
        dest: &Path,
    ) -> MediaResult<()> {
        if ranges.is_empty() {
            return Err(MediaError::EmptyRanges);
        }
        if !source.exists() {
            return Err(MediaError::FileNotFound(source.to_path_buf()));
        }

        let video = probe_video(source).await?;
        let spans = keep_spans(video.duration, ranges);

        info!(
            source = %source.display(),
            duration_secs = video.duration,
            remove_ranges = ranges.len(),
            keep_spans = spans.len(),
            "Cutting ranges"
        );

        match spans.len() {
            0 => {
                // Ranges cover the whole video; pass the source through
                warn!(
                    source = %source.display(),
                    "Removal ranges cover the entire video, copying source unchanged"
                );
                tokio::fs::copy(source, dest).await?;
            }
            1 => Self::extract_span_copy(source, &spans[0], dest).await?,
            _ => Self::concat_spans(source, &spans, dest).await?,
        }

        if !dest.exists() {
            return Err(MediaError::MissingOutput(dest.to_path_buf()));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}
