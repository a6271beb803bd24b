//! Time ranges scheduled for removal from a video.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::timestamp::{format_seconds, parse_timestamp, TimestampError};

/// A half-open `[start, end)` range in seconds.
///
/// Parses from `"start-end"` where each side is any form accepted by
/// [`parse_timestamp`], so `"00:01:13-00:01:30"` and `"73-90"` denote the
/// same range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start position in seconds.
    pub start_secs: f64,
    /// End position in seconds.
    pub end_secs: f64,
}

impl TimeRange {
    /// Create a range, validating `start < end`.
    pub fn new(start_secs: f64, end_secs: f64) -> Result<Self, TimestampError> {
        if start_secs >= end_secs {
            return Err(TimestampError::InvalidRange(format!(
                "{}-{}",
                format_seconds(start_secs),
                format_seconds(end_secs)
            )));
        }
        Ok(Self {
            start_secs,
            end_secs,
        })
    }

    /// Range duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

impl FromStr for TimeRange {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| TimestampError::InvalidRange(s.to_string()))?;
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            format_seconds(self.start_secs),
            format_seconds(self.end_secs)
        )
    }
}

/// Sort ranges by start and merge overlapping or touching neighbours.
pub fn merge_ranges(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));

    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start_secs <= last.end_secs => {
                last.end_secs = last.end_secs.max(range.end_secs);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Complement of the removal ranges: the spans of the video to keep.
///
/// Ranges are merged first; spans extending past `total_secs` are clamped.
/// Returns an empty vector when the ranges cover the whole video.
pub fn keep_spans(total_secs: f64, ranges: &[TimeRange]) -> Vec<TimeRange> {
    let merged = merge_ranges(ranges.to_vec());

    let mut spans = Vec::new();
    let mut cursor = 0.0;

    for range in &merged {
        let start = range.start_secs.min(total_secs);
        if cursor < start {
            spans.push(TimeRange {
                start_secs: cursor,
                end_secs: start,
            });
        }
        cursor = cursor.max(range.end_secs);
    }

    if cursor < total_secs {
        spans.push(TimeRange {
            start_secs: cursor,
            end_secs: total_secs,
        });
    }

    spans
}
