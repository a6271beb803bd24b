//! Timestamp parsing and formatting.
//!
//! Manifest range cells may express positions as `HH:MM:SS`, `MM:SS`, or
//! plain seconds, all with optional fractional parts. Everything normalizes
//! to seconds as `f64`.

use thiserror::Error;

/// Parse a timestamp string to total seconds.
///
/// Supported forms:
/// - `HH:MM:SS` or `HH:MM:SS.mmm`
/// - `MM:SS` or `MM:SS.mmm`
/// - `SS` or `SS.mmm` (raw seconds)
///
/// # Examples
/// ```
/// use subscrub_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("01:30:00").unwrap(), 5400.0);
/// assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
/// assert_eq!(parse_timestamp("90").unwrap(), 90.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() > 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    let mut total = 0.0;
    for part in &parts {
        let value: f64 = part
            .parse()
            .map_err(|_| TimestampError::InvalidComponent(part.to_string()))?;
        if value < 0.0 {
            return Err(TimestampError::Negative);
        }
        total = total * 60.0 + value;
    }

    Ok(total)
}

/// Format seconds as `HH:MM:SS` or `HH:MM:SS.mmm`.
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("timestamp cannot be empty")]
    Empty,

    #[error("timestamp cannot be negative")]
    Negative,

    #[error("invalid timestamp component: {0}")]
    InvalidComponent(String),

    #[error("invalid timestamp format '{0}': use HH:MM:SS, MM:SS, or seconds")]
    InvalidFormat(String),

    #[error("invalid range '{0}': expected start-end with start before end")]
    InvalidRange(String),
}
