//! Inpainting service request/response types.

use serde::{Deserialize, Serialize};

use subscrub_models::{InpaintAlgorithm, SubtitleArea};

/// Request for subtitle removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InpaintRequest {
    /// Path to the input video (shared filesystem with the service)
    pub input_path: String,
    /// Path the service must write the result to
    pub output_path: String,
    /// Algorithm identifier
    pub algorithm: InpaintAlgorithm,
    /// Subtitle region; full-frame detection when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_area: Option<SubtitleArea>,
}

/// Response from subtitle removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InpaintResponse {
    /// Path of the produced video
    pub output_path: String,
    /// Frames the model touched, when the service reports it
    #[serde(default)]
    pub frames_processed: Option<u64>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}
