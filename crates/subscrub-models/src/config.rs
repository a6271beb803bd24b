//! Pipeline configuration.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_queue_size must be at least 1")]
    ZeroQueueCapacity,

    #[error("unknown inpainting algorithm '{0}' (expected sttn, lama, or propainter)")]
    UnknownAlgorithm(String),
}

/// Inpainting algorithm identifier, passed through to the inpainting
/// service unchanged. Closed set: an unrecognized identifier is rejected
/// when configuration is loaded, before the pipeline starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InpaintAlgorithm {
    /// Spatial-temporal transformer, the fastest option
    #[default]
    Sttn,
    /// Single-frame LAMA inpainting
    Lama,
    /// Flow-guided ProPainter, highest quality and memory use
    Propainter,
}

impl InpaintAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            InpaintAlgorithm::Sttn => "sttn",
            InpaintAlgorithm::Lama => "lama",
            InpaintAlgorithm::Propainter => "propainter",
        }
    }
}

impl FromStr for InpaintAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sttn" => Ok(InpaintAlgorithm::Sttn),
            "lama" => Ok(InpaintAlgorithm::Lama),
            "propainter" => Ok(InpaintAlgorithm::Propainter),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl std::fmt::Display for InpaintAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subtitle region as fractions of the frame, `0.0..=1.0` on each axis.
///
/// `None` at the call sites means full-frame detection by the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubtitleArea {
    pub ymin: f32,
    pub ymax: f32,
    pub xmin: f32,
    pub xmax: f32,
}

/// Resolved pipeline configuration, passed by reference into each stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Stage-1 output directory
    pub intermediate_dir: PathBuf,
    /// Stage-2 output directory
    pub final_dir: PathBuf,
    /// Keep stage-1 artifacts after a successful stage 2
    pub keep_intermediate: bool,
    /// Bounded queue capacity; bounds in-flight intermediate artifacts
    pub max_queue_size: usize,
    /// Path to the subtitle-region YAML file
    pub subtitle_area_config: PathBuf,
    /// Inpainting algorithm handed to the service
    pub algorithm: InpaintAlgorithm,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            intermediate_dir: PathBuf::from("output/intermediate"),
            final_dir: PathBuf::from("output/final"),
            keep_intermediate: false,
            max_queue_size: 10,
            subtitle_area_config: PathBuf::from("subtitle_area.yaml"),
            algorithm: InpaintAlgorithm::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate values a type alone cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_queue_size == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_round_trip() {
        for alg in [
            InpaintAlgorithm::Sttn,
            InpaintAlgorithm::Lama,
            InpaintAlgorithm::Propainter,
        ] {
            assert_eq!(alg.as_str().parse::<InpaintAlgorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        assert!(matches!(
            "e2fgvi".parse::<InpaintAlgorithm>(),
            Err(ConfigError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_algorithm_deserialize_lowercase() {
        let alg: InpaintAlgorithm = serde_json::from_str("\"lama\"").unwrap();
        assert_eq!(alg, InpaintAlgorithm::Lama);
        assert!(serde_json::from_str::<InpaintAlgorithm>("\"magic\"").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_queue_size, 10);
        assert!(!config.keep_intermediate);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = PipelineConfig {
            max_queue_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroQueueCapacity)
        ));
    }
}
