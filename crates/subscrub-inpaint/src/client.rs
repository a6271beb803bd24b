//! Inpainting service HTTP client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use subscrub_models::{InpaintAlgorithm, SubtitleArea};

use crate::error::{InpaintError, InpaintResult};
use crate::types::{HealthResponse, InpaintRequest, InpaintResponse};

/// Subtitle-removal collaborator.
///
/// One black-box call per video: given the intermediate artifact, the
/// subtitle region, and the algorithm identifier, produce the destination
/// file or fail. Implementations must be safe to share between tasks; the
/// caller serializes accelerator access.
#[async_trait]
pub trait SubtitleInpainter: Send + Sync {
    /// Remove burned-in subtitles from `input`, writing the result to `output`.
    async fn remove_subtitles(
        &self,
        input: &Path,
        area: Option<&SubtitleArea>,
        algorithm: InpaintAlgorithm,
        output: &Path,
    ) -> InpaintResult<()>;

    /// Collaborator name for logging.
    fn name(&self) -> &'static str;
}

/// Configuration for the inpainting client.
#[derive(Debug, Clone)]
pub struct InpaintClientConfig {
    /// Base URL of the inpainting service
    pub base_url: String,
    /// TCP connect timeout; requests themselves are unbounded because
    /// inpainting a long video can take arbitrarily long
    pub connect_timeout: Duration,
}

impl Default for InpaintClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8601".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl InpaintClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SUBSCRUB_INPAINT_URL")
                .unwrap_or_else(|_| "http://localhost:8601".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("SUBSCRUB_INPAINT_CONNECT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

/// HTTP client for the inpainting service.
pub struct InpaintClient {
    http: Client,
    config: InpaintClientConfig,
}

impl InpaintClient {
    /// Create a new client.
    pub fn new(config: InpaintClientConfig) -> InpaintResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(InpaintError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> InpaintResult<Self> {
        Self::new(InpaintClientConfig::from_env())
    }

    /// Check whether the service is up and ready.
    pub async fn health_check(&self) -> InpaintResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Inpainting service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Inpainting service health check error: {}", e);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl SubtitleInpainter for InpaintClient {
    async fn remove_subtitles(
        &self,
        input: &Path,
        area: Option<&SubtitleArea>,
        algorithm: InpaintAlgorithm,
        output: &Path,
    ) -> InpaintResult<()> {
        let url = format!("{}/inpaint", self.config.base_url);
        let request = InpaintRequest {
            input_path: input.to_string_lossy().to_string(),
            output_path: output.to_string_lossy().to_string(),
            algorithm,
            sub_area: area.copied(),
        };

        debug!(
            input = %input.display(),
            algorithm = %algorithm,
            "Sending inpaint request to {}",
            url
        );

        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InpaintError::request_failed(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        let body: InpaintResponse = response.json().await?;
        debug!(
            output = %body.output_path,
            frames = ?body.frames_processed,
            "Inpaint request completed"
        );

        if !output.exists() {
            return Err(InpaintError::MissingOutput(output.to_path_buf()));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "inpaint-http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = InpaintClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8601");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_request_omits_absent_area() {
        let request = InpaintRequest {
            input_path: "/tmp/a_cut.mp4".into(),
            output_path: "/out/a_no_sub.mp4".into(),
            algorithm: InpaintAlgorithm::Sttn,
            sub_area: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("sub_area"));
        assert!(json.contains("\"algorithm\":\"sttn\""));
    }
}
