//! Inpainting client error types.

use std::path::PathBuf;
use thiserror::Error;

pub type InpaintResult<T> = Result<T, InpaintError>;

#[derive(Debug, Error)]
pub enum InpaintError {
    #[error("inpainting service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("inpainting request failed: {0}")]
    RequestFailed(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service reported success but output is missing: {0}")]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InpaintError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }
}
