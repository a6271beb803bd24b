//! Client for the subtitle inpainting service.
//!
//! This crate provides:
//! - The `SubtitleInpainter` collaborator trait and its HTTP implementation
//! - Request/response types for the service API
//! - The process-wide accelerator lock serializing inpainting jobs

pub mod client;
pub mod error;
pub mod lock;
pub mod types;

pub use client::{InpaintClient, InpaintClientConfig, SubtitleInpainter};
pub use error::{InpaintError, InpaintResult};
pub use lock::{AcceleratorLock, AcceleratorPermit};
pub use types::{HealthResponse, InpaintRequest, InpaintResponse};
