//! Port for the vision-capable language model.

use crate::domain::entities::ModelOutput;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a vision model client.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Vision model request failed: {0}")]
    Transport(String),

    #[error("Vision model returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Vision model returned no content")]
    EmptyResponse,
}

/// Sends an image and a prompt to a vision-capable model.
///
/// # Implementations
///
/// - [`crate::infrastructure::vision::OpenAiVisionModel`] - OpenAI-compatible chat completions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Analyzes the image at `image_url` following `prompt`, authenticated
    /// with `api_key`.
    async fn analyze_image(
        &self,
        api_key: &str,
        image_url: &str,
        prompt: &str,
    ) -> Result<ModelOutput, VisionError>;
}
