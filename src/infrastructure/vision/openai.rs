//! OpenAI-compatible chat completions client for image analysis.

use crate::domain::entities::ModelOutput;
use crate::domain::ports::{VisionError, VisionModel};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: [ContentPart<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

/// Sends one user message holding the prompt and the image to
/// `POST {api_base}/chat/completions`.
pub struct OpenAiVisionModel {
    client: Client,
    api_base: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiVisionModel {
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn request_body<'a>(&'a self, image_url: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: [
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: image_url },
                    },
                ],
            }],
        }
    }
}

/// Picks the first choice's message content.
///
/// A string becomes [`ModelOutput::Text`]; any other non-null JSON (some
/// compatible servers return parsed objects) becomes [`ModelOutput::Structured`].
fn extract_output(body: Value) -> Result<ModelOutput, VisionError> {
    let content = body
        .pointer("/choices/0/message/content")
        .cloned()
        .unwrap_or(Value::Null);

    match content {
        Value::Null => Err(VisionError::EmptyResponse),
        Value::String(text) if text.trim().is_empty() => Err(VisionError::EmptyResponse),
        Value::String(text) => Ok(ModelOutput::Text(text)),
        other => Ok(ModelOutput::Structured(other)),
    }
}

fn error_message(body: &Value) -> String {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string()
}

#[async_trait]
impl VisionModel for OpenAiVisionModel {
    async fn analyze_image(
        &self,
        api_key: &str,
        image_url: &str,
        prompt: &str,
    ) -> Result<ModelOutput, VisionError> {
        debug!(model = %self.model, "Sending image to vision model");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&self.request_body(image_url, prompt))
            .send()
            .await
            .map_err(|e| VisionError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| VisionError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), "Vision model request rejected: {}", message);
            return Err(VisionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        extract_output(body)
    }
}
