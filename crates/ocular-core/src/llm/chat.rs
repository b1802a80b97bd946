//! Chat-completions client for vision requests.
//!
//! Sends the image via data URL in the user message content array. Both
//! backends (local vLLM and OpenRouter) speak the same wire protocol, so
//! a single client type covers them; only the endpoint, credentials, and
//! argument buckets differ.

use crate::error::{ConfigError, GenerateError, GenerateResult};
use base64::Engine;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Instant;

/// Base64-encoded image ready to embed in a message.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g. "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and a resolved MIME type.
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// The uniform result of one generation call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// Generated text content
    pub content: String,
    /// Token-usage object as reported by the backend
    pub usage: Map<String, Value>,
    /// Round-trip latency in seconds
    pub latency: f64,
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(flatten)]
    sampling: &'a Map<String, Value>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// One configured chat-completions endpoint.
///
/// Constructed once at startup and shared across requests; cheap to call
/// concurrently. Performs exactly one outbound call per invocation with
/// no retry and no timeout beyond the client default.
#[derive(Debug)]
pub struct ChatBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    sampling_args: Map<String, Value>,
    extra_args: Map<String, Value>,
}

impl ChatBackend {
    pub fn new(
        base_url: &str,
        api_key: &str,
        sampling_args: Map<String, Value>,
        extra_args: Map<String, Value>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            sampling_args,
            extra_args,
        }
    }

    /// Create with default headers sent on every request (OpenRouter
    /// wants HTTP-Referer and X-Title).
    pub fn with_default_headers(
        base_url: &str,
        api_key: &str,
        sampling_args: Map<String, Value>,
        headers: HeaderMap,
    ) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::ValidationError(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            sampling_args,
            extra_args: Map::new(),
        })
    }

    /// Send one chat-completion request carrying the prompt and image.
    pub async fn chat_with_image(
        &self,
        model: &str,
        prompt: &str,
        image: &ImageInput,
    ) -> GenerateResult<GenerationResult> {
        let start = Instant::now();

        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ChatContent::Text {
                        text: prompt.to_string(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
            sampling: &self.sampling_args,
            extra: &self.extra_args,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Upstream {
                message: format!("request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Upstream {
                message: format!("upstream HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| GenerateError::Upstream {
            message: format!("failed to parse upstream response: {e}"),
            status_code: None,
        })?;

        let content = chat_resp
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| GenerateError::Upstream {
                message: "upstream returned no content".to_string(),
                status_code: None,
            })?;

        Ok(GenerationResult {
            content,
            usage: chat_resp.usage.unwrap_or_default(),
            latency: start.elapsed().as_secs_f64(),
        })
    }
}
