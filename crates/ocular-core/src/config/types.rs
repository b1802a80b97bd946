//! Sub-configuration structs with defaults matching the shipped YAML.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chat-completion parameters understood by every OpenAI-compatible
/// endpoint. Sampling keys outside this set are backend-specific and
/// migrate into the extra bucket at load time.
pub const STANDARD_SAMPLING_KEYS: &[&str] = &[
    "temperature",
    "top_p",
    "presence_penalty",
    "frequency_penalty",
    "max_tokens",
    "max_completion_tokens",
    "stop",
    "seed",
    "n",
    "logprobs",
    "top_logprobs",
    "logit_bias",
    "response_format",
    "user",
];

/// Local model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name sent in the request body
    pub name: String,

    /// Base URL of the OpenAI-compatible endpoint (e.g. a vLLM server)
    pub base_url: String,

    /// API key; local servers typically accept an empty one
    pub api_key: String,

    /// Prompt used when the request leaves the prompt field blank
    pub default_prompt: String,

    /// MIME types accepted for uploads
    pub allowed_mime_types: Vec<String>,

    /// Standard chat-completion sampling parameters
    pub sampling_args: Map<String, Value>,

    /// Backend-specific parameters merged into the request body alongside
    /// the standard ones (e.g. top_k, repetition_penalty for vLLM)
    pub extra_args: Map<String, Value>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "Qwen3-VL-8B-Instruct".to_string(),
            base_url: "http://localhost:8500/v1".to_string(),
            api_key: String::new(),
            default_prompt: "请根据提供的网页设计图，编写对应的HTML代码，将结果写在一个 markdown HTML 代码块中"
                .to_string(),
            allowed_mime_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/svg+xml".to_string(),
            ],
            sampling_args: Map::new(),
            extra_args: Map::new(),
        }
    }
}

impl ModelConfig {
    /// Move sampling keys that are not standard chat-completion
    /// parameters into the extra bucket. Runs once at load time; the
    /// split is static for the lifetime of the process.
    ///
    /// Keys already present in `extra_args` win over migrated ones.
    pub(crate) fn partition_sampling_args(&mut self) {
        let (standard, extra): (Vec<_>, Vec<_>) = std::mem::take(&mut self.sampling_args)
            .into_iter()
            .partition(|(key, _)| STANDARD_SAMPLING_KEYS.contains(&key.as_str()));

        self.sampling_args = standard.into_iter().collect();
        for (key, value) in extra {
            self.extra_args.entry(key).or_insert(value);
        }
    }
}

/// OpenRouter (routed multi-model gateway) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    /// Whether the routed backend is offered at all
    pub enabled: bool,

    /// OpenRouter API key; the backend stays disabled without one
    pub api_key: String,

    /// Base URL of the OpenRouter API
    pub base_url: String,

    /// Sampling parameters applied to every routed call
    pub default_sampling_args: Map<String, Value>,

    /// Models offered in the front-end selector
    pub models: Vec<OpenRouterModel>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            default_sampling_args: Map::new(),
            models: Vec::new(),
        }
    }
}

/// A routed model entry in the selector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterModel {
    /// Upstream model identifier (e.g. "google/gemini-2.0-flash-001")
    pub name: String,

    /// Human-readable label shown in the form
    pub display_name: String,
}

/// Application metadata shown on the index page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMeta {
    /// Page and application title
    pub title: String,

    /// Application version string
    pub version: String,
}

impl Default for AppMeta {
    fn default() -> Self {
        Self {
            title: "Image-to-Text Demo".to_string(),
            version: "0.1.0".to_string(),
        }
    }
}
