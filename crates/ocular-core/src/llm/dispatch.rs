//! Backend selection by model-identifier prefix.
//!
//! Both backends are resolved once at startup from configuration; per
//! request, resolution is a pure lookup that either yields a prepared
//! call or fails before any network traffic.

use super::chat::{ChatBackend, GenerationResult, ImageInput};
use crate::config::Config;
use crate::error::{ConfigError, GenerateError, GenerateResult};
use reqwest::header::{HeaderMap, HeaderValue};

/// Prefix selecting the routed backend; the remainder is the upstream
/// model name.
const ROUTED_PREFIX: &str = "openrouter:";

/// A parsed model selector.
#[derive(Debug, PartialEq, Eq)]
pub enum ModelSelector<'a> {
    /// The literal `"local"`
    Local,
    /// `"openrouter:<model>"` with the upstream model name
    Routed(&'a str),
}

impl<'a> ModelSelector<'a> {
    /// Parse a selector string, rejecting anything that names neither
    /// backend.
    pub fn parse(selector: &'a str) -> GenerateResult<Self> {
        if selector == "local" {
            Ok(ModelSelector::Local)
        } else if let Some(model) = selector.strip_prefix(ROUTED_PREFIX) {
            Ok(ModelSelector::Routed(model))
        } else {
            Err(GenerateError::UnknownModel(selector.to_string()))
        }
    }
}

/// The two backend slots, built once from config.
///
/// The routed slot is populated only when OpenRouter is enabled and has
/// an API key; otherwise routed selectors fail at resolution time.
pub struct Dispatcher {
    local_model: String,
    local: ChatBackend,
    routed: Option<ChatBackend>,
}

impl Dispatcher {
    /// Build both backend clients from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let local = ChatBackend::new(
            &config.model.base_url,
            &config.model.api_key,
            config.model.sampling_args.clone(),
            config.model.extra_args.clone(),
        );

        let routed = if config.openrouter.enabled && !config.openrouter.api_key.is_empty() {
            // OpenRouter attributes traffic via these headers
            let mut headers = HeaderMap::new();
            headers.insert("HTTP-Referer", HeaderValue::from_static("http://localhost:8000"));
            if let Ok(title) = HeaderValue::from_str(&config.app.title) {
                headers.insert("X-Title", title);
            }
            Some(ChatBackend::with_default_headers(
                &config.openrouter.base_url,
                &config.openrouter.api_key,
                config.openrouter.default_sampling_args.clone(),
                headers,
            )?)
        } else {
            None
        };

        Ok(Self {
            local_model: config.model.name.clone(),
            local,
            routed,
        })
    }

    /// Whether the routed backend is actually callable.
    pub fn routed_available(&self) -> bool {
        self.routed.is_some()
    }

    /// Resolve a selector to a prepared call. Pure; performs no I/O.
    pub fn resolve<'a>(&'a self, selector: &'a str) -> GenerateResult<PreparedCall<'a>> {
        match ModelSelector::parse(selector)? {
            ModelSelector::Local => Ok(PreparedCall {
                backend: &self.local,
                model: &self.local_model,
            }),
            ModelSelector::Routed(model) => match &self.routed {
                Some(backend) => Ok(PreparedCall { backend, model }),
                None => Err(GenerateError::BackendDisabled),
            },
        }
    }
}

/// A resolved backend plus the upstream model name to call it with.
#[derive(Debug)]
pub struct PreparedCall<'a> {
    backend: &'a ChatBackend,
    model: &'a str,
}

impl PreparedCall<'_> {
    /// Upstream model name this call will use.
    pub fn model(&self) -> &str {
        self.model
    }

    /// Perform the single outbound call.
    pub async fn run(&self, prompt: &str, image: &ImageInput) -> GenerateResult<GenerationResult> {
        self.backend.chat_with_image(self.model, prompt, image).await
    }
}
