//! Error types for the Ocular front end.
//!
//! Two families: configuration errors, which are fatal at startup, and
//! generation errors, which map onto HTTP responses. The client-facing
//! variants carry the user-visible detail string directly in their
//! `Display` output.

use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse YAML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while handling a generation request.
///
/// Every variant except `Upstream` is a client error (HTTP 400); the
/// display strings of those variants are the detail messages returned to
/// the browser.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The upload declared a content type outside the allowed set
    #[error("仅支持 PNG / JPEG / SVG 文件")]
    UnsupportedMediaType,

    /// The uploaded file was empty
    #[error("文件内容为空")]
    EmptyPayload,

    /// No usable MIME type could be resolved for the upload
    #[error("无法识别的文件类型")]
    UnrecognizedMediaType,

    /// The routed backend was selected but is not configured
    #[error("OpenRouter 未启用或未配置 API Key")]
    BackendDisabled,

    /// The model selector matched neither backend
    #[error("不支持的模型: {0}")]
    UnknownModel(String),

    /// The backend call failed: transport error, non-2xx status, or a
    /// malformed upstream response. Maps to HTTP 502.
    #[error("{message}")]
    Upstream {
        message: String,
        status_code: Option<u16>,
    },
}

impl GenerateError {
    /// True for errors caused by the client's request rather than the
    /// upstream backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, GenerateError::Upstream { .. })
    }
}

/// Convenience type alias for generation results.
pub type GenerateResult<T> = std::result::Result<T, GenerateError>;
