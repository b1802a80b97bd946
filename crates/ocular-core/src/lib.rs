//! Ocular Core - library behind the image-to-text web front end.
//!
//! Takes an uploaded image plus a text prompt and forwards them to a
//! vision-capable chat-completion API: a locally hosted model, or the
//! OpenRouter gateway when configured.
//!
//! # Architecture
//!
//! ```text
//! upload → validate MIME/payload → encode data URL → dispatch → one API call → result
//! ```
//!
//! The HTTP server and CLI live in the `ocular` crate; this crate holds
//! the transport-free pieces: configuration, validation, encoding, and
//! the backend clients.

pub mod config;
pub mod error;
pub mod llm;
pub mod upload;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, GenerateError, GenerateResult};
pub use llm::{ChatBackend, Dispatcher, GenerationResult, ImageInput, ModelSelector};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
