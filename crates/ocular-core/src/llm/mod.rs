//! Vision chat-completion backends.
//!
//! One wire-level client ([`ChatBackend`]) shared by the local and routed
//! backends, plus the dispatcher that picks between them by selector
//! prefix.

mod chat;
mod dispatch;

pub use chat::{ChatBackend, GenerationResult, ImageInput};
pub use dispatch::{Dispatcher, ModelSelector, PreparedCall};
