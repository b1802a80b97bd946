//! Ocular - web front end for image-to-text generation.
//!
//! Library side of the binary: the CLI command implementations, logging
//! setup, and the axum server. Kept as a lib so integration tests can
//! drive the router without binding a socket.

pub mod cli;
pub mod logging;
pub mod server;
