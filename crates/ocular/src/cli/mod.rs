//! Command-line interface modules.

pub mod config;
pub mod models;
pub mod serve;
