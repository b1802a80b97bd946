//! Ocular CLI - web front end for image-to-text generation.
//!
//! Ocular serves a small upload form that forwards an image plus a text
//! prompt to a vision-capable chat-completion API (a locally hosted
//! model, or OpenRouter when configured) and returns the generated text
//! with usage and latency metadata.
//!
//! # Usage
//!
//! ```bash
//! # Run the server
//! ocular serve --config config.yaml
//!
//! # List OpenRouter vision models
//! ocular models list
//!
//! # View or scaffold configuration
//! ocular config show
//! ocular config init
//! ```

use clap::{Parser, Subcommand};
use ocular::{cli, logging};

/// Ocular - image-to-text web front end for vision chat-completion APIs.
#[derive(Parser, Debug)]
#[command(name = "ocular")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(cli::serve::ServeArgs),

    /// Query OpenRouter for available models
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args).await,
        Commands::Models(args) => cli::models::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
