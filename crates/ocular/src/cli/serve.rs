//! The `ocular serve` command: run the HTTP front end.

use anyhow::Context;
use clap::Args;
use ocular_core::config::DEFAULT_CONFIG_PATH;
use ocular_core::{Config, Dispatcher};
use std::path::PathBuf;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Path to the YAML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    // A missing or broken config file aborts startup
    let config = Config::load_from(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;

    tracing::info!("loaded configuration from {}", args.config.display());
    tracing::info!(
        "local model: {} at {}",
        config.model.name,
        config.model.base_url
    );

    if config.openrouter.enabled && !config.openrouter.api_key.is_empty() {
        tracing::info!(
            "OpenRouter enabled with {} model(s) at {}",
            config.openrouter.models.len(),
            config.openrouter.base_url
        );
        for model in &config.openrouter.models {
            tracing::info!("  - {} ({})", model.name, model.display_name);
        }
    } else {
        tracing::warn!("OpenRouter disabled or missing an API key");
    }

    let dispatcher = Dispatcher::from_config(&config)?;
    let bind = format!("{}:{}", args.host, args.port);
    crate::server::serve(config, dispatcher, &bind).await
}
