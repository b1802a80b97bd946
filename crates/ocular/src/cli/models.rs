//! The `ocular models` command: query OpenRouter for available models.
//!
//! Hits the public `/models` endpoint (no API key needed) and keeps the
//! entries that accept image input, since only those work as routed
//! backends for this front end.

use clap::{Args, Subcommand};
use ocular_core::config::OpenRouterConfig;
use ocular_core::Config;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model discovery.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List OpenRouter models that accept image input
    List {
        /// Output raw JSON instead of text
        #[arg(long)]
        json: bool,

        /// Include models without image input support
        #[arg(long)]
        all: bool,

        /// Read the OpenRouter base URL from this config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// One entry from the OpenRouter model catalog.
#[derive(Debug, Deserialize, Serialize)]
pub struct ModelEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub architecture: Architecture,
    #[serde(default)]
    pub pricing: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Architecture {
    #[serde(default)]
    pub modality: String,
}

#[derive(Deserialize)]
struct ModelCatalog {
    data: Vec<ModelEntry>,
}

/// Whether a catalog entry advertises image input.
fn accepts_images(entry: &ModelEntry) -> bool {
    let modality = entry.architecture.modality.to_lowercase();
    modality.contains("image")
        || modality.contains("vision")
        || modality.contains("multimodal")
        || entry.id.to_lowercase().contains("vision")
}

/// Truncate a description for display, respecting char boundaries.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::List { json, all, config } => {
            let base_url = match config {
                Some(path) => Config::load_from(&path)?.openrouter.base_url,
                None => OpenRouterConfig::default().base_url,
            };

            let url = format!("{}/models", base_url.trim_end_matches('/'));
            tracing::debug!("fetching model catalog from {url}");

            let catalog: ModelCatalog = reqwest::get(&url).await?.error_for_status()?.json().await?;

            let models: Vec<ModelEntry> = catalog
                .data
                .into_iter()
                .filter(|m| all || accepts_images(m))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&models)?);
                return Ok(());
            }

            println!("Found {} model(s):\n", models.len());
            for (i, model) in models.iter().enumerate() {
                println!("{}. {}", i + 1, model.name);
                println!("   ID: {}", model.id);
                println!("   Description: {}", truncate(&model.description, 100));
                if let Some(context) = model.context_length {
                    println!("   Context length: {context}");
                }
                if !model.pricing.is_empty() {
                    let prompt = model.pricing.get("prompt").cloned().unwrap_or(Value::Null);
                    let completion = model
                        .pricing
                        .get("completion")
                        .cloned()
                        .unwrap_or(Value::Null);
                    println!("   Pricing: prompt {prompt}, completion {completion} per token");
                }
                println!("   Modality: {}", model.architecture.modality);
                println!();
            }

            Ok(())
        }
    }
}
