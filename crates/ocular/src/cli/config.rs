//! The `ocular config` command for configuration management.

use clap::{Args, Subcommand};
use ocular_core::config::DEFAULT_CONFIG_PATH;
use ocular_core::Config;
use std::path::PathBuf;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show {
        /// Path to the YAML config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Write a config file with defaults
    Init {
        /// Path to write
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { config } => {
            let config = Config::load_from(&config)?;
            println!("{}", config.to_yaml()?);
        }

        ConfigCommand::Init { config: path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            let config = Config::default();
            std::fs::write(&path, config.to_yaml()?)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}
