//! Conquest - Entry Point
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cq providers` | List the registered fast-store providers |
//! | `cq config` | Print the effective configuration as TOML |
//! | `cq check` | Build the application context and probe both stores |

// Force-link cq-providers to ensure linkme registrations are included
extern crate cq_providers;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cq_application::ports::registry::list_cache_providers;
use cq_domain::ports::AuthoritativeStore;
use cq_infrastructure::config::loader::to_toml;
use cq_infrastructure::logging::init_logging;
use cq_infrastructure::{ConfigLoader, init_app};
use cq_providers::InMemoryDocumentStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Command line interface for Conquest
#[derive(Parser, Debug)]
#[command(name = "cq")]
#[command(about = "Conquest - live game entity registry tools")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// List registered fast-store providers
    Providers,
    /// Print the effective configuration
    Config,
    /// Build the application context and report store readiness
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.command == Command::Providers {
        for (name, description) in list_cache_providers() {
            println!("{name:<8} {description}");
        }
        return Ok(());
    }

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load().context("failed to load configuration")?;

    match cli.command {
        Command::Config => print!("{}", to_toml(&config)?),
        Command::Check => {
            init_logging(&config.logging)?;
            let store: Arc<dyn AuthoritativeStore> = Arc::new(InMemoryDocumentStore::new());
            let context = init_app(config, store)?;
            let report = context.check().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            context.shutdown();
            if !report.cache_ready {
                anyhow::bail!("fast store '{}' is not ready", report.cache_provider);
            }
        }
        Command::Providers => {}
    }
    Ok(())
}
