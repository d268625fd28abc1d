//! CLI entry point for PassForge.
//!
//! This binary provides the `passforge` command with subcommands for
//! generating passwords and managing the saved list.

mod cli;
mod commands;
mod config;
mod helpers;

use anyhow::{Context, Result};
use clap::Parser;
use passforge_vault::PasswordVault;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::helpers::{env_non_empty, init_tracing};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;
    config.apply_env(env_non_empty);
    if let Some(db) = &cli.db {
        config.storage.database = db.clone();
    }

    init_tracing(&config.logging.level);
    debug!(?config, "configuration resolved");

    match cli.command {
        Commands::Generate(args) => commands::cmd_generate(&config, &args),
        Commands::Save {
            account,
            secret,
            generate,
        } => {
            let vault = open_vault(&config).await?;
            commands::cmd_save(&vault, &config, &account, secret.as_deref(), &generate).await
        }
        Commands::List { json, show_secrets } => {
            let vault = open_vault(&config).await?;
            commands::cmd_list(&vault, json, show_secrets)
        }
        Commands::Show { id, json } => {
            let vault = open_vault(&config).await?;
            commands::cmd_show(&vault, id, json)
        }
        Commands::Delete { id } => {
            let vault = open_vault(&config).await?;
            commands::cmd_delete(&vault, id).await
        }
        Commands::Shell { show_secrets } => {
            let vault = open_vault(&config).await?;
            commands::cmd_shell(&vault, &config, show_secrets).await
        }
    }
}

async fn open_vault(config: &AppConfig) -> Result<PasswordVault> {
    let path = config.storage.database.clone();
    PasswordVault::open(path.clone())
        .await
        .with_context(|| format!("failed to open credential database {}", path.display()))
}
