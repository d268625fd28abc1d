//! Subcommand handlers.
//!
//! Each handler takes the resolved [`AppConfig`] and, where records are
//! involved, an open [`PasswordVault`].

use anyhow::{Context, Result, bail};
use passforge_vault::{CharClasses, PasswordVault, VaultError, policy};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::cli::GenerateArgs;
use crate::config::AppConfig;
use crate::helpers::{format_created, print_table, redacted};

// ---------------------------------------------------------------------------
// Generation settings
// ---------------------------------------------------------------------------

/// Length and classes resolved from flags over configuration.
pub struct GenerationSettings {
    pub length: usize,
    pub classes: CharClasses,
}

impl GenerationSettings {
    pub fn resolve(config: &AppConfig, args: &GenerateArgs) -> Self {
        let requested = args.length.unwrap_or(config.generator.length);
        let length = policy::clamp_length(requested);
        if length != requested {
            warn!(
                requested,
                length,
                min = policy::MIN_LENGTH,
                max = policy::MAX_LENGTH,
                "password length out of range, clamped"
            );
        }

        Self {
            length,
            classes: args.classes(config.generator.classes()),
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommand: generate
// ---------------------------------------------------------------------------

pub fn cmd_generate(config: &AppConfig, args: &GenerateArgs) -> Result<()> {
    let settings = GenerationSettings::resolve(config, args);
    if settings.classes.is_empty() {
        bail!("no character class selected; enable at least one of --lowercase, --uppercase, --digits, --special");
    }

    let password = passforge_vault::generate(settings.length, settings.classes);
    println!("{password}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: save
// ---------------------------------------------------------------------------

pub async fn cmd_save(
    vault: &PasswordVault,
    config: &AppConfig,
    account: &str,
    secret: Option<&str>,
    args: &GenerateArgs,
) -> Result<()> {
    let result = match secret {
        Some(secret) => vault.save(account, secret).await,
        None => {
            let settings = GenerationSettings::resolve(config, args);
            vault
                .generate_and_save(account, settings.length, settings.classes)
                .await
        }
    };

    let record = match result {
        Ok(record) => record,
        Err(VaultError::Validation(reason)) => bail!("cannot save: {reason}"),
        Err(err) => return Err(err).context("failed to save password"),
    };

    info!(record_id = record.id, "password saved");
    println!("  Saved #{} for {}", record.id, record.account_name);
    if secret.is_none() {
        println!("  Password: {}", record.secret);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommands: list / show
// ---------------------------------------------------------------------------

pub fn cmd_list(vault: &PasswordVault, json: bool, show_secrets: bool) -> Result<()> {
    let records = vault.records();
    if json {
        let out = serde_json::to_string_pretty(&redacted(&records, show_secrets))?;
        println!("{out}");
    } else {
        print_table(&records, show_secrets);
    }
    Ok(())
}

pub fn cmd_show(vault: &PasswordVault, id: i64, json: bool) -> Result<()> {
    let Some(record) = vault.get(id) else {
        bail!("no saved password with id {id}");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!();
        println!("  Id:       {}", record.id);
        println!("  Account:  {}", record.account_name);
        println!("  Created:  {}", format_created(&record));
        println!("  Password: {}", record.secret);
        println!();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: delete
// ---------------------------------------------------------------------------

pub async fn cmd_delete(vault: &PasswordVault, id: i64) -> Result<()> {
    let removed = vault
        .delete(id)
        .await
        .context("failed to delete password")?;

    if removed {
        println!("  Deleted #{id}");
    } else {
        println!("  No saved password with id {id}; nothing deleted");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: shell
// ---------------------------------------------------------------------------

const SHELL_HELP: &str = "\
  Commands:
    generate [LENGTH]          - Generate a password (remembered for `save`)
    save <ACCOUNT> [= SECRET]  - Save SECRET, the last generated password, or a new one
                                 (both may contain spaces; only SECRET may contain `=`)
    delete <ID>                - Delete a saved password
    list                       - Reprint the saved list
    help                       - Show this help
    quit / exit                - Leave the shell";

/// Interactive session: the saved list is reprinted from the live feed after
/// every change while commands are read from stdin.
pub async fn cmd_shell(vault: &PasswordVault, config: &AppConfig, show_secrets: bool) -> Result<()> {
    let mut feed = vault.observe_all();
    // The initial snapshot is printed synchronously so the prompt follows it.
    if let Some(initial) = feed.next().await {
        print_table(&initial, show_secrets);
    }

    let printer = tokio::spawn(async move {
        while let Some(snapshot) = feed.next().await {
            println!();
            println!("  {} saved password(s)", snapshot.len());
            print_table(&snapshot, show_secrets);
        }
    });

    println!();
    println!("  PassForge v{}", env!("CARGO_PKG_VERSION"));
    println!("  Type `help` for commands, or `quit` to exit.");
    println!();

    let defaults = GenerationSettings::resolve(config, &GenerateArgs::default());
    let mut last_generated: Option<String> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read input")?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                None
            }
        };
        let Some(line) = line else { break };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let mut words = rest.split_whitespace();

        match command {
            "quit" | "exit" => break,
            "help" => println!("{SHELL_HELP}"),
            "list" => print_table(&vault.records(), show_secrets),
            "generate" | "gen" => {
                let length = match words.next().map(str::parse::<usize>) {
                    None => defaults.length,
                    Some(Ok(n)) => policy::clamp_length(n),
                    Some(Err(_)) => {
                        println!("  LENGTH must be a number");
                        continue;
                    }
                };
                let password = vault.generate_with(length, defaults.classes);
                if password.is_empty() {
                    println!("  No character class enabled in [generator] config");
                    continue;
                }
                println!("  {password}");
                last_generated = Some(password);
            }
            "save" => {
                let Some((account, secret)) = parse_save_args(rest) else {
                    println!("  usage: save <ACCOUNT> [= SECRET]");
                    continue;
                };
                let secret = match secret {
                    Some(secret) => secret.to_string(),
                    None => match last_generated.take() {
                        Some(password) => password,
                        None => vault.generate_with(defaults.length, defaults.classes),
                    },
                };
                match vault.save(account, &secret).await {
                    Ok(record) => info!(record_id = record.id, "password saved"),
                    Err(VaultError::Validation(reason)) => println!("  Cannot save: {reason}"),
                    Err(err) => {
                        error!(error = %err, "save failed");
                        println!("  Error: {err}");
                    }
                }
            }
            "delete" | "rm" => {
                let Some(Ok(id)) = words.next().map(str::parse::<i64>) else {
                    println!("  usage: delete <ID>");
                    continue;
                };
                match vault.delete(id).await {
                    Ok(true) => {}
                    Ok(false) => println!("  No saved password with id {id}"),
                    Err(err) => {
                        error!(error = %err, "delete failed");
                        println!("  Error: {err}");
                    }
                }
            }
            other => println!("  Unknown command `{other}`; type `help`"),
        }
    }

    vault.shutdown().await;
    // Shutdown closes the feed, so the printer drains and exits.
    printer.await.context("feed printer task failed")?;
    Ok(())
}

/// Split `ACCOUNT [= SECRET]`. Both halves keep inner spaces; the first `=`
/// separates them, so only the secret may contain `=`.
fn parse_save_args(rest: &str) -> Option<(&str, Option<&str>)> {
    let (account, secret) = match rest.split_once('=') {
        Some((account, secret)) => (account.trim(), Some(secret.trim())),
        None => (rest.trim(), None),
    };
    if account.is_empty() {
        return None;
    }
    Some((account, secret.filter(|s| !s.is_empty())))
}
