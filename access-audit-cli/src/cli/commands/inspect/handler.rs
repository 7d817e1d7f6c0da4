//! Diagnostic handlers for each side of the comparison

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

use super::{AccountsCommands, MembersCommands};
use crate::api::GraphClient;
use crate::cli::commands::load_config;
use crate::config::Overrides;
use crate::database::PostgresAccountSource;
use crate::services::{AccountSource, DirectorySource};

pub async fn handle_members_command(args: MembersCommands, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, &args.overrides())?;
    let group = &config.directory.group_name;

    let client = GraphClient::from_config(&config.directory)
        .context("Failed to create directory client")?;
    let members = client
        .fetch_group_members(group)
        .await
        .with_context(|| format!("Failed to fetch members of group '{}'", group))?;

    println!(
        "Members of {} ({} by {}):",
        group.bright_green().bold(),
        members.len(),
        config.directory.member_attribute.cyan()
    );
    if members.is_empty() {
        println!("  {}", "(no members with an identifier)".dimmed());
    }
    for member in members.sorted() {
        println!("  {}", member);
    }

    Ok(())
}

pub async fn handle_accounts_command(args: AccountsCommands, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, &Overrides::default())?;
    let source = PostgresAccountSource::new(&config.database, config.accounts.clone());

    // Database errors are always fatal here; there is nothing to degrade to
    if args.raw {
        let raw = source
            .fetch_raw_names()
            .await
            .context("Failed to read database accounts")?;
        println!("Raw catalog accounts ({}):", raw.len());
        for name in &raw {
            let marker = if config.accounts.is_excluded(name) {
                " (excluded)".dimmed().to_string()
            } else {
                String::new()
            };
            println!("  {}{}", name, marker);
        }
        println!();
    }

    let accounts = source
        .fetch_accounts()
        .await
        .context("Failed to read database accounts")?;

    println!(
        "Accounts in {} after exclusions ({}):",
        config.database.name.bright_green().bold(),
        accounts.len()
    );
    if accounts.is_empty() {
        println!("  {}", "(no accounts)".dimmed());
    }
    for account in accounts.iter() {
        println!("  {}", account);
    }

    Ok(())
}
