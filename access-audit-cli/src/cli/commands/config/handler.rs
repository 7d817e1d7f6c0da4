//! Config command handler

use anyhow::Result;
use colored::*;
use std::path::Path;

use super::ConfigCommands;
use crate::cli::commands::load_config;
use crate::config::{Overrides, file};

/// Validate configuration and show the resolved values. No network or
/// database access.
pub fn handle_config_command(args: ConfigCommands, config_path: Option<&Path>) -> Result<()> {
    if args.path {
        match file::default_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine the user config directory"),
        }
        return Ok(());
    }

    let config = load_config(config_path, &Overrides::default())?;

    match config_path {
        Some(path) => println!("Config file: {}", path.display().to_string().cyan()),
        None => match file::default_path() {
            Some(path) if path.is_file() => {
                println!("Config file: {}", path.display().to_string().cyan())
            }
            _ => println!("Config file: {}", "none (environment only)".dimmed()),
        },
    }
    println!();

    let entries = config.describe();
    let key_width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in entries {
        println!("  {}  {}", format!("{:<width$}", key, width = key_width).bold(), value);
    }

    println!();
    println!("{}", "Configuration is valid".bright_green());
    Ok(())
}
