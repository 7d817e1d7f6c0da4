pub mod config;
pub mod inspect;
pub mod run;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{Config, Overrides};

/// Resolve configuration for a command, with the file path in the error
pub(crate) fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config> {
    Config::load(path, overrides).context("Invalid configuration")
}
