//! `access-audit config`

pub mod handler;

use clap::Args;

pub use handler::handle_config_command;

#[derive(Args, Debug, Clone)]
pub struct ConfigCommands {
    /// Print the default config file location and exit
    #[arg(long)]
    pub path: bool,
}
