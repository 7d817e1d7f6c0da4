mod api;
mod cli;
mod config;
mod database;
mod error;
mod report;
mod services;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;

use cli::commands::{config as config_cmd, inspect, run};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine, the environment may already be set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    log::debug!("access-audit {}", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Run(args) => run::handle_run_command(args, config_path).await,
        Commands::Members(args) => inspect::handle_members_command(args, config_path).await,
        Commands::Accounts(args) => inspect::handle_accounts_command(args, config_path).await,
        Commands::Config(args) => config_cmd::handle_config_command(args, config_path),
    }
}

/// `RUST_LOG` wins over `-v`
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}
