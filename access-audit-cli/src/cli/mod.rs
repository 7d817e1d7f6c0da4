//! Command-line interface definition

pub mod commands;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use commands::config::ConfigCommands;
use commands::inspect::{AccountsCommands, MembersCommands};
use commands::run::RunCommands;

#[derive(Parser, Debug)]
#[command(
    name = "access-audit",
    version,
    about = "Compare PostgreSQL accounts against an Azure AD group and report accounts to delete"
)]
pub struct Cli {
    /// Path to a TOML config file (default: <config dir>/access-audit/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full reconciliation and write reports
    Run(RunCommands),
    /// List the normalized members of the directory group
    Members(MembersCommands),
    /// List the normalized database accounts after exclusions
    Accounts(AccountsCommands),
    /// Validate configuration and print it with secrets redacted
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportFormat;

    #[test]
    fn test_parse_run_with_formats() {
        let cli = Cli::try_parse_from([
            "access-audit",
            "run",
            "--group",
            "DB Users",
            "--format",
            "csv,json",
            "--timestamped",
            "--strict-database",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.group.as_deref(), Some("DB Users"));
                assert_eq!(args.format, vec![ReportFormat::Csv, ReportFormat::Json]);
                assert!(args.timestamped);
                assert!(args.strict_database);
                assert!(!args.no_write);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["access-audit", "config", "-vv", "--config", "audit.toml"]).unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("audit.toml")));
        assert!(matches!(cli.command, Commands::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["access-audit", "run", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
