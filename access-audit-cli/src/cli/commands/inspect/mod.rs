//! `access-audit members` and `access-audit accounts`
//!
//! Read one side of the comparison and print it, without reconciling.

pub mod handler;

use clap::Args;

use crate::config::Overrides;

pub use handler::{handle_accounts_command, handle_members_command};

#[derive(Args, Debug, Clone)]
pub struct MembersCommands {
    /// Directory group display name (overrides AZURE_GROUP_NAME)
    #[arg(short, long)]
    pub group: Option<String>,
}

impl MembersCommands {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            group_name: self.group.clone(),
            ..Overrides::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AccountsCommands {
    /// Also list the raw catalog names before exclusions and prefix rules
    #[arg(long)]
    pub raw: bool,
}
