//! `access-audit run`

pub mod handler;

use clap::Args;
use std::path::PathBuf;

use crate::config::Overrides;
use crate::report::ReportFormat;

pub use handler::handle_run_command;

#[derive(Args, Debug, Clone)]
pub struct RunCommands {
    /// Directory group display name (overrides AZURE_GROUP_NAME)
    #[arg(short, long)]
    pub group: Option<String>,

    /// Directory for report files (overrides REPORT_DIR)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report formats to write, comma separated
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub format: Vec<ReportFormat>,

    /// Append a timestamp to report file names
    #[arg(long)]
    pub timestamped: bool,

    /// Fail the run when the database cannot be read
    #[arg(long)]
    pub strict_database: bool,

    /// Print the summary without writing report files
    #[arg(long)]
    pub no_write: bool,
}

impl RunCommands {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            group_name: self.group.clone(),
            output_dir: self.output_dir.clone(),
            formats: if self.format.is_empty() {
                None
            } else {
                Some(self.format.clone())
            },
            timestamped: self.timestamped,
            strict_database: self.strict_database,
        }
    }
}
