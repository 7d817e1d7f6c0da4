//! Run command handler

use anyhow::{Context, Result};
use chrono::Local;
use std::path::Path;
use std::time::Instant;

use super::RunCommands;
use crate::api::GraphClient;
use crate::cli::commands::load_config;
use crate::database::PostgresAccountSource;
use crate::report::{ReportContext, delivery, render_all};
use crate::services::{PipelineOptions, run_pipeline};

/// Full reconciliation: fetch, compare, print the summary, write reports
pub async fn handle_run_command(args: RunCommands, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, &args.overrides())?;

    let directory = GraphClient::from_config(&config.directory)
        .context("Failed to create directory client")?;
    let accounts = PostgresAccountSource::new(&config.database, config.accounts.clone());
    let options = PipelineOptions {
        group_name: config.directory.group_name.clone(),
        database_failure_policy: config.database.failure_policy,
    };

    let started = Instant::now();
    let now = Local::now();
    let outcome = run_pipeline(&directory, &accounts, &options, now)
        .await
        .context("Account synchronization failed")?;
    log::debug!(
        "Pipeline finished in {:.2}s",
        started.elapsed().as_secs_f64()
    );

    let context = ReportContext::new(&outcome, &config);
    delivery::print_summary(&context);

    if args.no_write {
        log::info!("--no-write given, skipping report files");
        return Ok(());
    }

    let reports = render_all(&config.report.formats, &context)?;
    let written = delivery::write_reports(&config.report, &reports, now)?;
    delivery::print_written(&written);

    Ok(())
}
