//! Writing report artifacts and the console summary

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::*;
use std::fs;
use std::path::PathBuf;

use super::{RenderedReport, ReportContext, ReportFormat};
use crate::config::ReportConfig;

/// `<dir>/<stem>[_YYYYmmdd_HHMMSS].<ext>`
pub fn artifact_path(config: &ReportConfig, format: ReportFormat, now: DateTime<Local>) -> PathBuf {
    let file_name = if config.timestamped {
        format!(
            "{}_{}.{}",
            config.file_stem,
            now.format("%Y%m%d_%H%M%S"),
            format.extension()
        )
    } else {
        format!("{}.{}", config.file_stem, format.extension())
    };
    config.output_dir.join(file_name)
}

/// Write every rendered report, creating the output directory if needed.
/// Existing files with the same name are overwritten.
pub fn write_reports(
    config: &ReportConfig,
    reports: &[RenderedReport],
    now: DateTime<Local>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create report directory: {}",
            config.output_dir.display()
        )
    })?;

    let mut written = Vec::with_capacity(reports.len());
    for report in reports {
        let path = artifact_path(config, report.format, now);
        fs::write(&path, &report.content)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        log::info!("Wrote {} report to {}", report.format, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Human-readable outcome for terminals and CI logs
pub fn print_summary(context: &ReportContext<'_>) {
    println!("{}", "Account Synchronization Summary".bold());
    println!("{}", "-".repeat(31).dimmed());
    for line in context.summary_lines() {
        println!("  {}", line);
    }
    println!();

    if let Some(reason) = context.database_degraded {
        println!(
            "{} database accounts could not be read ({}); the comparison is incomplete",
            "Warning:".yellow().bold(),
            reason
        );
        println!();
    }

    let to_delete = context.result.to_delete();
    if to_delete.is_empty() {
        println!("{}", "No accounts need to be deleted.".bright_green());
    } else {
        println!(
            "{}",
            format!("{} account(s) need to be deleted:", to_delete.len())
                .bright_red()
                .bold()
        );
        for account in to_delete {
            println!("  - {}", account.as_str().red());
        }
    }
}

pub fn print_written(paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    println!();
    println!("Reports written:");
    for path in paths {
        println!("  {}", path.display().to_string().cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn report_config(dir: PathBuf, timestamped: bool) -> ReportConfig {
        ReportConfig {
            output_dir: dir,
            file_stem: "user_sync_report".to_string(),
            formats: ReportFormat::defaults(),
            timestamped,
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap()
    }

    #[test]
    fn test_artifact_path_plain_and_timestamped() {
        let plain = report_config(PathBuf::from("out"), false);
        assert_eq!(
            artifact_path(&plain, ReportFormat::Html, fixed_time()),
            PathBuf::from("out/user_sync_report.html")
        );

        let stamped = report_config(PathBuf::from("out"), true);
        assert_eq!(
            artifact_path(&stamped, ReportFormat::Text, fixed_time()),
            PathBuf::from("out/user_sync_report_20240301_093005.txt")
        );
    }

    #[test]
    fn test_write_reports_creates_directory() {
        let temp = TempDir::new().unwrap();
        let out_dir = temp.path().join("nested").join("reports");
        let config = report_config(out_dir.clone(), false);
        let reports = vec![
            RenderedReport {
                format: ReportFormat::Text,
                content: "text body".to_string(),
            },
            RenderedReport {
                format: ReportFormat::Csv,
                content: "account\n".to_string(),
            },
        ];

        let written = write_reports(&config, &reports, fixed_time()).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read_to_string(out_dir.join("user_sync_report.txt")).unwrap(),
            "text body"
        );
        assert_eq!(
            fs::read_to_string(out_dir.join("user_sync_report.csv")).unwrap(),
            "account\n"
        );
    }

    #[test]
    fn test_write_reports_overwrites_previous_run() {
        let temp = TempDir::new().unwrap();
        let config = report_config(temp.path().to_path_buf(), false);
        let first = [RenderedReport {
            format: ReportFormat::Json,
            content: "{\"run\": 1}".to_string(),
        }];
        let second = [RenderedReport {
            format: ReportFormat::Json,
            content: "{\"run\": 2}".to_string(),
        }];

        write_reports(&config, &first, fixed_time()).unwrap();
        write_reports(&config, &second, fixed_time()).unwrap();

        let content = fs::read_to_string(temp.path().join("user_sync_report.json")).unwrap();
        assert_eq!(content, "{\"run\": 2}");
    }
}
