//! HTML report rendered through an Askama template

use anyhow::{Context, Result};
use askama::Template;

use super::{ReportContext, ReportFormat, ReportRenderer};
use crate::services::reconcile::AccountStatus;

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate {
    pub group_name: String,
    pub database_name: String,
    pub generated_at: String,
    pub summary_lines: Vec<String>,
    pub database_degraded: Option<String>,
    pub rows: Vec<ReportRow>,
    pub to_delete: Vec<String>,
    pub excluded: Vec<String>,
}

pub struct ReportRow {
    pub identifier: String,
    pub in_directory_group: &'static str,
    pub in_database: &'static str,
    pub status: &'static str,
    /// CSS class for the status badge
    pub status_class: &'static str,
}

impl ReportTemplate {
    pub fn from_context(context: &ReportContext<'_>) -> Self {
        let rows = context
            .result
            .rows()
            .iter()
            .map(|row| ReportRow {
                identifier: row.identifier.to_string(),
                in_directory_group: if row.in_directory_group { "Yes" } else { "No" },
                in_database: if row.in_database { "Yes" } else { "No" },
                status: row.status.label(),
                status_class: match row.status {
                    AccountStatus::Valid => "status-valid",
                    AccountStatus::NeedsDeletion => "status-delete",
                },
            })
            .collect();

        Self {
            group_name: context.group_name.to_string(),
            database_name: context.database_name.to_string(),
            generated_at: context.summary.generated_at_display(),
            summary_lines: context.summary_lines(),
            database_degraded: context.database_degraded.map(str::to_string),
            rows,
            to_delete: context.result.to_delete().iter().map(|id| id.to_string()).collect(),
            excluded: context.excluded.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }

    fn render(&self, context: &ReportContext<'_>) -> Result<String> {
        ReportTemplate::from_context(context)
            .render()
            .context("Failed to render HTML report template")
    }
}
