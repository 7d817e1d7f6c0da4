//! Machine-readable JSON report

use anyhow::{Context, Result};
use serde::Serialize;

use super::{ReportContext, ReportFormat, ReportRenderer};
use crate::services::reconcile::{Identifier, ReconciliationRow, SummaryFacts};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    group_name: &'a str,
    database_name: &'a str,
    summary: &'a SummaryFacts,
    rows: &'a [ReconciliationRow],
    to_delete: Vec<&'a Identifier>,
    excluded: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    database_degraded: Option<&'a str>,
}

pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(&self, context: &ReportContext<'_>) -> Result<String> {
        let report = JsonReport {
            group_name: context.group_name,
            database_name: context.database_name,
            summary: context.summary,
            rows: context.result.rows(),
            to_delete: context.result.to_delete().iter().collect(),
            excluded: &context.excluded,
            database_degraded: context.database_degraded,
        };

        serde_json::to_string_pretty(&report).context("Failed to format JSON report")
    }
}
