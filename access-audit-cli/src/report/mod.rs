//! Report rendering and delivery
//!
//! Every renderer reads the same [`ReportContext`] and produces the full
//! artifact as a string. Writing files and console output live in
//! [`delivery`].

pub mod csv_exporter;
pub mod delivery;
pub mod html;
pub mod json;
pub mod text;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::Config;
use crate::services::RunOutcome;
use crate::services::reconcile::{ReconciliationResult, SummaryFacts};

/// Artifact formats a run can produce
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Html,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    /// Formats written when none are configured
    pub fn defaults() -> Vec<ReportFormat> {
        vec![ReportFormat::Text, ReportFormat::Html]
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Text => "text",
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "html" => Ok(ReportFormat::Html),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!(
                "unknown report format '{}' (expected text, html, csv or json)",
                other
            )),
        }
    }
}

/// Everything a renderer may show about one run
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub result: &'a ReconciliationResult,
    pub summary: &'a SummaryFacts,
    pub group_name: &'a str,
    pub database_name: &'a str,
    /// Excluded account names, sorted
    pub excluded: Vec<&'a str>,
    /// Set when the database could not be read and the run continued
    pub database_degraded: Option<&'a str>,
}

impl<'a> ReportContext<'a> {
    pub fn new(outcome: &'a RunOutcome, config: &'a Config) -> Self {
        Self {
            result: &outcome.result,
            summary: &outcome.summary,
            group_name: &config.directory.group_name,
            database_name: &config.database.name,
            excluded: config.accounts.excluded.iter().map(String::as_str).collect(),
            database_degraded: outcome.database_degraded.as_deref(),
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        self.summary.lines(self.group_name)
    }
}

/// One output format
pub trait ReportRenderer {
    fn format(&self) -> ReportFormat;

    fn render(&self, context: &ReportContext<'_>) -> Result<String>;
}

pub fn renderer_for(format: ReportFormat) -> Box<dyn ReportRenderer> {
    match format {
        ReportFormat::Text => Box::new(text::TextRenderer),
        ReportFormat::Html => Box::new(html::HtmlRenderer),
        ReportFormat::Csv => Box::new(csv_exporter::CsvRenderer),
        ReportFormat::Json => Box::new(json::JsonRenderer),
    }
}

/// A rendered artifact, not yet written anywhere
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub format: ReportFormat,
    pub content: String,
}

/// Render each requested format once, in the order given
pub fn render_all(formats: &[ReportFormat], context: &ReportContext<'_>) -> Result<Vec<RenderedReport>> {
    let mut rendered = Vec::with_capacity(formats.len());
    for format in formats {
        if rendered.iter().any(|r: &RenderedReport| r.format == *format) {
            continue;
        }
        let renderer = renderer_for(*format);
        let content = renderer.render(context)?;
        log::debug!("Rendered {} report ({} bytes)", format, content.len());
        rendered.push(RenderedReport {
            format: renderer.format(),
            content,
        });
    }
    Ok(rendered)
}
