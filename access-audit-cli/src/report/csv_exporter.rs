//! CSV export of the comparison table

use anyhow::{Context, Result};
use csv::Writer;

use super::{ReportContext, ReportFormat, ReportRenderer};

pub struct CsvRenderer;

impl ReportRenderer for CsvRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }

    fn render(&self, context: &ReportContext<'_>) -> Result<String> {
        let mut wtr = Writer::from_writer(Vec::new());

        wtr.write_record(["account", "in_directory_group", "in_database", "status"])
            .context("Failed to write CSV header")?;

        for row in context.result.rows() {
            wtr.write_record([
                row.identifier.as_str(),
                bool_cell(row.in_directory_group),
                bool_cell(row.in_database),
                row.status.label(),
            ])
            .with_context(|| format!("Failed to write account: {}", row.identifier))?;
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
        String::from_utf8(bytes).context("CSV output was not valid UTF-8")
    }
}

fn bool_cell(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::Fixture;

    #[test]
    fn test_csv_rows() {
        let fixture = Fixture::new(&["alice"], &["alice", "carol"]);
        let csv = CsvRenderer.render(&fixture.context()).unwrap();

        assert_eq!(
            csv,
            "account,in_directory_group,in_database,status\n\
             alice,true,true,Valid account\n\
             carol,false,true,Needs to be deleted\n"
        );
    }

    #[test]
    fn test_csv_header_only_when_empty() {
        let fixture = Fixture::new(&["eve"], &[]);
        let csv = CsvRenderer.render(&fixture.context()).unwrap();

        assert_eq!(csv, "account,in_directory_group,in_database,status\n");
    }

    #[test]
    fn test_csv_quotes_awkward_names() {
        let fixture = Fixture::new(&[], &["svc,reporting"]);
        let csv = CsvRenderer.render(&fixture.context()).unwrap();

        assert!(csv.contains("\"svc,reporting\",false,true,Needs to be deleted\n"));
    }
}
