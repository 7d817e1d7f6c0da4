//! Plain-text report with a grid table

use anyhow::Result;
use unicode_width::UnicodeWidthStr;

use super::{ReportContext, ReportFormat, ReportRenderer};

pub const TABLE_HEADERS: [&str; 4] = ["Database Account", "In Directory Group", "In Database", "Status"];

pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, context: &ReportContext<'_>) -> Result<String> {
        let mut out = String::new();

        let title = format!(
            "Account Synchronization Report for group '{}' on database '{}'",
            context.group_name, context.database_name
        );
        out.push_str(&title);
        out.push('\n');
        out.push_str(&"=".repeat(title.width().max(70)));
        out.push_str("\n\n");

        push_heading(&mut out, "Summary:");
        for line in context.summary_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        if let Some(reason) = context.database_degraded {
            out.push_str(&format!(
                "WARNING: database accounts could not be read ({}); the comparison is incomplete\n",
                reason
            ));
        }
        out.push('\n');

        push_heading(&mut out, "Account Comparison:");
        let rows: Vec<[String; 4]> = context
            .result
            .rows()
            .iter()
            .map(|row| {
                [
                    row.identifier.to_string(),
                    yes_no(row.in_directory_group).to_string(),
                    yes_no(row.in_database).to_string(),
                    row.status.label().to_string(),
                ]
            })
            .collect();
        out.push_str(&grid_table(&TABLE_HEADERS, &rows));
        out.push('\n');

        let to_delete = context.result.to_delete();
        if to_delete.is_empty() {
            out.push_str("No accounts need to be deleted from the database.\n");
        } else {
            out.push_str("Accounts that need to be deleted from the database:\n");
            for account in to_delete {
                out.push_str(&format!("- {}\n", account));
            }
        }

        out.push('\n');
        push_heading(&mut out, "Excluded default accounts:");
        out.push_str(&format!("Total excluded: {}\n", context.excluded.len()));
        for account in &context.excluded {
            out.push_str(&format!("- {}\n", account));
        }

        Ok(out)
    }
}

fn push_heading(out: &mut String, heading: &str) {
    out.push_str(heading);
    out.push('\n');
    out.push_str(&"-".repeat(heading.width()));
    out.push('\n');
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Grid layout with `=` under the header and `-` between rows
pub fn grid_table<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut table = border_line(&widths, '-');
    table.push_str(&cell_line(headers, &widths));
    table.push_str(&border_line(&widths, '='));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        table.push_str(&cell_line(&cells, &widths));
        table.push_str(&border_line(&widths, '-'));
    }
    table
}

fn border_line(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat_n(fill, width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn cell_line(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
        line.push_str(" |");
    }
    line.push('\n');
    line
}
