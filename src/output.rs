//! Terminal output for headless runs.
//!
//! Formats a [`RenderModel`] as a plain text report or as JSON.

use crate::cli::OutputFormat;
use crate::query::RenderModel;

/// Formats render models for the terminal.
pub struct QueryOutput {
    format: OutputFormat,
}

impl QueryOutput {
    /// Creates a new output formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the model according to the configured format.
    pub fn format(&self, model: &RenderModel) -> String {
        match self.format {
            OutputFormat::Text => format_text(model),
            OutputFormat::Json => format_json(model),
        }
    }
}

/// Formats the query names, one per line.
pub fn format_query_list(names: &[&str]) -> String {
    let mut output = names.join("\n");
    output.push('\n');
    output
}

fn format_text(model: &RenderModel) -> String {
    let mut output = String::new();

    if let Some(name) = &model.query_name {
        output.push_str(&format!("== {name} ==\n"));
    }
    if let Some(explanation) = &model.explanation {
        output.push_str(explanation);
        output.push('\n');
    }
    if let Some(sql) = &model.sql {
        output.push('\n');
        output.push_str(sql.trim());
        output.push_str("\n\n");
    }

    if let Some(error) = &model.error {
        output.push_str(&format!("Error: {error}\n"));
        return output;
    }

    let rows: Vec<Vec<String>> = model
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_display_string()).collect())
        .collect();
    let table = format_table(&model.column_names, &rows);
    if !table.is_empty() {
        output.push_str(&table);
        output.push_str("\n\n");
    }

    let row_label = if rows.len() == 1 { "row" } else { "rows" };
    match model.elapsed_seconds {
        Some(seconds) => output.push_str(&format!(
            "{} {row_label} | Execution time: {seconds:.2} seconds\n",
            rows.len()
        )),
        None => output.push_str(&format!("{} {row_label}\n", rows.len())),
    }

    if let Some(chart) = &model.chart {
        output.push_str(&format!(
            "Chart: {} ({} by {})\n",
            chart.title, chart.y_field, chart.x_field
        ));
    }

    output
}

fn format_json(model: &RenderModel) -> String {
    serde_json::to_string_pretty(model)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {}\"}}", e))
}

/// Formats a table as aligned text.
fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    output.push_str(&header_line.join(" │ "));
    output.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    output.push_str(&separator.join("─┼─"));
    output.push('\n');

    for row in rows {
        let row_line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = width)
            })
            .collect();
        output.push_str(row_line.join(" │ ").trim_end());
        output.push('\n');
    }

    output.trim_end().to_string()
}
