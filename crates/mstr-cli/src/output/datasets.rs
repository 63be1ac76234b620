//! Dataset definition, instance, and filter output formatting.

use mstr_api_rs::models::{DatasetDefinition, DatasetResults};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use super::helpers::{cell_text, header_line, truncate_str};

/// Widest a result column gets in table output.
const MAX_COLUMN_WIDTH: usize = 30;

/// JSON output structure for an attribute.
#[derive(Serialize)]
pub struct AttributeOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub forms: Vec<FormOutput<'a>>,
}

/// JSON output structure for an attribute form.
#[derive(Serialize)]
pub struct FormOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<&'a str>,
}

/// JSON output structure for a metric.
#[derive(Serialize)]
pub struct MetricOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub is_derived: bool,
}

/// JSON output structure for a dataset definition.
#[derive(Serialize)]
pub struct DefinitionOutput<'a> {
    pub attributes: Vec<AttributeOutput<'a>>,
    pub metrics: Vec<MetricOutput<'a>>,
}

/// Formats a dataset definition as JSON.
pub fn format_definition_json(definition: &DatasetDefinition) -> Result<String, serde_json::Error> {
    let output = DefinitionOutput {
        attributes: definition
            .attributes
            .iter()
            .map(|a| AttributeOutput {
                id: a.id(),
                name: a.name(),
                forms: a
                    .forms
                    .iter()
                    .map(|f| FormOutput {
                        id: &f.id,
                        name: &f.name,
                        data_type: f.data_type.as_deref(),
                    })
                    .collect(),
            })
            .collect(),
        metrics: definition
            .metrics
            .iter()
            .map(|m| MetricOutput {
                id: m.id(),
                name: m.name(),
                is_derived: m.is_derived,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a dataset definition for display.
///
/// Each form is listed as the `Attribute@Form` name used in filters.
pub fn format_definition(definition: &DatasetDefinition, use_colors: bool) -> String {
    let mut output = section("Attributes", use_colors);
    if definition.attributes.is_empty() {
        output.push_str("  (none)\n");
    }
    for attribute in &definition.attributes {
        output.push_str(&format!("  {:<32}  {}\n", attribute.id(), attribute.name()));
        for form in &attribute.forms {
            let reference = format!("{}@{}", attribute.name(), form.name);
            output.push_str(&format!(
                "    {:<30} {}\n",
                reference,
                form.data_type.as_deref().unwrap_or("")
            ));
        }
    }

    output.push('\n');
    output.push_str(&section("Metrics", use_colors));
    if definition.metrics.is_empty() {
        output.push_str("  (none)\n");
    }
    for metric in &definition.metrics {
        let derived = if metric.is_derived { " (derived)" } else { "" };
        output.push_str(&format!("  {:<32}  {}{}\n", metric.id(), metric.name(), derived));
    }

    output
}

fn section(title: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", title.green().bold())
    } else {
        format!("{title}\n")
    }
}

/// Formats instance rows as JSON.
pub fn format_rows_json(results: &DatasetResults) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}

/// Formats instance rows as a table.
///
/// Columns follow the key order of the first row.
pub fn format_rows_table(results: &DatasetResults, use_colors: bool) -> String {
    let Some(first) = results.rows.first() else {
        return "No rows.\n".to_string();
    };
    let columns: Vec<&String> = first.keys().collect();

    let cells: Vec<Vec<String>> = results
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| truncate_str(&cell_text(row.get(*c).unwrap_or(&Value::Null)), MAX_COLUMN_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.chars().count().min(MAX_COLUMN_WIDTH)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |values: Vec<String>| -> String {
        let line: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect();
        line.join("  ").trim_end().to_string()
    };

    let header = render(
        columns
            .iter()
            .map(|c| truncate_str(c, MAX_COLUMN_WIDTH))
            .collect(),
    );
    let mut output = header_line(&header, use_colors);
    for row in cells {
        output.push_str(&render(row));
        output.push('\n');
    }
    output
}

/// Formats a view filter body as pretty JSON.
pub fn format_view_filter(body: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(body)
}
