//! Table, Markdown, CSV and JSON rendering of engine results.

use crate::cli::OutputFormat;
use crate::columns::Column;
use anyhow::{anyhow, Result};
use backend::{GroupSummary, KillResult, MemorySummary, ProcessRecord};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;

/// Renders rows in one of the tabular formats. `Json` is handled by callers,
/// which serialize their own data instead of cell text.
fn render(headers: &[&str], rows: Vec<Vec<String>>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => to_csv(headers, &rows),
        OutputFormat::Markdown => {
            let mut table = Table::new();
            table.load_preset(ASCII_MARKDOWN).set_header(headers.to_vec());
            for row in rows {
                table.add_row(row);
            }
            Ok(table.to_string())
        }
        OutputFormat::Table | OutputFormat::Json => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(
                    headers
                        .iter()
                        .map(|h| Cell::new(h).fg(Color::Cyan))
                        .collect::<Vec<_>>(),
                );
            for row in rows {
                table.add_row(row);
            }
            Ok(table.to_string())
        }
    }
}

fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| anyhow!("failed to flush CSV output: {}", e.error()))?;
    Ok(String::from_utf8(data)?)
}

/// One row per process with the selected columns.
pub fn format_processes(
    procs: &[ProcessRecord],
    columns: &[Column],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(procs),
        OutputFormat::Csv => {
            let headers: Vec<&str> = columns.iter().map(Column::key).collect();
            let rows = procs
                .iter()
                .map(|p| columns.iter().map(|c| c.value(p)).collect())
                .collect();
            render(&headers, rows, format)
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            if procs.is_empty() {
                return Ok("No processes found.".to_string());
            }
            let headers: Vec<&str> = columns.iter().map(Column::header).collect();
            let rows = procs
                .iter()
                .map(|p| columns.iter().map(|c| c.display(p)).collect())
                .collect();
            render(&headers, rows, format)
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn format_groups(groups: &[GroupSummary], format: OutputFormat) -> Result<String> {
    if groups.is_empty() && format != OutputFormat::Csv {
        return Ok("No process groups found.".to_string());
    }
    let headers = ["Executable", "Count", "RAM (MB)", "PIDs"];
    let rows = groups
        .iter()
        .map(|group| {
            vec![
                group.key.clone(),
                group.count.to_string(),
                format!("{:.1}", group.total_rss_mb),
                group
                    .pids
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            ]
        })
        .collect();
    render(&headers, rows, format)
}

pub fn format_memory(mem: &MemorySummary, format: OutputFormat) -> Result<String> {
    let rows = vec![
        vec!["Total".to_string(), format!("{:.2} GB", mem.total_gb)],
        vec![
            "Used".to_string(),
            format!("{:.2} GB ({:.1}%)", mem.used_gb, mem.percent),
        ],
        vec!["Free".to_string(), format!("{:.2} GB", mem.free_gb)],
        vec![
            "Swap".to_string(),
            format!("{:.2} / {:.2} GB", mem.swap_used_gb, mem.swap_total_gb),
        ],
    ];
    render(&["Memory", "Value"], rows, format)
}

pub fn format_kill_results(results: &[KillResult]) -> String {
    results
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
