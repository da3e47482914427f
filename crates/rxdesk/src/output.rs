//! Output formatting: table, JSON, YAML, CSV, plain.
//!
//! Renders records in the format selected by `--output`. Tables are built
//! from the entity's column set, so every format shows the same rows.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::{builder::Builder, settings::Style};

use rxdesk_core::{Column, Notice, NoticeLevel, Record, transfer};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render rows in the chosen format.
///
/// - `table` / `csv`: one column per entry in `columns`
/// - `json` / `json-compact` / `yaml`: the full records
/// - `plain`: one id per line
pub fn render_list(
    format: OutputFormat,
    columns: &[Column],
    rows: &[Record],
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(columns, rows)),
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            transfer::write_csv(columns, rows, &mut buf)?;
            String::from_utf8(buf).map_err(|e| CliError::Output(e.to_string()))
        }
        OutputFormat::Json => render_json(rows, false),
        OutputFormat::JsonCompact => render_json(rows, true),
        OutputFormat::Yaml => render_yaml(rows),
        OutputFormat::Plain => Ok(rows
            .iter()
            .map(|r| r.id().to_string())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render one record. Tables become a `Header: value` detail view with
/// the entity's columns first, then any remaining backend fields.
pub fn render_single(
    format: OutputFormat,
    columns: &[Column],
    record: &Record,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(detail(columns, record)),
        OutputFormat::Json => render_json(record, false),
        OutputFormat::JsonCompact => render_json(record, true),
        OutputFormat::Yaml => render_yaml(record),
        OutputFormat::Csv => render_list(format, columns, std::slice::from_ref(record)),
        OutputFormat::Plain => Ok(record.id().to_string()),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", output.trim_end_matches('\n'));
}

/// Print a notice to stderr. Errors still print under `--quiet`.
pub fn print_notice(notice: &Notice, quiet: bool, color: bool) {
    if quiet && notice.level != NoticeLevel::Error {
        return;
    }
    let line = match (notice.level, color) {
        (NoticeLevel::Success, true) => format!("{} {notice}", "✓".green()),
        (NoticeLevel::Info, true) => notice.to_string().dimmed().to_string(),
        (NoticeLevel::Error, true) => format!("{} {notice}", "✗".red()),
        (NoticeLevel::Success, false) => format!("✓ {notice}"),
        (NoticeLevel::Info, false) => notice.to_string(),
        (NoticeLevel::Error, false) => format!("✗ {notice}"),
    };
    eprintln!("{line}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table(columns: &[Column], rows: &[Record]) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.header.to_owned()));
    for row in rows {
        builder.push_record(columns.iter().map(|c| c.render(row)));
    }
    builder.build().with(Style::rounded()).to_string()
}

fn detail(columns: &[Column], record: &Record) -> String {
    let mut lines: Vec<(String, String)> = columns
        .iter()
        .map(|c| (c.header.to_owned(), c.render(record)))
        .collect();
    for (key, value) in record.fields() {
        if columns.iter().any(|c| c.key == key.as_str() || c.key.starts_with(&format!("{key}."))) {
            continue;
        }
        lines.push((key.clone(), scalar(value)));
    }

    let width = lines.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    lines
        .into_iter()
        .map(|(k, v)| {
            let label = format!("{k}:");
            format!("{label:<width$} {v}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".into(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    out.map_err(|e| CliError::Output(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Output(e.to_string()))
}
