use std::io::{self, Write};

use serde_json::{json, Value};
use tvscan_core::ScreenerResult;

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

const CELL_WIDTH: usize = 15;
const TABLE_HEADERS: [&str; 5] = ["Symbol", "Name", "Close", "Volume", "Market Cap"];

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_output(&mut out, output, format, pretty)?;
    out.flush()?;
    Ok(())
}

pub fn write_output(
    out: &mut impl Write,
    output: &CommandOutput,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match (output, format) {
        (CommandOutput::Request(body), _) => {
            let value: Value = serde_json::from_str(body)?;
            write_json(out, &value, pretty)
        }
        (CommandOutput::Scan { result, .. }, OutputFormat::Json) => write_json(out, result, pretty),
        (CommandOutput::Scan { columns, result }, OutputFormat::Table) => {
            write_scan_table(out, columns, result)
        }
        (CommandOutput::Columns(entries), OutputFormat::Json) => {
            let value: Vec<Value> = entries
                .iter()
                .map(|(label, field)| json!({ "label": label, "field": field }))
                .collect();
            write_json(out, &value, pretty)
        }
        (CommandOutput::Columns(entries), OutputFormat::Table) => {
            let width = entries
                .iter()
                .map(|(label, _)| label.len())
                .max()
                .unwrap_or(0);
            for (label, field) in entries {
                writeln!(out, "{label:<width$}  {field}")?;
            }
            Ok(())
        }
    }
}

fn write_json<T: serde::Serialize + ?Sized>(
    out: &mut impl Write,
    value: &T,
    pretty: bool,
) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{payload}")?;
    Ok(())
}

fn write_scan_table(
    out: &mut impl Write,
    columns: &[String],
    result: &ScreenerResult,
) -> Result<(), CliError> {
    writeln!(out, "Found {} results:", result.total_count)?;
    writeln!(out)?;

    let mut header = String::new();
    for title in TABLE_HEADERS.iter().take(columns.len() + 1) {
        header.push_str(&format!("{title:<CELL_WIDTH$}"));
    }
    writeln!(out, "{}", header.trim_end())?;
    writeln!(out, "{}", "-".repeat(CELL_WIDTH * TABLE_HEADERS.len()))?;

    for row in &result.rows {
        let mut line = format!("{:<CELL_WIDTH$}", row.symbol);
        for index in 0..columns.len() {
            let cell = row.values.get(index).map(cell_text).unwrap_or_default();
            line.push_str(&format!("{cell:<CELL_WIDTH$}"));
        }
        writeln!(out, "{}", line.trim_end())?;
    }

    Ok(())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
