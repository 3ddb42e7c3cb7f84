use crate::error::Result;
use crate::types::{ReportLine, ReportRow};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tabled::{settings::Style, Table};
use tracing::debug;

pub const REPORT_HEADER: [&str; 5] = ["Border", "Date", "Measure", "Value", "Average"];

/// Write the header and one line per row, in the given order.
///
/// The header is written even when there are no rows.
pub fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(REPORT_HEADER)?;
    for r in rows {
        wtr.serialize(r.to_line())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[ReportRow]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    debug!(path = %path.display(), rows = rows.len(), "writing report");
    write_report(File::create(path)?, rows)
}

pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn render_preview(rows: &[ReportRow], max_rows: usize) -> String {
    let slice: Vec<ReportLine> = rows.iter().take(max_rows).map(ReportRow::to_line).collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}
