use crate::aggregate::{try_compute_sums, Totals};
use crate::error::{ReportError, Result};
use crate::types::{RawRow, Record};
use crate::util::{parse_date_safe, parse_i64_safe};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub distinct_keys: usize,
}

/// Lazily parses crossing records from a headed CSV source.
///
/// Yields an error and then stops at the first row that cannot be turned
/// into a [`Record`].
pub struct RecordStream<R> {
    rdr: Reader<R>,
    headers: StringRecord,
    row: StringRecord,
    failed: bool,
}

impl<R: io::Read> RecordStream<R> {
    pub fn new(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        Ok(RecordStream {
            rdr,
            headers,
            row: StringRecord::new(),
            failed: false,
        })
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        if !self.rdr.read_record(&mut self.row)? {
            return Ok(None);
        }
        let line = self.row.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawRow = self
            .row
            .deserialize(Some(&self.headers))
            .map_err(|e| malformed(line, e.to_string()))?;
        parse_row(raw, line).map(Some)
    }
}

impl<R: io::Read> Iterator for RecordStream<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_record() {
            Ok(rec) => rec.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

fn malformed(line: u64, reason: impl Into<String>) -> ReportError {
    ReportError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

fn parse_row(row: RawRow, line: u64) -> Result<Record> {
    let date = parse_date_safe(row.date.as_deref()).ok_or_else(|| {
        malformed(line, format!("unparseable Date {:?}", row.date.as_deref().unwrap_or("")))
    })?;
    let value = parse_i64_safe(row.value.as_deref()).ok_or_else(|| {
        malformed(line, format!("unparseable Value {:?}", row.value.as_deref().unwrap_or("")))
    })?;

    Ok(Record {
        port_name: row.port_name.unwrap_or_default(),
        state: row.state.unwrap_or_default(),
        port_code: row.port_code.unwrap_or_default(),
        border: row.border.unwrap_or_default(),
        date,
        measure: row.measure.unwrap_or_default(),
        value,
    })
}

/// Read every record from `reader` and fold it into per-key totals.
pub fn sum_reader<R: io::Read>(reader: R) -> Result<(Totals, LoadReport)> {
    let mut total_rows = 0usize;
    let stream = RecordStream::new(reader)?.inspect(|_| total_rows += 1);
    let totals = try_compute_sums(stream)?;
    let report = LoadReport {
        total_rows,
        distinct_keys: totals.len(),
    };
    debug!(rows = report.total_rows, keys = report.distinct_keys, "summed input");
    Ok((totals, report))
}

pub fn load_totals<P: AsRef<Path>>(path: P) -> Result<(Totals, LoadReport)> {
    let file = File::open(path.as_ref())?;
    sum_reader(file)
}
