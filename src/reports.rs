use crate::aggregate::{Averages, Totals};
use crate::loader::LoadReport;
use crate::types::{ReportRow, RunSummary};

/// Join totals with their averages, newest first.
///
/// Rows are ordered by the reverse of [`ReportRow`]'s natural order
/// (year, month, value, measure, border).
pub fn build_report(totals: &Totals, averages: &Averages) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = totals
        .iter()
        .map(|(key, value)| ReportRow {
            key: key.clone(),
            value: *value,
            average: averages.get(key).copied().unwrap_or(0),
        })
        .collect();
    rows.sort_unstable_by(|a, b| b.cmp(a));
    rows
}

pub fn generate_summary(load: &LoadReport, totals: &Totals, rows: &[ReportRow]) -> RunSummary {
    RunSummary {
        input_rows: load.total_rows,
        distinct_keys: totals.len(),
        total_crossings: totals.values().map(|v| *v as i128).sum(),
        report_rows: rows.len(),
    }
}
