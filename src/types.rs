use crate::util::format_report_date;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Port Name")]
    pub port_name: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Port Code")]
    pub port_code: Option<String>,
    #[serde(rename = "Border")]
    pub border: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Measure")]
    pub measure: Option<String>,
    #[serde(rename = "Value")]
    pub value: Option<String>,
}

/// One parsed crossing observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub port_name: String,
    pub state: String,
    pub port_code: String,
    pub border: String,
    pub date: NaiveDate,
    pub measure: String,
    pub value: i64,
}

impl Record {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.date.month(), self.date.year(), &self.border, &self.measure)
    }
}

/// Aggregation identity: one calendar month of one measure at one border.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub month: u32,
    pub year: i32,
    pub border: String,
    pub measure: String,
}

impl GroupKey {
    pub fn new(month: u32, year: i32, border: &str, measure: &str) -> Self {
        GroupKey {
            month,
            year,
            border: border.to_string(),
            measure: measure.to_string(),
        }
    }

    /// Same year, border and measure at a different month.
    pub fn with_month(&self, month: u32) -> Self {
        GroupKey {
            month,
            year: self.year,
            border: self.border.clone(),
            measure: self.measure.clone(),
        }
    }

    pub fn date_string(&self) -> String {
        format_report_date(self.month, self.year)
    }
}

/// A joined (key, total, trailing average) triple ready for sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub key: GroupKey,
    pub value: i64,
    pub average: i64,
}

impl Ord for ReportRow {
    // Ascending natural order; the report emits it reversed.
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .year
            .cmp(&other.key.year)
            .then_with(|| self.key.month.cmp(&other.key.month))
            .then_with(|| self.value.cmp(&other.value))
            .then_with(|| self.key.measure.cmp(&other.key.measure))
            .then_with(|| self.key.border.cmp(&other.key.border))
    }
}

impl PartialOrd for ReportRow {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ReportRow {
    pub fn to_line(&self) -> ReportLine {
        ReportLine {
            border: self.key.border.clone(),
            date: self.key.date_string(),
            measure: self.key.measure.clone(),
            value: self.value,
            average: self.average,
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ReportLine {
    #[serde(rename = "Border")]
    #[tabled(rename = "Border")]
    pub border: String,
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Measure")]
    #[tabled(rename = "Measure")]
    pub measure: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: i64,
    #[serde(rename = "Average")]
    #[tabled(rename = "Average")]
    pub average: i64,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub input_rows: usize,
    pub distinct_keys: usize,
    pub total_crossings: i128,
    pub report_rows: usize,
}
