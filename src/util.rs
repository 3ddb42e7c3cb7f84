// Parsing and arithmetic helpers.
//
// Field-level CSV cleanup lives here so the loader only deals with whole
// rows and the aggregator only sees typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse an integer count, trimming whitespace.
///
/// Returns `None` for missing, empty or non-integer text.
pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}

/// Parse a crossing date such as `03/01/2019 12:00:00 AM`.
///
/// Only the part before the first space is significant, so a bare
/// `MM/DD/YYYY` is accepted as well.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    let date_part = s.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, "%m/%d/%Y").ok()
}

/// Arithmetic mean rounded up to the next integer; 0 for an empty slice.
pub fn ceil_mean(v: &[i64]) -> i64 {
    if v.is_empty() {
        return 0;
    }
    // i128 holds the sum of any i64 slice that fits in memory.
    let sum: i128 = v.iter().map(|x| *x as i128).sum();
    let n = v.len() as i128;
    let q = sum.div_euclid(n) + i128::from(sum.rem_euclid(n) != 0);
    // The mean of i64 values rounded up stays within i64.
    q as i64
}

/// First day of the month at midnight, e.g. `03/01/2019 12:00:00 AM`.
pub fn format_report_date(month: u32, year: i32) -> String {
    format!("{:02}/01/{} 12:00:00 AM", month, year)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Console counts only, e.g. `386,449 rows`.
    n.to_formatted_string(&Locale::en)
}
