//! Per-key totals and trailing same-year averages.
//!
//! Averages are always derived from a finished [`Totals`] map: whether an
//! earlier month counts depends on which months exist for that year, which
//! is only known once every record has been folded in.

use crate::error::{ReportError, Result};
use crate::types::{GroupKey, Record};
use crate::util::ceil_mean;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

pub type Totals = HashMap<GroupKey, i64>;
pub type Averages = HashMap<GroupKey, i64>;

fn add_total(sums: &mut Totals, key: GroupKey, value: i64) -> Result<()> {
    match sums.entry(key) {
        Entry::Occupied(mut e) => {
            let total = e
                .get()
                .checked_add(value)
                .ok_or_else(|| ReportError::Overflow(e.key().clone()))?;
            *e.get_mut() = total;
        }
        Entry::Vacant(e) => {
            e.insert(value);
        }
    }
    Ok(())
}

/// Sum record values per key. Fails if a key's total leaves the `i64` range.
pub fn compute_sums<I>(records: I) -> Result<Totals>
where
    I: IntoIterator<Item = Record>,
{
    try_compute_sums(records.into_iter().map(Ok))
}

/// Like [`compute_sums`] over a fallible stream. The first error is returned
/// and no partial totals escape.
pub fn try_compute_sums<I>(records: I) -> Result<Totals>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let mut sums = Totals::new();
    for r in records {
        let r = r?;
        add_total(&mut sums, r.key(), r.value)?;
    }
    Ok(sums)
}

/// Fold shard-local totals into `into` by per-key addition.
pub fn merge_totals(into: &mut Totals, other: Totals) -> Result<()> {
    for (key, value) in other {
        add_total(into, key, value)?;
    }
    Ok(())
}

/// Ceiling mean of the totals of every strictly earlier month of the same
/// year, border and measure. Months without data are skipped, not zeroed.
pub fn compute_averages(totals: &Totals) -> Averages {
    totals
        .keys()
        .map(|key| {
            let prev: Vec<i64> = (1..key.month)
                .filter_map(|m| totals.get(&key.with_month(m)).copied())
                .collect();
            (key.clone(), ceil_mean(&prev))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(border: &str, measure: &str, y: i32, m: u32, value: i64) -> Record {
        Record {
            port_name: "Port".to_string(),
            state: "ST".to_string(),
            port_code: "0".to_string(),
            border: border.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            measure: measure.to_string(),
            value,
        }
    }

    fn totals_of(entries: &[(u32, i64)]) -> Totals {
        entries
            .iter()
            .map(|(m, v)| (GroupKey::new(*m, 2020, "A", "M"), *v))
            .collect()
    }

    #[test]
    fn sums_are_order_independent() {
        let records = vec![
            rec("A", "M", 2020, 1, 10),
            rec("A", "M", 2020, 1, 5),
            rec("B", "M", 2020, 1, 3),
            rec("A", "N", 2020, 2, 8),
            rec("A", "M", 2020, 2, 1),
        ];
        let forward = compute_sums(records.clone()).unwrap();
        let backward = compute_sums(records.into_iter().rev()).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 4);
        assert_eq!(forward[&GroupKey::new(1, 2020, "A", "M")], 15);
    }

    #[test]
    fn negative_values_are_summed_as_is() {
        let totals = compute_sums(vec![rec("A", "M", 2020, 1, 10), rec("A", "M", 2020, 1, -4)]).unwrap();
        assert_eq!(totals[&GroupKey::new(1, 2020, "A", "M")], 6);
    }

    #[test]
    fn try_sums_stop_on_error() {
        let input: Vec<Result<Record>> = vec![
            Ok(rec("A", "M", 2020, 1, 10)),
            Err(ReportError::MalformedRecord {
                line: 3,
                reason: "boom".to_string(),
            }),
            Ok(rec("A", "M", 2020, 2, 10)),
        ];
        let err = try_compute_sums(input).unwrap_err();
        assert!(matches!(err, ReportError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn merged_shards_match_single_pass() {
        let all = vec![
            rec("A", "M", 2020, 1, 10),
            rec("A", "M", 2020, 2, 20),
            rec("A", "M", 2020, 1, 7),
            rec("B", "M", 2020, 3, 1),
        ];
        let mut merged = compute_sums(all[..2].to_vec()).unwrap();
        merge_totals(&mut merged, compute_sums(all[2..].to_vec()).unwrap()).unwrap();
        assert_eq!(merged, compute_sums(all).unwrap());
    }

    #[test]
    fn sum_past_i64_is_an_error() {
        let err = compute_sums(vec![
            rec("A", "Buses", 2020, 1, i64::MAX),
            rec("A", "Buses", 2020, 1, 1),
        ])
        .unwrap_err();
        match err {
            ReportError::Overflow(key) => assert_eq!(key, GroupKey::new(1, 2020, "A", "Buses")),
            other => panic!("expected Overflow, got {:?}", other),
        }
    }

    #[test]
    fn merge_past_i64_is_an_error() {
        let mut left = totals_of(&[(1, i64::MAX)]);
        let right = totals_of(&[(1, 1)]);
        assert!(matches!(merge_totals(&mut left, right), Err(ReportError::Overflow(_))));
    }

    #[test]
    fn average_of_huge_totals_does_not_overflow() {
        let totals = totals_of(&[(1, i64::MAX), (2, i64::MAX), (3, 0)]);
        let avgs = compute_averages(&totals);
        assert_eq!(avgs[&GroupKey::new(3, 2020, "A", "M")], i64::MAX);
    }

    #[test]
    fn average_rounds_up() {
        let totals = totals_of(&[(1, 10), (2, 11), (3, 0)]);
        let avgs = compute_averages(&totals);
        assert_eq!(avgs[&GroupKey::new(3, 2020, "A", "M")], 11);
    }

    #[test]
    fn missing_months_are_skipped() {
        let totals = totals_of(&[(1, 100), (3, 50)]);
        let avgs = compute_averages(&totals);
        assert_eq!(avgs[&GroupKey::new(3, 2020, "A", "M")], 100);
        assert_eq!(avgs[&GroupKey::new(1, 2020, "A", "M")], 0);
    }

    #[test]
    fn earliest_month_averages_to_zero() {
        let totals = totals_of(&[(6, 40), (9, 60)]);
        let avgs = compute_averages(&totals);
        assert_eq!(avgs[&GroupKey::new(6, 2020, "A", "M")], 0);
        assert_eq!(avgs[&GroupKey::new(9, 2020, "A", "M")], 40);
    }

    #[test]
    fn averages_do_not_cross_years_or_groups() {
        let mut totals = totals_of(&[(2, 10)]);
        totals.insert(GroupKey::new(1, 2019, "A", "M"), 500);
        totals.insert(GroupKey::new(12, 2019, "A", "M"), 500);
        totals.insert(GroupKey::new(1, 2020, "B", "M"), 500);
        totals.insert(GroupKey::new(1, 2020, "A", "N"), 500);
        let avgs = compute_averages(&totals);
        assert_eq!(avgs[&GroupKey::new(2, 2020, "A", "M")], 0);
        assert_eq!(avgs[&GroupKey::new(12, 2019, "A", "M")], 500);
    }

    #[test]
    fn one_average_per_total() {
        let totals = totals_of(&[(1, 10), (2, 20), (3, 30)]);
        let avgs = compute_averages(&totals);
        assert_eq!(avgs.len(), totals.len());
        assert_eq!(avgs[&GroupKey::new(1, 2020, "A", "M")], 0);
        assert_eq!(avgs[&GroupKey::new(2, 2020, "A", "M")], 10);
        assert_eq!(avgs[&GroupKey::new(3, 2020, "A", "M")], 15);
    }
}
