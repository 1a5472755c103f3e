//! Grouping primitives shared by both pipelines.
//!
//! Groups are keyed through a `BTreeMap`, so equal keys always collapse into one
//! group and output order is the key order. A group only exists once a row has
//! landed in it; empty groups can therefore never reach a series.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::Record;

/// How a group's values are reduced to one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Sum,
}

impl Reducer {
    fn finish(self, sum: f64, count: usize) -> Option<f64> {
        if count == 0 {
            return None;
        }
        match self {
            Reducer::Sum => Some(sum),
            Reducer::Mean => Some(sum / count as f64),
        }
    }
}

/// Group `rows` by `key` and reduce `value` within each group.
pub fn group_by<'a, K, I, FK, FV>(rows: I, key: FK, value: FV, reducer: Reducer) -> Vec<(K, f64)>
where
    K: Ord,
    I: IntoIterator<Item = &'a Record>,
    FK: Fn(&Record) -> K,
    FV: Fn(&Record) -> f64,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let acc = groups.entry(key(row)).or_insert((0.0, 0));
        acc.0 += value(row);
        acc.1 += 1;
    }

    groups
        .into_iter()
        .filter_map(|(k, (sum, count))| reducer.finish(sum, count).map(|v| (k, v)))
        .collect()
}

/// Totally ordered wrapper so rates can key a `BTreeMap`.
#[derive(Debug, Clone, Copy)]
pub struct RateKey(pub f64);

impl PartialEq for RateKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RateKey {}

impl PartialOrd for RateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::testing::record;

    #[test]
    fn equal_keys_form_one_group() {
        let rows = vec![
            record(2001, 1, "Sports", 10.0),
            record(2001, 2, "Sports", 20.0),
            record(2002, 1, "Sports", 40.0),
        ];
        let mean = group_by(&rows, |r| r.year, |r| r.automobile_sales, Reducer::Mean);
        assert_eq!(mean, vec![(2001, 15.0), (2002, 40.0)]);

        let sum = group_by(&rows, |r| r.year, |r| r.automobile_sales, Reducer::Sum);
        assert_eq!(sum, vec![(2001, 30.0), (2002, 40.0)]);
    }

    #[test]
    fn no_rows_means_no_groups() {
        let rows: Vec<Record> = Vec::new();
        let out = group_by(&rows, |r| r.vehicle_type.clone(), |r| r.automobile_sales, Reducer::Sum);
        assert!(out.is_empty());
    }

    #[test]
    fn rate_keys_order_numerically() {
        let mut keys = vec![RateKey(5.5), RateKey(2.25), RateKey(10.0), RateKey(2.25)];
        keys.sort();
        keys.dedup();
        let values: Vec<f64> = keys.iter().map(|k| k.0).collect();
        assert_eq!(values, vec![2.25, 5.5, 10.0]);
    }
}
