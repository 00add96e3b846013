//! Aggregation engine - churn rates across categorical segments

use std::cmp::Ordering;
use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;

use super::fields::{GroupField, NumericField};
use super::store::{CustomerRecord, Dataset};

/// Distinct-key count above which the report layer should warn about a
/// pathological category cardinality
pub const HIGH_CARDINALITY_WARN: usize = 200;

/// Churn statistics for one segment of the dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentAggregate {
    /// The grouping dimensions, in request order
    pub fields: Vec<GroupField>,
    /// One category value per grouping dimension
    pub key: Vec<String>,
    pub count: usize,
    pub churned: usize,
    /// `None` means "not applicable" (an empty segment), never 0
    pub churn_rate: Option<f64>,
}

/// Group the dataset on the Cartesian combination of the requested fields.
///
/// Key combinations appear in order of first appearance in the dataset.
/// Grouping by no fields yields a single whole-population segment; an empty
/// dataset yields an empty sequence.
pub fn aggregate(dataset: &Dataset, by: &[GroupField]) -> Vec<SegmentAggregate> {
    let mut segments: Vec<SegmentAggregate> = Vec::new();
    let mut positions: HashMap<Vec<String>, usize> = HashMap::new();

    for record in dataset.records() {
        let key: Vec<String> = by.iter().map(|field| field.value_of(record)).collect();
        let slot = match positions.get(&key) {
            Some(&slot) => slot,
            None => {
                positions.insert(key.clone(), segments.len());
                segments.push(SegmentAggregate {
                    fields: by.to_vec(),
                    key,
                    count: 0,
                    churned: 0,
                    churn_rate: None,
                });
                segments.len() - 1
            }
        };

        let segment = &mut segments[slot];
        segment.count += 1;
        if record.churned {
            segment.churned += 1;
        }
    }

    for segment in &mut segments {
        if segment.count > 0 {
            segment.churn_rate = Some(segment.churned as f64 / segment.count as f64);
        }
    }

    segments
}

/// Sort segments by churn rate. Not-applicable rates order after defined
/// ones in both directions; ties keep first-appearance order.
pub fn sort_by_rate(mut aggregates: Vec<SegmentAggregate>, descending: bool) -> Vec<SegmentAggregate> {
    aggregates.sort_by(|a, b| match (a.churn_rate, b.churn_rate) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    aggregates
}

/// Churn rate over the whole dataset; `None` for an empty dataset, since 0
/// would be misleading.
pub fn overall_rate(dataset: &Dataset) -> Option<f64> {
    if dataset.is_empty() {
        return None;
    }
    let churned = dataset.records().iter().filter(|r| r.churned).count();
    Some(churned as f64 / dataset.len() as f64)
}

/// Mean of a numeric field over the records matching the predicate; `None`
/// when the subset is empty.
pub fn filtered_mean<P>(dataset: &Dataset, predicate: P, field: NumericField) -> Option<f64>
where
    P: Fn(&CustomerRecord) -> bool,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for record in dataset.records().iter().filter(|r| predicate(r)) {
        sum += field.value_of(record);
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Churn rate over the records matching the predicate; `None` when the
/// subset is empty.
pub fn filtered_rate<P>(dataset: &Dataset, predicate: P) -> Option<f64>
where
    P: Fn(&CustomerRecord) -> bool,
{
    let mut churned = 0usize;
    let mut count = 0usize;
    for record in dataset.records().iter().filter(|r| predicate(r)) {
        if record.churned {
            churned += 1;
        }
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(churned as f64 / count as f64)
}

/// Run a single-field aggregation for each requested dimension in parallel.
///
/// Reads of the immutable dataset need no synchronization, so the fan-out
/// is a plain rayon map. Output order matches the requested field order.
pub fn segment_profile(
    dataset: &Dataset,
    fields: &[GroupField],
) -> Vec<(GroupField, Vec<SegmentAggregate>)> {
    fields
        .par_iter()
        .map(|&field| (field, aggregate(dataset, &[field])))
        .collect()
}

/// Whether an aggregation's distinct-key count warrants a cardinality
/// warning in the report.
pub fn high_cardinality(aggregates: &[SegmentAggregate]) -> bool {
    aggregates.len() > HIGH_CARDINALITY_WARN
}
