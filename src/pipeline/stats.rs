//! Statistical test suite - hypothesis tests over the dataset
//!
//! Three families of tests: a two-sample difference-of-means test, a
//! chi-square independence test over a contingency table, and Pearson
//! correlation between a numeric field and a binary outcome. Each test is
//! a pure function over the immutable dataset; a failure is scoped to that
//! one test call and never aborts the rest of the pipeline.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, StudentsT};
use thiserror::Error;

use super::fields::{BinaryField, GroupField, NumericField};
use super::store::Dataset;

/// Minimum observations per sample for the difference-of-means test
const MIN_SAMPLE_SIZE: usize = 2;

/// Minimum observations for a correlation t test (df = n - 2 must be positive)
const MIN_CORRELATION_SIZE: usize = 3;

/// Errors scoped to a single test call.
///
/// Callers catch these per test and skip the affected test; other tests
/// and aggregations proceed.
#[derive(Debug, Error)]
pub enum StatError {
    #[error("not enough observations for {test}: group '{group}' has {observations}, need at least {required}")]
    InsufficientSample {
        test: &'static str,
        group: String,
        observations: usize,
        required: usize,
    },

    #[error("degenerate contingency table for {rows} x {cols}: {reason}")]
    DegenerateTable {
        rows: &'static str,
        cols: &'static str,
        reason: String,
    },

    #[error("correlation of {pair} is undefined: a side has zero variance")]
    ZeroVariance { pair: String },

    #[error("failed to construct sampling distribution: {0}")]
    Distribution(String),
}

/// Which test produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    MeanDifference,
    Independence,
    Correlation,
}

/// Outcome of one statistical test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub kind: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
    /// True iff the p-value is strictly below the significance threshold
    pub significant: bool,
}

/// A test outcome labeled for presentation, as assembled by the caller
/// running a battery of tests.
#[derive(Debug)]
pub struct LabeledOutcome {
    pub label: String,
    pub outcome: Result<TestResult, StatError>,
}

/// Strict significance rule: the threshold itself is not significant.
pub fn is_significant(p_value: f64, alpha: f64) -> bool {
    p_value < alpha
}

/// Two-sample test of difference in means, split on a boolean field.
///
/// Uses Welch's unequal-variance formulation: it does not assume the two
/// samples share a variance, which is the safer default for observational
/// segments. Two-tailed p-value from Student's t with the
/// Welch-Satterthwaite degrees of freedom.
pub fn mean_difference_test(
    dataset: &Dataset,
    field: NumericField,
    split: BinaryField,
    alpha: f64,
) -> Result<TestResult, StatError> {
    let mut in_group: Vec<f64> = Vec::new();
    let mut out_group: Vec<f64> = Vec::new();
    for record in dataset.records() {
        if split.value_of(record) {
            in_group.push(field.value_of(record));
        } else {
            out_group.push(field.value_of(record));
        }
    }

    for (sample, label) in [(&in_group, "Yes"), (&out_group, "No")] {
        if sample.len() < MIN_SAMPLE_SIZE {
            return Err(StatError::InsufficientSample {
                test: "mean-difference",
                group: format!("{}={}", split.label(), label),
                observations: sample.len(),
                required: MIN_SAMPLE_SIZE,
            });
        }
    }

    let (n1, mean1, var1) = sample_moments(&in_group);
    let (n2, mean2, var2) = sample_moments(&out_group);
    let diff = mean1 - mean2;
    let se_squared = var1 / n1 + var2 / n2;

    let (statistic, p_value, df) = if se_squared > 0.0 {
        let statistic = diff / se_squared.sqrt();
        let df = se_squared * se_squared
            / ((var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0));
        let t_dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| StatError::Distribution(format!("StudentsT(df={}): {}", df, e)))?;
        let p_value = two_tailed(t_dist.cdf(statistic.abs()));
        (statistic, p_value, df)
    } else if diff == 0.0 {
        // both samples constant and equal: no evidence of a difference
        (0.0, 1.0, n1 + n2 - 2.0)
    } else {
        (f64::INFINITY * diff.signum(), 0.0, n1 + n2 - 2.0)
    };

    Ok(TestResult {
        kind: TestKind::MeanDifference,
        statistic,
        p_value,
        degrees_of_freedom: df,
        significant: is_significant(p_value, alpha),
    })
}

/// A cross-tabulation of counts for two categorical dimensions
#[derive(Debug, Clone, Serialize)]
pub struct ContingencyTable {
    pub row_field: GroupField,
    pub col_field: GroupField,
    /// Distinct row-field values in first-seen order
    pub row_labels: Vec<String>,
    /// Distinct column-field values in first-seen order
    pub col_labels: Vec<String>,
    /// `counts[i][j]` = records with row value i and column value j
    pub counts: Vec<Vec<usize>>,
}

impl ContingencyTable {
    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<usize> {
        let cols = self.col_labels.len();
        let mut totals = vec![0usize; cols];
        for row in &self.counts {
            for (j, &count) in row.iter().enumerate() {
                totals[j] += count;
            }
        }
        totals
    }

    pub fn grand_total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Expected cell frequency under independence:
    /// row_total * col_total / grand_total.
    pub fn expected(&self, row: usize, col: usize) -> f64 {
        let grand = self.grand_total() as f64;
        self.row_totals()[row] as f64 * self.col_totals()[col] as f64 / grand
    }
}

/// Cross-tabulate two categorical dimensions, rows and columns each in
/// first-seen order.
pub fn contingency_table(
    dataset: &Dataset,
    row_field: GroupField,
    col_field: GroupField,
) -> ContingencyTable {
    let mut row_labels: Vec<String> = Vec::new();
    let mut col_labels: Vec<String> = Vec::new();
    let mut counts: Vec<Vec<usize>> = Vec::new();

    for record in dataset.records() {
        let row_value = row_field.value_of(record);
        let col_value = col_field.value_of(record);

        let row = match row_labels.iter().position(|l| *l == row_value) {
            Some(i) => i,
            None => {
                row_labels.push(row_value);
                counts.push(vec![0; col_labels.len()]);
                row_labels.len() - 1
            }
        };

        let col = match col_labels.iter().position(|l| *l == col_value) {
            Some(j) => j,
            None => {
                col_labels.push(col_value);
                for row_counts in &mut counts {
                    row_counts.push(0);
                }
                col_labels.len() - 1
            }
        };

        counts[row][col] += 1;
    }

    ContingencyTable {
        row_field,
        col_field,
        row_labels,
        col_labels,
        counts,
    }
}

/// Chi-square test of independence between two categorical dimensions.
///
/// Yates' continuity correction is not applied. Degrees of freedom are
/// (rows - 1) * (cols - 1).
pub fn independence_test(
    dataset: &Dataset,
    field_a: GroupField,
    field_b: GroupField,
    alpha: f64,
) -> Result<TestResult, StatError> {
    let table = contingency_table(dataset, field_a, field_b);
    let rows = table.row_labels.len();
    let cols = table.col_labels.len();

    if rows < 2 || cols < 2 {
        return Err(StatError::DegenerateTable {
            rows: field_a.label(),
            cols: field_b.label(),
            reason: format!(
                "{} has {} distinct value(s), {} has {}; both need at least 2",
                field_a.label(),
                rows,
                field_b.label(),
                cols
            ),
        });
    }

    // cannot happen for a table built from real records, where every label
    // was observed at least once; guards a hand-built table
    let row_totals = table.row_totals();
    let col_totals = table.col_totals();
    if row_totals.iter().any(|&t| t == 0) || col_totals.iter().any(|&t| t == 0) {
        return Err(StatError::DegenerateTable {
            rows: field_a.label(),
            cols: field_b.label(),
            reason: "a row or column has an all-zero total".to_string(),
        });
    }

    let grand = table.grand_total() as f64;
    let mut chi_square = 0.0;
    for i in 0..rows {
        for j in 0..cols {
            let expected = row_totals[i] as f64 * col_totals[j] as f64 / grand;
            let observed = table.counts[i][j] as f64;
            chi_square += (observed - expected).powi(2) / expected;
        }
    }

    let df = ((rows - 1) * (cols - 1)) as f64;
    let chi_dist = ChiSquared::new(df)
        .map_err(|e| StatError::Distribution(format!("ChiSquared(df={}): {}", df, e)))?;
    let p_value = (1.0 - chi_dist.cdf(chi_square)).clamp(0.0, 1.0);

    Ok(TestResult {
        kind: TestKind::Independence,
        statistic: chi_square,
        p_value,
        degrees_of_freedom: df,
        significant: is_significant(p_value, alpha),
    })
}

/// Pearson correlation between a numeric field and a binary field encoded
/// as 0/1, via a single-pass Welford accumulation.
///
/// Returns `None` when either side has zero variance: the coefficient is
/// undefined there, and a silent NaN would poison downstream math.
pub fn correlation(dataset: &Dataset, numeric: NumericField, binary: BinaryField) -> Option<f64> {
    if dataset.is_empty() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for record in dataset.records() {
        let x = numeric.value_of(record);
        let y = if binary.value_of(record) { 1.0 } else { 0.0 };
        count += 1.0;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        var_x += dx * (x - mean_x);
        var_y += dy * (y - mean_y);
        cov_xy += dx * (y - mean_y);
    }

    let std_x = (var_x / count).sqrt();
    let std_y = (var_y / count).sqrt();

    if std_x == 0.0 || std_y == 0.0 {
        return None;
    }

    Some(cov_xy / (count * std_x * std_y))
}

/// Correlation wrapped in a `TestResult`, with a two-tailed p-value from
/// the exact transform t = r * sqrt((n - 2) / (1 - r^2)), df = n - 2.
pub fn correlation_test(
    dataset: &Dataset,
    numeric: NumericField,
    binary: BinaryField,
    alpha: f64,
) -> Result<TestResult, StatError> {
    let n = dataset.len();
    if n < MIN_CORRELATION_SIZE {
        return Err(StatError::InsufficientSample {
            test: "correlation",
            group: format!("{} vs {}", numeric.label(), binary.label()),
            observations: n,
            required: MIN_CORRELATION_SIZE,
        });
    }

    let r = correlation(dataset, numeric, binary).ok_or_else(|| StatError::ZeroVariance {
        pair: format!("{} vs {}", numeric.label(), binary.label()),
    })?;

    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    let (statistic, p_value) = if denom <= f64::EPSILON {
        // perfect correlation: the t statistic diverges
        (f64::INFINITY * r.signum(), 0.0)
    } else {
        let statistic = r * (df / denom).sqrt();
        let t_dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| StatError::Distribution(format!("StudentsT(df={}): {}", df, e)))?;
        (statistic, two_tailed(t_dist.cdf(statistic.abs())))
    };

    Ok(TestResult {
        kind: TestKind::Correlation,
        statistic,
        p_value,
        degrees_of_freedom: df,
        significant: is_significant(p_value, alpha),
    })
}

fn sample_moments(sample: &[f64]) -> (f64, f64, f64) {
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;
    let var = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (n, mean, var)
}

fn two_tailed(cdf_at_abs: f64) -> f64 {
    (2.0 * (1.0 - cdf_at_abs)).clamp(0.0, 1.0)
}
