//! Record store - cleaning raw rows into an immutable dataset
//!
//! This module turns raw string-valued row mappings into typed
//! `CustomerRecord`s: deduplication, strict churn-label mapping, required
//! field checks, and derived tenure/charge buckets. Problems found during
//! cleaning are collected as `DataQualityIssue`s, never thrown, so a run
//! always completes and reports what was excluded.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::config::AnalysisConfig;

/// A raw input row: field name to string value.
///
/// A missing value is either an absent key or an empty string. An ordered
/// map so that full-row equality (used for deduplication) is well defined.
pub type RawRow = BTreeMap<String, String>;

pub const COL_CUSTOMER_ID: &str = "customer_id";
pub const COL_GENDER: &str = "gender";
pub const COL_SENIOR_CITIZEN: &str = "senior_citizen";
pub const COL_PARTNER: &str = "partner";
pub const COL_TENURE_MONTHS: &str = "tenure_months";
pub const COL_MONTHLY_CHARGES: &str = "monthly_charges";
pub const COL_INTERNET_SERVICE: &str = "internet_service";
pub const COL_CONTRACT: &str = "contract";
pub const COL_PAYMENT_METHOD: &str = "payment_method";
pub const COL_ONLINE_SECURITY: &str = "online_security";
pub const COL_ONLINE_BACKUP: &str = "online_backup";
pub const COL_DEVICE_PROTECTION: &str = "device_protection";
pub const COL_TECH_SUPPORT: &str = "tech_support";
pub const COL_STREAMING_TV: &str = "streaming_tv";
pub const COL_STREAMING_MOVIES: &str = "streaming_movies";
pub const COL_CHURN: &str = "churn";

/// Churn labels are matched exactly and case-sensitively
const CHURN_YES: &str = "Yes";
const CHURN_NO: &str = "No";

/// Tenure bucket derived from `tenure_months`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TenureBucket {
    Months0To12,
    Months12To24,
    Months24To48,
    Months48Plus,
    /// Tenure outside the configured boundaries; flagged, not silently bucketed
    Unknown,
}

impl TenureBucket {
    fn from_bin(index: usize) -> Self {
        match index {
            0 => TenureBucket::Months0To12,
            1 => TenureBucket::Months12To24,
            2 => TenureBucket::Months24To48,
            _ => TenureBucket::Months48Plus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TenureBucket::Months0To12 => "0-12 months",
            TenureBucket::Months12To24 => "12-24 months",
            TenureBucket::Months24To48 => "24-48 months",
            TenureBucket::Months48Plus => "48+ months",
            TenureBucket::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TenureBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Charge tier derived from `monthly_charges`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChargeTier {
    Low,
    Medium,
    High,
    Premium,
    /// Charges outside the configured boundaries; flagged, not silently bucketed
    Unknown,
}

impl ChargeTier {
    fn from_bin(index: usize) -> Self {
        match index {
            0 => ChargeTier::Low,
            1 => ChargeTier::Medium,
            2 => ChargeTier::High,
            _ => ChargeTier::Premium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChargeTier::Low => "Low",
            ChargeTier::Medium => "Medium",
            ChargeTier::High => "High",
            ChargeTier::Premium => "Premium",
            ChargeTier::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ChargeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One cleaned customer row with derived fields, immutable after creation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub gender: String,
    pub senior_citizen: bool,
    pub partner: bool,
    pub tenure_months: u32,
    pub monthly_charges: f64,
    pub internet_service: String,
    pub contract: String,
    pub payment_method: String,
    pub online_security: bool,
    pub online_backup: bool,
    pub device_protection: bool,
    pub tech_support: bool,
    pub streaming_tv: bool,
    pub streaming_movies: bool,
    pub churned: bool,
    pub tenure_bucket: TenureBucket,
    pub charge_tier: ChargeTier,
}

/// An ordered, immutable sequence of cleaned records.
///
/// Every record in a dataset has all required fields and a valid churn flag;
/// downstream stages only read, never mutate.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CustomerRecord>,
}

impl Dataset {
    /// Build a dataset directly from already-cleaned records.
    pub fn from_records(records: Vec<CustomerRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Kind of a non-fatal defect found in a raw input row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A required field is absent, empty, or unparseable; the row is excluded
    MissingField,
    /// The churn label is not exactly "Yes" or "No"; the row is excluded
    InvalidChurnLabel,
    /// A numeric value falls outside the bucket boundaries; the row is kept
    /// with the affected bucket set to `Unknown`
    OutOfRange,
}

/// A non-fatal data quality defect, reported alongside the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataQualityIssue {
    /// Zero-based index of the row in the raw input
    pub row: usize,
    pub kind: IssueKind,
    /// Field the issue was found on, when it concerns a single field
    pub field: Option<String>,
    pub detail: String,
}

impl DataQualityIssue {
    fn missing(row: usize, field: &str, detail: String) -> Self {
        Self {
            row,
            kind: IssueKind::MissingField,
            field: Some(field.to_string()),
            detail,
        }
    }

    fn invalid_churn(row: usize, value: &str) -> Self {
        Self {
            row,
            kind: IssueKind::InvalidChurnLabel,
            field: Some(COL_CHURN.to_string()),
            detail: format!("churn label '{}' is not \"Yes\" or \"No\"", value),
        }
    }

    fn out_of_range(row: usize, field: &str, value: f64, bounds: &[f64]) -> Self {
        Self {
            row,
            kind: IssueKind::OutOfRange,
            field: Some(field.to_string()),
            detail: format!(
                "value {} is outside [{}, {}]; bucket set to unknown",
                value,
                bounds[0],
                bounds[bounds.len() - 1]
            ),
        }
    }
}

/// Outcome of a cleaning pass over the raw input
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    /// Issues found, in raw-row order
    pub issues: Vec<DataQualityIssue>,
    /// Exact-duplicate rows removed (first occurrence kept)
    pub duplicates_removed: usize,
    /// Raw rows seen, including duplicates
    pub rows_seen: usize,
    /// Rows that made it into the dataset
    pub rows_kept: usize,
}

impl CleanReport {
    /// Rows excluded for missing fields or invalid churn labels.
    pub fn rows_excluded(&self) -> usize {
        self.rows_seen - self.duplicates_removed - self.rows_kept
    }
}

/// Clean raw rows into a dataset, collecting data quality issues.
///
/// Rows are deduplicated by full-row equality (first occurrence wins).
/// Rows with a missing required field or an invalid churn label are
/// excluded; rows with out-of-range tenure or charges are kept with the
/// affected bucket set to `Unknown`. No I/O happens here.
pub fn build(raw_rows: &[RawRow], config: &AnalysisConfig) -> (Dataset, CleanReport) {
    let mut seen: HashSet<&RawRow> = HashSet::with_capacity(raw_rows.len());
    let mut records = Vec::with_capacity(raw_rows.len());
    let mut report = CleanReport {
        rows_seen: raw_rows.len(),
        ..Default::default()
    };

    for (index, row) in raw_rows.iter().enumerate() {
        if !seen.insert(row) {
            report.duplicates_removed += 1;
            continue;
        }

        match parse_record(index, row, config) {
            Ok((record, flagged)) => {
                report.issues.extend(flagged);
                records.push(record);
            }
            Err(issue) => report.issues.push(issue),
        }
    }

    report.rows_kept = records.len();
    (Dataset { records }, report)
}

/// Parse one raw row. `Err` excludes the row; `Ok` may still carry
/// out-of-range issues for kept-but-unbucketed values.
fn parse_record(
    index: usize,
    row: &RawRow,
    config: &AnalysisConfig,
) -> Result<(CustomerRecord, Vec<DataQualityIssue>), DataQualityIssue> {
    let customer_id = required(index, row, COL_CUSTOMER_ID)?.to_string();
    let gender = required(index, row, COL_GENDER)?.to_string();
    let senior_citizen = parse_flag(index, row, COL_SENIOR_CITIZEN)?;
    let partner = parse_flag(index, row, COL_PARTNER)?;
    let tenure_months = parse_tenure(index, row)?;
    let monthly_charges = parse_charges(index, row)?;
    let internet_service = required(index, row, COL_INTERNET_SERVICE)?.to_string();
    let contract = required(index, row, COL_CONTRACT)?.to_string();
    let payment_method = required(index, row, COL_PAYMENT_METHOD)?.to_string();
    let online_security = parse_flag(index, row, COL_ONLINE_SECURITY)?;
    let online_backup = parse_flag(index, row, COL_ONLINE_BACKUP)?;
    let device_protection = parse_flag(index, row, COL_DEVICE_PROTECTION)?;
    let tech_support = parse_flag(index, row, COL_TECH_SUPPORT)?;
    let streaming_tv = parse_flag(index, row, COL_STREAMING_TV)?;
    let streaming_movies = parse_flag(index, row, COL_STREAMING_MOVIES)?;
    let churned = parse_churn(index, row)?;

    let mut flagged = Vec::new();

    let tenure_bucket = match bin_index(tenure_months as f64, &config.tenure_bounds) {
        Some(bin) => TenureBucket::from_bin(bin),
        None => {
            flagged.push(DataQualityIssue::out_of_range(
                index,
                COL_TENURE_MONTHS,
                tenure_months as f64,
                &config.tenure_bounds,
            ));
            TenureBucket::Unknown
        }
    };

    let charge_tier = match bin_index(monthly_charges, &config.charge_bounds) {
        Some(bin) => ChargeTier::from_bin(bin),
        None => {
            flagged.push(DataQualityIssue::out_of_range(
                index,
                COL_MONTHLY_CHARGES,
                monthly_charges,
                &config.charge_bounds,
            ));
            ChargeTier::Unknown
        }
    };

    let record = CustomerRecord {
        customer_id,
        gender,
        senior_citizen,
        partner,
        tenure_months,
        monthly_charges,
        internet_service,
        contract,
        payment_method,
        online_security,
        online_backup,
        device_protection,
        tech_support,
        streaming_tv,
        streaming_movies,
        churned,
        tenure_bucket,
        charge_tier,
    };

    Ok((record, flagged))
}

fn required<'a>(index: usize, row: &'a RawRow, field: &str) -> Result<&'a str, DataQualityIssue> {
    match row.get(field) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DataQualityIssue::missing(
            index,
            field,
            format!("required field '{}' is missing or empty", field),
        )),
    }
}

/// Boolean service/demographic flags accept "Yes"/"No" and "1"/"0"
fn parse_flag(index: usize, row: &RawRow, field: &str) -> Result<bool, DataQualityIssue> {
    let value = required(index, row, field)?;
    match value {
        "Yes" | "1" => Ok(true),
        "No" | "0" => Ok(false),
        other => Err(DataQualityIssue::missing(
            index,
            field,
            format!("field '{}' has unparseable value '{}'", field, other),
        )),
    }
}

fn parse_tenure(index: usize, row: &RawRow) -> Result<u32, DataQualityIssue> {
    let value = required(index, row, COL_TENURE_MONTHS)?;
    value.parse::<u32>().map_err(|_| {
        DataQualityIssue::missing(
            index,
            COL_TENURE_MONTHS,
            format!("field '{}' has unparseable value '{}'", COL_TENURE_MONTHS, value),
        )
    })
}

fn parse_charges(index: usize, row: &RawRow) -> Result<f64, DataQualityIssue> {
    let value = required(index, row, COL_MONTHLY_CHARGES)?;
    match value.parse::<f64>() {
        Ok(charges) if charges.is_finite() => Ok(charges),
        _ => Err(DataQualityIssue::missing(
            index,
            COL_MONTHLY_CHARGES,
            format!(
                "field '{}' has unparseable value '{}'",
                COL_MONTHLY_CHARGES, value
            ),
        )),
    }
}

fn parse_churn(index: usize, row: &RawRow) -> Result<bool, DataQualityIssue> {
    let value = required(index, row, COL_CHURN)?;
    match value {
        CHURN_YES => Ok(true),
        CHURN_NO => Ok(false),
        other => Err(DataQualityIssue::invalid_churn(index, other)),
    }
}

/// Map a value to a bucket index via half-open interval membership.
///
/// A value exactly on an interior boundary belongs to the upper of the two
/// adjoining buckets; the top boundary closes the last bucket. Returns
/// `None` for values outside `[bounds[0], bounds[last]]`.
pub(crate) fn bin_index(value: f64, bounds: &[f64]) -> Option<usize> {
    let last = bounds.len() - 1;
    if value < bounds[0] || value > bounds[last] {
        return None;
    }
    for i in (0..last).rev() {
        if value >= bounds[i] {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: [f64; 5] = [0.0, 12.0, 24.0, 48.0, 72.0];

    #[test]
    fn test_boundary_value_joins_upper_bucket() {
        assert_eq!(bin_index(12.0, &BOUNDS), Some(1));
        assert_eq!(bin_index(24.0, &BOUNDS), Some(2));
        assert_eq!(bin_index(48.0, &BOUNDS), Some(3));
    }

    #[test]
    fn test_zero_belongs_to_lowest_bucket() {
        assert_eq!(bin_index(0.0, &BOUNDS), Some(0));
    }

    #[test]
    fn test_top_boundary_closes_last_bucket() {
        assert_eq!(bin_index(72.0, &BOUNDS), Some(3));
    }

    #[test]
    fn test_out_of_range_values() {
        assert_eq!(bin_index(72.5, &BOUNDS), None);
        assert_eq!(bin_index(-1.0, &BOUNDS), None);
    }

    #[test]
    fn test_binning_is_total_on_the_range() {
        for tenure in 0..=72 {
            assert!(
                bin_index(tenure as f64, &BOUNDS).is_some(),
                "tenure {} must map to a bucket",
                tenure
            );
        }
    }
}
