//! Shared test utilities and fixture generators

use churnscope::pipeline::{build, AnalysisConfig, Dataset, RawRow};

/// A complete raw row with benign defaults:
/// Female, non-senior, no partner, tenure 10, charges 60.0 (Medium tier),
/// DSL internet, Month-to-month contract, Mailed check, no services,
/// not churned.
pub fn raw_row(id: &str) -> RawRow {
    let mut row = RawRow::new();
    row.insert("customer_id".to_string(), id.to_string());
    row.insert("gender".to_string(), "Female".to_string());
    row.insert("senior_citizen".to_string(), "0".to_string());
    row.insert("partner".to_string(), "No".to_string());
    row.insert("tenure_months".to_string(), "10".to_string());
    row.insert("monthly_charges".to_string(), "60.0".to_string());
    row.insert("internet_service".to_string(), "DSL".to_string());
    row.insert("contract".to_string(), "Month-to-month".to_string());
    row.insert("payment_method".to_string(), "Mailed check".to_string());
    row.insert("online_security".to_string(), "No".to_string());
    row.insert("online_backup".to_string(), "No".to_string());
    row.insert("device_protection".to_string(), "No".to_string());
    row.insert("tech_support".to_string(), "No".to_string());
    row.insert("streaming_tv".to_string(), "No".to_string());
    row.insert("streaming_movies".to_string(), "No".to_string());
    row.insert("churn".to_string(), "No".to_string());
    row
}

/// A raw row with the given tenure, charges, and churn label
pub fn raw_row_numbers(id: &str, tenure: &str, charges: &str, churn: &str) -> RawRow {
    let mut row = raw_row(id);
    row.insert("tenure_months".to_string(), tenure.to_string());
    row.insert("monthly_charges".to_string(), charges.to_string());
    row.insert("churn".to_string(), churn.to_string());
    row
}

/// The 4-record worked example:
/// tenures 5/15/30/60 span all four buckets, charges 70/40/90/20 map to
/// Medium/Low/High/Low, churn alternates Yes/No/Yes/No, so the overall
/// churn rate is 0.5 and monthly revenue at risk is 160.
pub fn scenario_rows() -> Vec<RawRow> {
    vec![
        raw_row_numbers("S-1", "5", "70", "Yes"),
        raw_row_numbers("S-2", "15", "40", "No"),
        raw_row_numbers("S-3", "30", "90", "Yes"),
        raw_row_numbers("S-4", "60", "20", "No"),
    ]
}

/// Build a dataset with the default configuration, asserting the rows are
/// clean.
pub fn clean_dataset(rows: &[RawRow]) -> Dataset {
    let (dataset, report) = build(rows, &AnalysisConfig::default());
    assert!(
        report.issues.is_empty(),
        "fixture rows should be clean, got issues: {:?}",
        report.issues
    );
    dataset
}
