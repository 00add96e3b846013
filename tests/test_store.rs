//! Unit tests for record cleaning and bucket derivation

use churnscope::pipeline::{
    build, AnalysisConfig, ChargeTier, IssueKind, TenureBucket,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_duplicates_removed_and_counted() {
    let rows = vec![
        common::raw_row("A-1"),
        common::raw_row("A-1"),
        common::raw_row("A-2"),
    ];

    let (dataset, report) = build(&rows, &AnalysisConfig::default());

    assert_eq!(dataset.len(), 2, "identical rows must collapse to one");
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.rows_seen, 3);
    assert_eq!(report.rows_kept, 2);
    assert!(report.issues.is_empty());
}

#[test]
fn test_near_duplicates_are_kept() {
    let mut second = common::raw_row("A-1");
    second.insert("tenure_months".to_string(), "11".to_string());
    let rows = vec![common::raw_row("A-1"), second];

    let (dataset, report) = build(&rows, &AnalysisConfig::default());

    assert_eq!(dataset.len(), 2, "rows differing in any field are distinct");
    assert_eq!(report.duplicates_removed, 0);
}

#[test]
fn test_deduplication_is_idempotent() {
    let rows = vec![
        common::raw_row("A-1"),
        common::raw_row("A-1"),
        common::raw_row("A-2"),
    ];
    let config = AnalysisConfig::default();

    let (first, _) = build(&rows, &config);

    // the already-deduplicated raw form
    let unique: Vec<_> = vec![common::raw_row("A-1"), common::raw_row("A-2")];
    let (second, report) = build(&unique, &config);

    assert_eq!(report.duplicates_removed, 0);
    assert_eq!(first.records(), second.records());
}

#[test]
fn test_invalid_churn_label_excludes_row() {
    let mut bad = common::raw_row("A-1");
    bad.insert("churn".to_string(), "yes".to_string()); // wrong case

    let (dataset, report) = build(&[bad], &AnalysisConfig::default());

    assert!(dataset.is_empty());
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::InvalidChurnLabel);
    assert_eq!(report.rows_excluded(), 1);
}

#[test]
fn test_missing_field_excludes_row() {
    let mut bad = common::raw_row("A-1");
    bad.remove("contract");

    let (dataset, report) = build(&[bad], &AnalysisConfig::default());

    assert!(dataset.is_empty());
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::MissingField);
    assert_eq!(report.issues[0].field.as_deref(), Some("contract"));
}

#[test]
fn test_empty_value_counts_as_missing() {
    let mut bad = common::raw_row("A-1");
    bad.insert("gender".to_string(), String::new());

    let (dataset, report) = build(&[bad], &AnalysisConfig::default());

    assert!(dataset.is_empty());
    assert_eq!(report.issues[0].kind, IssueKind::MissingField);
}

#[test]
fn test_unparseable_tenure_excludes_row() {
    let mut bad = common::raw_row("A-1");
    bad.insert("tenure_months".to_string(), "abc".to_string());

    let (dataset, report) = build(&[bad], &AnalysisConfig::default());

    assert!(dataset.is_empty());
    assert_eq!(report.issues[0].kind, IssueKind::MissingField);
    assert!(report.issues[0].detail.contains("unparseable"));
}

#[test]
fn test_out_of_range_tenure_is_kept_unbucketed() {
    let row = common::raw_row_numbers("A-1", "80", "60.0", "No");

    let (dataset, report) = build(&[row], &AnalysisConfig::default());

    assert_eq!(dataset.len(), 1, "out-of-range rows stay in the dataset");
    assert_eq!(dataset.records()[0].tenure_bucket, TenureBucket::Unknown);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::OutOfRange);
    assert_eq!(report.issues[0].field.as_deref(), Some("tenure_months"));
}

#[test]
fn test_out_of_range_charges_is_kept_unbucketed() {
    let row = common::raw_row_numbers("A-1", "10", "200.0", "No");

    let (dataset, report) = build(&[row], &AnalysisConfig::default());

    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.records()[0].charge_tier, ChargeTier::Unknown);
    assert_eq!(report.issues[0].kind, IssueKind::OutOfRange);
}

#[test]
fn test_boundary_tenure_joins_upper_bucket() {
    let row = common::raw_row_numbers("A-1", "12", "60.0", "No");

    let (dataset, _) = build(&[row], &AnalysisConfig::default());

    assert_eq!(
        dataset.records()[0].tenure_bucket,
        TenureBucket::Months12To24,
        "tenure exactly at a boundary belongs to the upper bucket"
    );
}

#[test]
fn test_scenario_buckets_and_tiers() {
    let dataset = common::clean_dataset(&common::scenario_rows());

    let buckets: Vec<_> = dataset.records().iter().map(|r| r.tenure_bucket).collect();
    assert_eq!(
        buckets,
        vec![
            TenureBucket::Months0To12,
            TenureBucket::Months12To24,
            TenureBucket::Months24To48,
            TenureBucket::Months48Plus,
        ]
    );

    let tiers: Vec<_> = dataset.records().iter().map(|r| r.charge_tier).collect();
    assert_eq!(
        tiers,
        vec![
            ChargeTier::Medium,
            ChargeTier::Low,
            ChargeTier::High,
            ChargeTier::Low,
        ]
    );
}

#[test]
fn test_custom_bucket_boundaries() {
    let config = AnalysisConfig {
        tenure_bounds: vec![0.0, 6.0, 18.0, 36.0, 60.0],
        ..Default::default()
    };
    let row = common::raw_row_numbers("A-1", "12", "60.0", "No");

    let (dataset, report) = build(&[row], &config);

    assert!(report.issues.is_empty());
    assert_eq!(dataset.records()[0].tenure_bucket, TenureBucket::Months12To24);
}

#[test]
fn test_churn_label_maps_to_flag() {
    let dataset = common::clean_dataset(&common::scenario_rows());
    let churned: Vec<_> = dataset.records().iter().map(|r| r.churned).collect();
    assert_eq!(churned, vec![true, false, true, false]);
}
