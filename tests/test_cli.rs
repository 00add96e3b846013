//! End-to-end tests for the churnscope binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

const HEADER: &str = "customer_id,gender,senior_citizen,partner,tenure_months,monthly_charges,\
internet_service,contract,payment_method,online_security,online_backup,device_protection,\
tech_support,streaming_tv,streaming_movies,churn";

fn sample_row(id: &str, tenure: &str, charges: &str, churn: &str) -> String {
    format!(
        "{id},Female,0,No,{tenure},{charges},DSL,Month-to-month,Mailed check,No,No,No,No,No,No,{churn}"
    )
}

fn sample_csv() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp file");
    let rows = [
        sample_row("S-1", "5", "70", "Yes"),
        sample_row("S-2", "15", "40", "No"),
        sample_row("S-3", "30", "90", "Yes"),
        sample_row("S-4", "60", "20", "No"),
        // bad churn label, excluded during cleaning
        sample_row("S-5", "8", "55", "Maybe"),
    ];
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

#[test]
fn test_full_analysis_run() {
    let input = sample_csv();

    Command::cargo_bin("churnscope")
        .unwrap()
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("KEY FINDINGS"))
        .stdout(predicate::str::contains("REVENUE IMPACT"))
        .stdout(predicate::str::contains("Churn analysis complete"));
}

#[test]
fn test_export_writes_json() {
    let input = sample_csv();
    let out_dir = TempDir::new().unwrap();
    let export_path = out_dir.path().join("analysis.json");

    Command::cargo_bin("churnscope")
        .unwrap()
        .arg(input.path())
        .arg("--export")
        .arg(&export_path)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();

    assert!(json.get("metadata").is_some());
    assert!(json.get("cleaning").is_some());
    assert!(json.get("profile").is_some());
    assert!(json.get("tests").is_some());
    assert!(json.get("insights").is_some());
    assert_eq!(json["cleaning"]["rows_kept"], 4);
    assert_eq!(json["insights"]["overall_churn_rate"], 0.5);
}

#[test]
fn test_invalid_bounds_are_rejected() {
    let input = sample_csv();

    Command::cargo_bin("churnscope")
        .unwrap()
        .arg(input.path())
        .arg("--tenure-bounds")
        .arg("0,12")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly 5"));
}

#[test]
fn test_missing_input_fails() {
    Command::cargo_bin("churnscope")
        .unwrap()
        .arg("does_not_exist.csv")
        .assert()
        .failure();
}
