//! Unit tests for insights and revenue-at-risk projection

use approx::assert_relative_eq;
use churnscope::pipeline::{
    aggregate, compute_insights, AnalysisConfig, Dataset, GroupField,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_revenue_at_risk_on_worked_example() {
    let dataset = common::clean_dataset(&common::scenario_rows());
    let config = AnalysisConfig::default();

    let insights = compute_insights(&dataset, &[], &config);

    assert_relative_eq!(insights.overall_churn_rate.unwrap(), 0.5);

    let revenue = insights.revenue.as_ref().unwrap();
    assert_eq!(revenue.churned_customers, 2);
    assert_relative_eq!(revenue.monthly_at_risk, 160.0); // 70 + 90
    assert_relative_eq!(revenue.annual_at_risk, 1920.0);
    assert_relative_eq!(
        revenue.share_of_monthly_revenue.unwrap(),
        160.0 / 220.0,
        epsilon = 1e-9
    );
    assert_relative_eq!(revenue.avg_charges_churned.unwrap(), 80.0);
    assert_relative_eq!(revenue.avg_charges_retained.unwrap(), 30.0);
}

#[test]
fn test_mitigation_projection_is_linear() {
    let dataset = common::clean_dataset(&common::scenario_rows());
    let config = AnalysisConfig {
        mitigation_fraction: 0.10,
        ..Default::default()
    };

    let insights = compute_insights(&dataset, &[], &config);
    let revenue = insights.revenue.as_ref().unwrap();

    assert_relative_eq!(revenue.mitigation_fraction, 0.10);
    assert_relative_eq!(revenue.mitigated_monthly_savings, 16.0, epsilon = 1e-9);
    assert_relative_eq!(revenue.mitigated_annual_savings, 192.0, epsilon = 1e-9);
}

#[test]
fn test_high_risk_segments_on_worked_example() {
    // all four scenario records are Month-to-month; only the tenure-5
    // record counts as a new customer, and it churned
    let dataset = common::clean_dataset(&common::scenario_rows());

    let insights = compute_insights(&dataset, &[], &AnalysisConfig::default());

    let by_label = |label: &str| {
        insights
            .high_risk
            .iter()
            .find(|s| s.label == label)
            .unwrap_or_else(|| panic!("missing high-risk segment '{}'", label))
    };

    let month_to_month = by_label("Month-to-month contract");
    assert_eq!(month_to_month.customers, 4);
    assert_relative_eq!(month_to_month.churn_rate.unwrap(), 0.5);

    let new_customers = by_label("New customers (first year)");
    assert_eq!(new_customers.customers, 1);
    assert_relative_eq!(new_customers.churn_rate.unwrap(), 1.0);

    // no fiber, senior, or electronic-check customers in the fixture
    let fiber = by_label("Fiber optic internet");
    assert_eq!(fiber.customers, 0);
    assert_eq!(fiber.churn_rate, None, "empty subset is n/a, never 0");

    assert_eq!(by_label("Senior citizens").churn_rate, None);
    assert_eq!(by_label("Electronic check payment").churn_rate, None);
}

#[test]
fn test_riskiest_segments_sorted_and_truncated() {
    let mut rows = Vec::new();
    for (i, (contract, churn)) in [
        ("Two year", "No"),
        ("Two year", "No"),
        ("One year", "Yes"),
        ("One year", "No"),
        ("Month-to-month", "Yes"),
        ("Month-to-month", "Yes"),
    ]
    .iter()
    .enumerate()
    {
        let mut row = common::raw_row(&format!("R-{}", i));
        row.insert("contract".to_string(), contract.to_string());
        row.insert("churn".to_string(), churn.to_string());
        rows.push(row);
    }
    let dataset = common::clean_dataset(&rows);
    let aggregates = aggregate(&dataset, &[GroupField::Contract]);
    let config = AnalysisConfig {
        top_segments: 2,
        ..Default::default()
    };

    let insights = compute_insights(&dataset, &aggregates, &config);

    assert_eq!(insights.riskiest_segments.len(), 2);
    assert_eq!(insights.riskiest_segments[0].key, vec!["Month-to-month"]);
    assert_eq!(insights.riskiest_segments[1].key, vec!["One year"]);
}

#[test]
fn test_empty_dataset_yields_not_applicable() {
    let dataset = Dataset::default();

    let insights = compute_insights(&dataset, &[], &AnalysisConfig::default());

    assert_eq!(insights.overall_churn_rate, None);
    assert!(insights.revenue.is_none(), "revenue at risk is n/a, not 0");
    assert!(insights.riskiest_segments.is_empty());
    for segment in &insights.high_risk {
        assert_eq!(segment.customers, 0);
        assert_eq!(segment.churn_rate, None);
    }
}
