//! Insight & revenue calculator - named business findings from prior stages

use serde::Serialize;

use super::config::AnalysisConfig;
use super::fields::NumericField;
use super::segment::{filtered_mean, filtered_rate, overall_rate, sort_by_rate, SegmentAggregate};
use super::store::{CustomerRecord, Dataset};

/// Category values the named high-risk findings are anchored on
pub const CONTRACT_MONTH_TO_MONTH: &str = "Month-to-month";
pub const INTERNET_FIBER_OPTIC: &str = "Fiber optic";
pub const PAYMENT_ELECTRONIC_CHECK: &str = "Electronic check";

/// Tenure at or below which a customer counts as new, in months
pub const NEW_CUSTOMER_TENURE_MONTHS: u32 = 12;

/// Churn rate for one named high-risk subset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRate {
    pub label: &'static str,
    pub customers: usize,
    /// `None` means "not applicable" (empty subset), never 0 or NaN
    pub churn_rate: Option<f64>,
}

/// Recurring revenue attributable to churned customers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueImpact {
    pub churned_customers: usize,
    /// Sum of monthly charges over churned records
    pub monthly_at_risk: f64,
    /// Monthly loss annualized by a factor of 12
    pub annual_at_risk: f64,
    /// Monthly loss as a share of total monthly revenue; `None` when the
    /// total is 0
    pub share_of_monthly_revenue: Option<f64>,
    pub avg_charges_churned: Option<f64>,
    pub avg_charges_retained: Option<f64>,
    /// The assumed churn reduction fraction behind the projection below
    pub mitigation_fraction: f64,
    /// Loss times the mitigation fraction: linear scaling, no further
    /// assumptions
    pub mitigated_monthly_savings: f64,
    pub mitigated_annual_savings: f64,
}

/// Business findings derived from the dataset and selected aggregates
#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub overall_churn_rate: Option<f64>,
    /// The named high-risk segments, in fixed reporting order
    pub high_risk: Vec<SegmentRate>,
    /// The supplied aggregates re-sorted by churn rate descending,
    /// truncated to the configured top-N
    pub riskiest_segments: Vec<SegmentAggregate>,
    /// `None` for an empty dataset
    pub revenue: Option<RevenueImpact>,
}

/// Derive the insight report. Pure aggregation of prior pure outputs; no
/// side effects.
pub fn compute_insights(
    dataset: &Dataset,
    aggregates: &[SegmentAggregate],
    config: &AnalysisConfig,
) -> InsightReport {
    let high_risk = vec![
        segment_rate(dataset, "Month-to-month contract", |r| {
            r.contract == CONTRACT_MONTH_TO_MONTH
        }),
        segment_rate(dataset, "Fiber optic internet", |r| {
            r.internet_service == INTERNET_FIBER_OPTIC
        }),
        segment_rate(dataset, "Senior citizens", |r| r.senior_citizen),
        segment_rate(dataset, "Electronic check payment", |r| {
            r.payment_method == PAYMENT_ELECTRONIC_CHECK
        }),
        segment_rate(dataset, "New customers (first year)", |r| {
            r.tenure_months <= NEW_CUSTOMER_TENURE_MONTHS
        }),
    ];

    let mut riskiest_segments = sort_by_rate(aggregates.to_vec(), true);
    riskiest_segments.truncate(config.top_segments);

    InsightReport {
        overall_churn_rate: overall_rate(dataset),
        high_risk,
        riskiest_segments,
        revenue: revenue_impact(dataset, config.mitigation_fraction),
    }
}

fn segment_rate<P>(dataset: &Dataset, label: &'static str, predicate: P) -> SegmentRate
where
    P: Fn(&CustomerRecord) -> bool,
{
    let customers = dataset.records().iter().filter(|r| predicate(r)).count();
    SegmentRate {
        label,
        customers,
        churn_rate: filtered_rate(dataset, predicate),
    }
}

fn revenue_impact(dataset: &Dataset, mitigation_fraction: f64) -> Option<RevenueImpact> {
    if dataset.is_empty() {
        return None;
    }

    let mut monthly_at_risk = 0.0;
    let mut total_monthly = 0.0;
    let mut churned_customers = 0usize;
    for record in dataset.records() {
        total_monthly += record.monthly_charges;
        if record.churned {
            monthly_at_risk += record.monthly_charges;
            churned_customers += 1;
        }
    }

    let annual_at_risk = monthly_at_risk * 12.0;
    let share_of_monthly_revenue = if total_monthly > 0.0 {
        Some(monthly_at_risk / total_monthly)
    } else {
        None
    };

    Some(RevenueImpact {
        churned_customers,
        monthly_at_risk,
        annual_at_risk,
        share_of_monthly_revenue,
        avg_charges_churned: filtered_mean(dataset, |r| r.churned, NumericField::MonthlyCharges),
        avg_charges_retained: filtered_mean(dataset, |r| !r.churned, NumericField::MonthlyCharges),
        mitigation_fraction,
        mitigated_monthly_savings: monthly_at_risk * mitigation_fraction,
        mitigated_annual_savings: annual_at_risk * mitigation_fraction,
    })
}
