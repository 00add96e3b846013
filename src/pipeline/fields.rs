//! Typed field selectors over customer records
//!
//! Grouping and test dimensions are closed enums rather than free-form
//! column-name strings, so an invalid grouping request cannot be
//! constructed in the first place.

use std::fmt;

use serde::Serialize;

use super::store::CustomerRecord;

/// A categorical dimension a dataset can be grouped or cross-tabulated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    Gender,
    SeniorCitizen,
    Partner,
    InternetService,
    Contract,
    PaymentMethod,
    TenureBucket,
    ChargeTier,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTv,
    StreamingMovies,
    /// The churn outcome itself; used as one side of a contingency table
    Churned,
}

impl GroupField {
    /// All customer dimensions, excluding the churn outcome.
    pub const ALL: [GroupField; 14] = [
        GroupField::Gender,
        GroupField::SeniorCitizen,
        GroupField::Partner,
        GroupField::InternetService,
        GroupField::Contract,
        GroupField::PaymentMethod,
        GroupField::TenureBucket,
        GroupField::ChargeTier,
        GroupField::OnlineSecurity,
        GroupField::OnlineBackup,
        GroupField::DeviceProtection,
        GroupField::TechSupport,
        GroupField::StreamingTv,
        GroupField::StreamingMovies,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GroupField::Gender => "gender",
            GroupField::SeniorCitizen => "senior_citizen",
            GroupField::Partner => "partner",
            GroupField::InternetService => "internet_service",
            GroupField::Contract => "contract",
            GroupField::PaymentMethod => "payment_method",
            GroupField::TenureBucket => "tenure_bucket",
            GroupField::ChargeTier => "charge_tier",
            GroupField::OnlineSecurity => "online_security",
            GroupField::OnlineBackup => "online_backup",
            GroupField::DeviceProtection => "device_protection",
            GroupField::TechSupport => "tech_support",
            GroupField::StreamingTv => "streaming_tv",
            GroupField::StreamingMovies => "streaming_movies",
            GroupField::Churned => "churn",
        }
    }

    /// The record's value on this dimension, as a displayable category.
    pub fn value_of(&self, record: &CustomerRecord) -> String {
        match self {
            GroupField::Gender => record.gender.clone(),
            GroupField::SeniorCitizen => yes_no(record.senior_citizen),
            GroupField::Partner => yes_no(record.partner),
            GroupField::InternetService => record.internet_service.clone(),
            GroupField::Contract => record.contract.clone(),
            GroupField::PaymentMethod => record.payment_method.clone(),
            GroupField::TenureBucket => record.tenure_bucket.label().to_string(),
            GroupField::ChargeTier => record.charge_tier.label().to_string(),
            GroupField::OnlineSecurity => yes_no(record.online_security),
            GroupField::OnlineBackup => yes_no(record.online_backup),
            GroupField::DeviceProtection => yes_no(record.device_protection),
            GroupField::TechSupport => yes_no(record.tech_support),
            GroupField::StreamingTv => yes_no(record.streaming_tv),
            GroupField::StreamingMovies => yes_no(record.streaming_movies),
            GroupField::Churned => yes_no(record.churned),
        }
    }
}

impl fmt::Display for GroupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A numeric measurement on a customer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    TenureMonths,
    MonthlyCharges,
}

impl NumericField {
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::TenureMonths => "tenure_months",
            NumericField::MonthlyCharges => "monthly_charges",
        }
    }

    pub fn value_of(&self, record: &CustomerRecord) -> f64 {
        match self {
            NumericField::TenureMonths => record.tenure_months as f64,
            NumericField::MonthlyCharges => record.monthly_charges,
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A boolean attribute usable as a two-sample split or a 0/1 variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryField {
    Churned,
    SeniorCitizen,
    Partner,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTv,
    StreamingMovies,
}

impl BinaryField {
    pub fn label(&self) -> &'static str {
        match self {
            BinaryField::Churned => "churn",
            BinaryField::SeniorCitizen => "senior_citizen",
            BinaryField::Partner => "partner",
            BinaryField::OnlineSecurity => "online_security",
            BinaryField::OnlineBackup => "online_backup",
            BinaryField::DeviceProtection => "device_protection",
            BinaryField::TechSupport => "tech_support",
            BinaryField::StreamingTv => "streaming_tv",
            BinaryField::StreamingMovies => "streaming_movies",
        }
    }

    pub fn value_of(&self, record: &CustomerRecord) -> bool {
        match self {
            BinaryField::Churned => record.churned,
            BinaryField::SeniorCitizen => record.senior_citizen,
            BinaryField::Partner => record.partner,
            BinaryField::OnlineSecurity => record.online_security,
            BinaryField::OnlineBackup => record.online_backup,
            BinaryField::DeviceProtection => record.device_protection,
            BinaryField::TechSupport => record.tech_support,
            BinaryField::StreamingTv => record.streaming_tv,
            BinaryField::StreamingMovies => record.streaming_movies,
        }
    }
}

impl fmt::Display for BinaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}
