//! Analysis configuration
//!
//! Bucket boundaries and the significance/mitigation knobs encode business
//! policy, so they are overridable rather than hard-coded in the pipeline.

use anyhow::Result;
use serde::Serialize;

/// Default significance threshold for hypothesis tests
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Default assumed churn reduction fraction for the mitigation projection
pub const DEFAULT_MITIGATION_FRACTION: f64 = 0.05;

/// Default tenure bucket boundaries in months (4 buckets)
pub const DEFAULT_TENURE_BOUNDS: [f64; 5] = [0.0, 12.0, 24.0, 48.0, 72.0];

/// Default charge tier boundaries in dollars (4 tiers)
pub const DEFAULT_CHARGE_BOUNDS: [f64; 5] = [0.0, 50.0, 75.0, 100.0, 150.0];

/// Default number of riskiest segments highlighted in the findings
pub const DEFAULT_TOP_SEGMENTS: usize = 5;

/// Configuration for a single analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    /// Significance threshold; a test is significant iff p-value is strictly below this
    pub significance_level: f64,
    /// Tenure bucket boundaries in months, 5 strictly ascending values
    pub tenure_bounds: Vec<f64>,
    /// Charge tier boundaries in dollars, 5 strictly ascending values
    pub charge_bounds: Vec<f64>,
    /// Assumed churn reduction fraction for the mitigation projection
    pub mitigation_fraction: f64,
    /// Number of riskiest segments to include in the insight report
    pub top_segments: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            tenure_bounds: DEFAULT_TENURE_BOUNDS.to_vec(),
            charge_bounds: DEFAULT_CHARGE_BOUNDS.to_vec(),
            mitigation_fraction: DEFAULT_MITIGATION_FRACTION,
            top_segments: DEFAULT_TOP_SEGMENTS,
        }
    }
}

impl AnalysisConfig {
    /// Validate the configuration before running the pipeline.
    ///
    /// Boundary vectors must contain exactly 5 strictly ascending values,
    /// since both bucket families have four named buckets.
    pub fn validate(&self) -> Result<()> {
        validate_bounds("tenure_bounds", &self.tenure_bounds)?;
        validate_bounds("charge_bounds", &self.charge_bounds)?;

        if !(0.0..=1.0).contains(&self.significance_level) {
            anyhow::bail!(
                "significance_level must be between 0.0 and 1.0, got {}",
                self.significance_level
            );
        }

        if !(0.0..=1.0).contains(&self.mitigation_fraction) {
            anyhow::bail!(
                "mitigation_fraction must be between 0.0 and 1.0, got {}",
                self.mitigation_fraction
            );
        }

        Ok(())
    }
}

fn validate_bounds(name: &str, bounds: &[f64]) -> Result<()> {
    if bounds.len() != 5 {
        anyhow::bail!(
            "{} must contain exactly 5 boundaries, got {}",
            name,
            bounds.len()
        );
    }

    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        anyhow::bail!("{} must be strictly ascending, got {:?}", name, bounds);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_unsorted_bounds() {
        let config = AnalysisConfig {
            tenure_bounds: vec![0.0, 24.0, 12.0, 48.0, 72.0],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }

    #[test]
    fn test_rejects_wrong_boundary_count() {
        let config = AnalysisConfig {
            charge_bounds: vec![0.0, 50.0, 100.0],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exactly 5"));
    }

    #[test]
    fn test_rejects_out_of_range_significance() {
        let config = AnalysisConfig {
            significance_level: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
