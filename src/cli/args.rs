//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::AnalysisConfig;

/// Churnscope - Analyze customer churn: segment rates, hypothesis tests, revenue at risk
#[derive(Parser, Debug)]
#[command(name = "churnscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input CSV file with one row per customer
    pub input: PathBuf,

    /// Significance threshold for hypothesis tests.
    /// A test is significant only when its p-value is strictly below this.
    #[arg(long, default_value = "0.05", value_parser = validate_fraction)]
    pub significance: f64,

    /// Tenure bucket boundaries in months (5 ascending values, comma-separated).
    /// Default: 0,12,24,48,72
    #[arg(long, value_delimiter = ',')]
    pub tenure_bounds: Option<Vec<f64>>,

    /// Charge tier boundaries in dollars (5 ascending values, comma-separated).
    /// Default: 0,50,75,100,150
    #[arg(long, value_delimiter = ',')]
    pub charge_bounds: Option<Vec<f64>>,

    /// Assumed churn reduction fraction for the mitigation projection
    #[arg(long, default_value = "0.05", value_parser = validate_fraction)]
    pub mitigation: f64,

    /// Number of riskiest segments to highlight in the findings
    #[arg(long, default_value = "5")]
    pub top_segments: usize,

    /// Write the full analysis as JSON to this path
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

impl Cli {
    /// Assemble the analysis configuration from the arguments, falling back
    /// to the built-in defaults for the boundary vectors.
    pub fn analysis_config(&self) -> AnalysisConfig {
        let defaults = AnalysisConfig::default();
        AnalysisConfig {
            significance_level: self.significance,
            tenure_bounds: self
                .tenure_bounds
                .clone()
                .unwrap_or(defaults.tenure_bounds),
            charge_bounds: self
                .charge_bounds
                .clone()
                .unwrap_or(defaults.charge_bounds),
            mitigation_fraction: self.mitigation,
            top_segments: self.top_segments,
        }
    }
}

/// Validator for fraction-valued parameters
fn validate_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("value must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}
