//! Analysis export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    AnalysisConfig, CleanReport, GroupField, InsightReport, LabeledOutcome, SegmentAggregate,
    TestResult,
};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// Churnscope version
    pub churnscope_version: String,
    /// Input file path
    pub input_file: String,
    /// Configuration the run used
    pub config: AnalysisConfig,
}

/// One statistical test in the export: either a result or a skip reason
#[derive(Serialize)]
pub struct TestExportEntry {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TestResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

/// Single-dimension churn profile for one grouping field
#[derive(Serialize)]
pub struct ProfileExportEntry {
    pub field: GroupField,
    pub segments: Vec<SegmentAggregate>,
}

/// Complete analysis export with metadata
#[derive(Serialize)]
pub struct AnalysisExport<'a> {
    pub metadata: AnalysisMetadata,
    pub cleaning: &'a CleanReport,
    pub profile: Vec<ProfileExportEntry>,
    pub tests: Vec<TestExportEntry>,
    pub insights: &'a InsightReport,
}

/// Parameters for the analysis export
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub config: &'a AnalysisConfig,
    pub cleaning: &'a CleanReport,
    pub profile: &'a [(GroupField, Vec<SegmentAggregate>)],
    pub tests: &'a [LabeledOutcome],
    pub insights: &'a InsightReport,
}

/// Export the full analysis to a JSON file.
pub fn export_analysis(output_path: &Path, params: &ExportParams) -> Result<()> {
    let profile = params
        .profile
        .iter()
        .map(|(field, segments)| ProfileExportEntry {
            field: *field,
            segments: segments.clone(),
        })
        .collect();

    let tests = params
        .tests
        .iter()
        .map(|LabeledOutcome { label, outcome }| match outcome {
            Ok(result) => TestExportEntry {
                label: label.clone(),
                result: Some(result.clone()),
                skipped: None,
            },
            Err(error) => TestExportEntry {
                label: label.clone(),
                result: None,
                skipped: Some(error.to_string()),
            },
        })
        .collect();

    let export = AnalysisExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            churnscope_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            config: params.config.clone(),
        },
        cleaning: params.cleaning,
        profile,
        tests,
        insights: params.insights,
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize analysis results")?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write export file: {}", output_path.display()))?;

    Ok(())
}
