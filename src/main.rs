//! Churnscope: Churn Analytics CLI Tool
//!
//! Loads a customer CSV, cleans it into an immutable dataset, aggregates
//! churn rates across segments, runs hypothesis tests, and projects the
//! revenue at risk from churned accounts.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use churnscope::cli::Cli;
use churnscope::pipeline::{
    aggregate, build, compute_insights, correlation_test, independence_test, load_raw_rows,
    mean_difference_test, segment_profile, BinaryField, GroupField, LabeledOutcome, NumericField,
};
use churnscope::report::{
    display_clean_report, display_insights, display_segments, display_tests, export_analysis,
    ExportParams,
};
use churnscope::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_info, print_step_header, print_step_time, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.analysis_config();
    config.validate()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.input, &config);

    // Step 1: Load raw rows
    print_step_header(1, "Load Customer Records");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading input file...");
    let raw_rows = load_raw_rows(&cli.input)?;
    finish_with_success(&spinner, &format!("Loaded {} raw row(s)", raw_rows.len()));
    print_step_time(step_start.elapsed());

    // Step 2: Clean records and derive buckets
    print_step_header(2, "Clean Records & Derive Buckets");
    let step_start = Instant::now();
    let spinner = create_spinner("Cleaning records...");
    let (dataset, clean_report) = build(&raw_rows, &config);
    if clean_report.issues.is_empty() {
        finish_with_success(
            &spinner,
            &format!("{} record(s) cleaned", clean_report.rows_kept),
        );
    } else {
        finish_with_warning(
            &spinner,
            &format!(
                "{} record(s) cleaned, {} data quality issue(s)",
                clean_report.rows_kept,
                clean_report.issues.len()
            ),
        );
    }
    display_clean_report(&clean_report);
    if dataset.is_empty() {
        print_warning("No valid records after cleaning; downstream results will be n/a");
    }
    print_step_time(step_start.elapsed());

    // Step 3: Segment churn rates across every dimension
    print_step_header(3, "Segment Churn Rates");
    let step_start = Instant::now();
    let profile = segment_profile(&dataset, &GroupField::ALL);
    for (field, segments) in &profile {
        display_segments(*field, segments);
    }
    print_step_time(step_start.elapsed());

    // Step 4: Statistical tests, each scoped so one failure skips only itself
    print_step_header(4, "Statistical Tests");
    let step_start = Instant::now();
    let alpha = config.significance_level;
    let outcomes = vec![
        LabeledOutcome {
            label: "T-test: monthly charges (churned vs retained)".to_string(),
            outcome: mean_difference_test(
                &dataset,
                NumericField::MonthlyCharges,
                BinaryField::Churned,
                alpha,
            ),
        },
        LabeledOutcome {
            label: "Chi-square: contract vs churn".to_string(),
            outcome: independence_test(&dataset, GroupField::Contract, GroupField::Churned, alpha),
        },
        LabeledOutcome {
            label: "Correlation: tenure vs churn".to_string(),
            outcome: correlation_test(
                &dataset,
                NumericField::TenureMonths,
                BinaryField::Churned,
                alpha,
            ),
        },
        LabeledOutcome {
            label: "Correlation: monthly charges vs churn".to_string(),
            outcome: correlation_test(
                &dataset,
                NumericField::MonthlyCharges,
                BinaryField::Churned,
                alpha,
            ),
        },
    ];
    display_tests(&outcomes);
    let skipped = outcomes.iter().filter(|o| o.outcome.is_err()).count();
    if skipped > 0 {
        print_info(&format!("{} test(s) skipped; see reasons above", skipped));
    }
    print_step_time(step_start.elapsed());

    // Step 5: Insights and revenue impact
    print_step_header(5, "Insights & Revenue Impact");
    let step_start = Instant::now();
    let crossed = aggregate(&dataset, &[GroupField::Contract, GroupField::InternetService]);
    let insights = compute_insights(&dataset, &crossed, &config);
    display_insights(&insights);
    print_step_time(step_start.elapsed());

    // Step 6: Optional JSON export
    if let Some(export_path) = &cli.export {
        print_step_header(6, "Export Results");
        let step_start = Instant::now();
        export_analysis(
            export_path,
            &ExportParams {
                input_file: &cli.input.display().to_string(),
                config: &config,
                cleaning: &clean_report,
                profile: &profile,
                tests: &outcomes,
                insights: &insights,
            },
        )?;
        print_success(&format!("Exported analysis to {}", export_path.display()));
        print_step_time(step_start.elapsed());
    }

    print_completion();
    Ok(())
}
