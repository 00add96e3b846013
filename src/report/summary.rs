//! Terminal report - styled tables over the pipeline's pure outputs
//!
//! The pipeline never formats strings; everything printed here is derived
//! from the typed results it returns.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{
    high_cardinality, CleanReport, GroupField, InsightReport, IssueKind, LabeledOutcome,
    SegmentAggregate,
};

/// Render a rate as a percentage, or the not-applicable marker.
fn rate_cell(rate: Option<f64>) -> Cell {
    match rate {
        Some(rate) => Cell::new(format!("{:.1}%", rate * 100.0)),
        None => Cell::new("n/a").fg(Color::DarkGrey),
    }
}

/// Print the cleaning outcome: counts plus a breakdown of issues by kind.
pub fn display_clean_report(report: &CleanReport) {
    println!();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Cleaning").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![Cell::new("Raw rows"), Cell::new(report.rows_seen)]);
    table.add_row(vec![
        Cell::new("Duplicates removed"),
        Cell::new(report.duplicates_removed).fg(if report.duplicates_removed == 0 {
            Color::White
        } else {
            Color::Yellow
        }),
    ]);
    table.add_row(vec![
        Cell::new("Rows excluded"),
        Cell::new(report.rows_excluded()).fg(if report.rows_excluded() == 0 {
            Color::White
        } else {
            Color::Red
        }),
    ]);
    table.add_row(vec![
        Cell::new("Records kept"),
        Cell::new(report.rows_kept)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    if !report.issues.is_empty() {
        let missing = count_kind(report, IssueKind::MissingField);
        let invalid = count_kind(report, IssueKind::InvalidChurnLabel);
        let out_of_range = count_kind(report, IssueKind::OutOfRange);
        println!();
        println!(
            "      {} {}:",
            style("Data quality issues").yellow(),
            style(format!("({})", report.issues.len())).dim()
        );
        if missing > 0 {
            println!("        {} missing field: {}", style("•").dim(), missing);
        }
        if invalid > 0 {
            println!("        {} invalid churn label: {}", style("•").dim(), invalid);
        }
        if out_of_range > 0 {
            println!(
                "        {} out of range (kept, bucket unknown): {}",
                style("•").dim(),
                out_of_range
            );
        }
    }
}

fn count_kind(report: &CleanReport, kind: IssueKind) -> usize {
    report.issues.iter().filter(|i| i.kind == kind).count()
}

/// Print churn rates for one grouping dimension.
pub fn display_segments(field: GroupField, aggregates: &[SegmentAggregate]) {
    println!();
    println!(
        "      {} {}",
        style("▸").cyan(),
        style(format!("Churn by {}", field)).white().bold()
    );

    if aggregates.is_empty() {
        println!("        {}", style("no records").dim());
        return;
    }

    if high_cardinality(aggregates) {
        println!(
            "        {} {} distinct values; table may be unwieldy",
            style("⚠").yellow(),
            aggregates.len()
        );
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Value").add_attribute(Attribute::Bold),
        Cell::new("Customers").add_attribute(Attribute::Bold),
        Cell::new("Churned").add_attribute(Attribute::Bold),
        Cell::new("Churn rate").add_attribute(Attribute::Bold),
    ]);

    for aggregate in aggregates {
        table.add_row(vec![
            Cell::new(aggregate.key.join(" / ")),
            Cell::new(aggregate.count),
            Cell::new(aggregate.churned),
            rate_cell(aggregate.churn_rate),
        ]);
    }

    for line in table.to_string().lines() {
        println!("      {}", line);
    }
}

/// Print the statistical test battery, one row per test; failed tests show
/// the reason they were skipped instead of aborting the report.
pub fn display_tests(outcomes: &[LabeledOutcome]) {
    println!();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Test").add_attribute(Attribute::Bold),
        Cell::new("Statistic").add_attribute(Attribute::Bold),
        Cell::new("df").add_attribute(Attribute::Bold),
        Cell::new("p-value").add_attribute(Attribute::Bold),
        Cell::new("Significant").add_attribute(Attribute::Bold),
    ]);

    for LabeledOutcome { label, outcome } in outcomes {
        match outcome {
            Ok(result) => {
                table.add_row(vec![
                    Cell::new(label),
                    Cell::new(format!("{:.4}", result.statistic)),
                    Cell::new(format!("{:.1}", result.degrees_of_freedom)),
                    Cell::new(format!("{:.4}", result.p_value)),
                    if result.significant {
                        Cell::new("yes").fg(Color::Green).add_attribute(Attribute::Bold)
                    } else {
                        Cell::new("no").fg(Color::DarkGrey)
                    },
                ]);
            }
            Err(error) => {
                table.add_row(vec![
                    Cell::new(label),
                    Cell::new("skipped").fg(Color::Yellow),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(error.to_string()).fg(Color::Yellow),
                ]);
            }
        }
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Print the key findings and the revenue impact summary.
pub fn display_insights(insights: &InsightReport) {
    println!();
    println!(
        "    {} {}",
        style("◆").cyan(),
        style("KEY FINDINGS").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());

    match insights.overall_churn_rate {
        Some(rate) => println!(
            "      Overall churn rate: {}",
            style(format!("{:.1}%", rate * 100.0)).red().bold()
        ),
        None => println!("      Overall churn rate: {}", style("n/a (no records)").dim()),
    }

    println!();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("High-risk segment").add_attribute(Attribute::Bold),
        Cell::new("Customers").add_attribute(Attribute::Bold),
        Cell::new("Churn rate").add_attribute(Attribute::Bold),
    ]);
    for segment in &insights.high_risk {
        table.add_row(vec![
            Cell::new(segment.label),
            Cell::new(segment.customers),
            rate_cell(segment.churn_rate),
        ]);
    }
    for line in table.to_string().lines() {
        println!("      {}", line);
    }

    if !insights.riskiest_segments.is_empty() {
        println!();
        println!(
            "      {} {}:",
            style("Riskiest segments").yellow(),
            style(format!("(top {})", insights.riskiest_segments.len())).dim()
        );
        for segment in &insights.riskiest_segments {
            let rate = segment
                .churn_rate
                .map(|r| format!("{:.1}%", r * 100.0))
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "        {} {} — {} ({} customers)",
                style("•").dim(),
                segment.key.join(" / "),
                rate,
                segment.count
            );
        }
    }

    println!();
    println!(
        "    {} {}",
        style("◆").cyan(),
        style("REVENUE IMPACT").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());

    match &insights.revenue {
        None => println!("      {}", style("n/a (no records)").dim()),
        Some(revenue) => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.add_row(vec![
                Cell::new("Churned customers"),
                Cell::new(revenue.churned_customers),
            ]);
            table.add_row(vec![
                Cell::new("Monthly revenue at risk"),
                Cell::new(format!("${:.2}", revenue.monthly_at_risk)).fg(Color::Red),
            ]);
            table.add_row(vec![
                Cell::new("Annual revenue at risk"),
                Cell::new(format!("${:.2}", revenue.annual_at_risk)).fg(Color::Red),
            ]);
            table.add_row(vec![
                Cell::new("Share of monthly revenue"),
                match revenue.share_of_monthly_revenue {
                    Some(share) => Cell::new(format!("{:.1}%", share * 100.0)),
                    None => Cell::new("n/a").fg(Color::DarkGrey),
                },
            ]);
            table.add_row(vec![
                Cell::new("Avg charges (churned)"),
                match revenue.avg_charges_churned {
                    Some(avg) => Cell::new(format!("${:.2}", avg)),
                    None => Cell::new("n/a").fg(Color::DarkGrey),
                },
            ]);
            table.add_row(vec![
                Cell::new("Avg charges (retained)"),
                match revenue.avg_charges_retained {
                    Some(avg) => Cell::new(format!("${:.2}", avg)),
                    None => Cell::new("n/a").fg(Color::DarkGrey),
                },
            ]);
            table.add_row(vec![
                Cell::new(format!(
                    "Savings at {:.0}% churn reduction (annual)",
                    revenue.mitigation_fraction * 100.0
                )),
                Cell::new(format!("${:.2}", revenue.mitigated_annual_savings))
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);
            for line in table.to_string().lines() {
                println!("      {}", line);
            }
        }
    }
}
