//! Terminal styling utilities

use console::style;
use std::path::Path;
use std::time::Duration;

use crate::pipeline::AnalysisConfig;

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     ██████╗██╗  ██╗██╗   ██╗██████╗ ███╗   ██╗███████╗ ██████╗ ██████╗ ██████╗ ███████╗
    ██╔════╝██║  ██║██║   ██║██╔══██╗████╗  ██║██╔════╝██╔════╝██╔═══██╗██╔══██╗██╔════╝
    ██║     ███████║██║   ██║██████╔╝██╔██╗ ██║███████╗██║     ██║   ██║██████╔╝█████╗
    ██║     ██╔══██║██║   ██║██╔══██╗██║╚██╗██║╚════██║██║     ██║   ██║██╔═══╝ ██╔══╝
    ╚██████╗██║  ██║╚██████╔╝██║  ██║██║ ╚████║███████║╚██████╗╚██████╔╝██║     ███████╗
     ╚═════╝╚═╝  ╚═╝ ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═══╝╚══════╝ ╚═════╝ ╚═════╝ ╚═╝     ╚══════╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Customer churn analytics for telecom datasets").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the run configuration card
pub fn print_config(input: &Path, config: &AnalysisConfig) {
    println!("    {}", style("⚙ Configuration").cyan().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!("      Input:               {}", input.display());
    println!(
        "      Significance level:  {}",
        style(format!("{:.2}", config.significance_level)).yellow()
    );
    println!(
        "      Tenure bounds:       {}",
        style(format_bounds(&config.tenure_bounds)).yellow()
    );
    println!(
        "      Charge bounds:       {}",
        style(format_bounds(&config.charge_bounds)).yellow()
    );
    println!(
        "      Mitigation fraction: {}",
        style(format!("{:.2}", config.mitigation_fraction)).yellow()
    );
    println!();
}

fn format_bounds(bounds: &[f64]) -> String {
    bounds
        .iter()
        .map(|b| format!("{}", b))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", style("ℹ").cyan(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Print the elapsed time for a step
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}",
        style(format!("⏱ {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        style("»").cyan(),
        style("Churn analysis complete!").green().bold()
    );
    println!();
}
