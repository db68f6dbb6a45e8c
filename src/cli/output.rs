//! CLI output formatting

use crate::cli::demos::DemoReport;
use crate::core::{DispatchOutcome, DispatchStatus};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static BIRD: Emoji<'_, '_> = Emoji("🐦 ", "> ");

/// Format a dispatch status for display
pub fn format_status(status: &DispatchStatus) -> String {
    match status {
        DispatchStatus::Completed => style("COMPLETED").green().to_string(),
        DispatchStatus::Failed { .. } => style("FAILED").red().to_string(),
        DispatchStatus::Panicked { .. } => style("PANICKED").red().bold().to_string(),
    }
}

/// Format one dispatch outcome for display
pub fn format_outcome(outcome: &DispatchOutcome) -> String {
    let icon = if outcome.is_success() { CHECK } else { CROSS };
    let mut line = format!(
        "{} {} {}::{} - {} ({}ms)",
        icon,
        style(&outcome.dispatch_id.to_string()[..8]).dim(),
        style(&outcome.context).cyan(),
        style(&outcome.name).bold(),
        format_status(&outcome.status),
        outcome.elapsed().num_milliseconds()
    );

    match &outcome.status {
        DispatchStatus::Failed { error } => {
            line.push_str(&format!("\n    {}", style(error).red()));
        }
        DispatchStatus::Panicked { message } => {
            line.push_str(&format!("\n    {}", style(message).red()));
        }
        DispatchStatus::Completed => {}
    }

    line
}

/// Format a whole demo report
pub fn format_report(report: &DemoReport) -> String {
    let mut output = format!("{} {}\n", BIRD, style(&report.title).bold().underlined());

    for line in &report.lines {
        output.push_str(&format!("  {} {}\n", INFO, line));
    }
    for outcome in &report.outcomes {
        output.push_str(&format!("  {}\n", format_outcome(outcome)));
    }

    output
}
