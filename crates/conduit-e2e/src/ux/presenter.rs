use std::time::Duration;

use conduit_e2e_core::{RunReport, ScenarioOutcome, ScenarioStatus};
use console::Style;

fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.as_secs() >= 1 {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}

/// One line per scenario, followed by the indented failure diagnostic if any.
pub fn format_outcome(outcome: &ScenarioOutcome) -> String {
    let elapsed = Style::new()
        .white()
        .dim()
        .apply_to(format!("({})", format_elapsed(outcome.elapsed)));

    match &outcome.status {
        ScenarioStatus::Passed => {
            let label = Style::new().green().bold().apply_to("PASS");
            format!("{label} {} {elapsed}", outcome.id)
        }
        ScenarioStatus::Failed(message) => {
            let label = Style::new().red().bold().apply_to("FAIL");
            let details: Vec<String> = message.lines().map(|line| format!("    {line}")).collect();
            format!("{label} {} {elapsed}\n{}", outcome.id, details.join("\n"))
        }
        ScenarioStatus::TimedOut(limit) => {
            let label = Style::new().yellow().bold().apply_to("TIMEOUT");
            format!(
                "{label} {} {elapsed}\n    no result after {}",
                outcome.id,
                format_elapsed(*limit)
            )
        }
    }
}

pub fn format_summary(report: &RunReport) -> String {
    let total = report.outcomes.len();
    let failed = report.failed();
    let style = if failed == 0 {
        Style::new().green().bold()
    } else {
        Style::new().red().bold()
    };

    let mut summary = format!("◼ {} passed", report.passed());
    if failed > 0 {
        summary.push_str(&format!(", {failed} failed"));
    }
    summary.push_str(&format!(
        " of {total} scenarios in {}.",
        format_elapsed(report.elapsed())
    ));
    style.apply_to(summary).to_string()
}
