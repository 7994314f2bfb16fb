use anyhow::{Result, bail};
use conduit_e2e_core::config::Config;
use conduit_e2e_core::{RunEvent, RunReport, Suite, SuiteRunner};
use tracing::info;

use crate::ux::{ScenarioSpinner, format_outcome, format_summary};

/// Turns a finished run into the process result.
pub fn check_report(report: &RunReport) -> Result<()> {
    if !report.is_success() {
        bail!(
            "{} of {} scenarios failed",
            report.failed(),
            report.outcomes.len()
        );
    }
    Ok(())
}

pub async fn execute(config: &Config) -> Result<()> {
    let scenarios = Suite::builtin().select(&config.spec_pattern)?;
    if scenarios.is_empty() {
        bail!("No scenarios match '{}'", config.spec_pattern);
    }

    info!(
        base_url = %config.base_url,
        spec = %config.spec_pattern,
        count = scenarios.len(),
        "Running scenarios"
    );
    println!(
        "Running {} scenarios against {}\n",
        scenarios.len(),
        config.base_url
    );

    let runner = SuiteRunner::new(config)?;
    let mut spinner: Option<ScenarioSpinner> = None;
    let report = runner
        .run(&scenarios, |event| match event {
            RunEvent::Started(scenario) => {
                spinner = Some(ScenarioSpinner::new(scenario.id()));
            }
            RunEvent::Finished(outcome) => {
                if let Some(spinner) = spinner.take() {
                    spinner.clear();
                }
                println!("{}", format_outcome(outcome));
            }
        })
        .await;

    println!("\n{}", format_summary(&report));
    check_report(&report)
}
