//! Scenario selection and sequential execution.
use std::time::{Duration, Instant};

use glob::{MatchOptions, Pattern};
use tracing::{Instrument, info, info_span, warn};

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::HarnessError;
use crate::fixtures::FixtureFactory;
use crate::scenario::{Scenario, ScenarioContext};
use crate::suites;

/// An ordered collection of scenarios.
#[derive(Debug, Clone)]
pub struct Suite {
    scenarios: Vec<Scenario>,
}

impl Suite {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    pub fn builtin() -> Self {
        Self::new(suites::all())
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Scenarios whose `file` matches `pattern`, in suite order.
    ///
    /// `*` stops at `/`; use `**` to cross directories.
    pub fn select(&self, pattern: &str) -> Result<Vec<Scenario>, HarnessError> {
        let compiled = Pattern::new(pattern).map_err(|e| HarnessError::Pattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        Ok(self
            .scenarios
            .iter()
            .filter(|scenario| compiled.matches_with(scenario.file, options))
            .copied()
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioStatus {
    Passed,
    Failed(String),
    TimedOut(Duration),
}

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub id: String,
    pub status: ScenarioStatus,
    pub elapsed: Duration,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

/// Progress notifications emitted by [`SuiteRunner::run`].
#[derive(Debug)]
pub enum RunEvent<'a> {
    Started(&'a Scenario),
    Finished(&'a ScenarioOutcome),
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn elapsed(&self) -> Duration {
        self.outcomes.iter().map(|o| o.elapsed).sum()
    }
}

/// Runs scenarios one after another against the configured API.
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    client: ApiClient,
    fixtures: FixtureFactory,
    scenario_timeout: Duration,
}

impl SuiteRunner {
    pub fn new(config: &Config) -> Result<Self, HarnessError> {
        Ok(Self {
            client: ApiClient::new(config)?,
            fixtures: FixtureFactory::from_config(config),
            scenario_timeout: config.scenario_timeout(),
        })
    }

    pub fn with_scenario_timeout(mut self, scenario_timeout: Duration) -> Self {
        self.scenario_timeout = scenario_timeout;
        self
    }

    /// Runs one scenario with its own, empty scratch store.
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioOutcome {
        let id = scenario.id();
        let mut ctx = ScenarioContext::new(self.client.clone(), self.fixtures.clone());
        let started = Instant::now();

        let result = tokio::time::timeout(self.scenario_timeout, (scenario.run)(&mut ctx))
            .instrument(info_span!("scenario", id = %id))
            .await;
        let elapsed = started.elapsed();

        let status = match result {
            Ok(Ok(())) => {
                info!(%id, elapsed_ms = elapsed.as_millis() as u64, "Scenario passed");
                ScenarioStatus::Passed
            }
            Ok(Err(e)) => {
                warn!(%id, error = %e, "Scenario failed");
                ScenarioStatus::Failed(e.to_string())
            }
            Err(_) => {
                warn!(%id, timeout_secs = self.scenario_timeout.as_secs_f64(), "Scenario timed out");
                ScenarioStatus::TimedOut(self.scenario_timeout)
            }
        };

        ScenarioOutcome {
            id,
            status,
            elapsed,
        }
    }

    /// Runs `scenarios` in order. A failing scenario never stops the run.
    pub async fn run<F>(&self, scenarios: &[Scenario], mut on_event: F) -> RunReport
    where
        F: FnMut(RunEvent<'_>),
    {
        let mut report = RunReport::default();
        for scenario in scenarios {
            on_event(RunEvent::Started(scenario));
            let outcome = self.run_scenario(scenario).await;
            on_event(RunEvent::Finished(&outcome));
            report.outcomes.push(outcome);
        }
        info!(
            passed = report.passed(),
            failed = report.failed(),
            "Run finished"
        );
        report
    }
}
