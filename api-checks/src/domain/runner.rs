//! Executes scenarios against an injected transport.
//!
//! Scenarios run with bounded concurrency and are reported in the order they
//! were given, regardless of completion order. Within a scenario, steps run
//! in sequence and every check is a soft assertion; a transport error stops
//! the scenario with an errored outcome. Nothing is retried.

use std::sync::Arc;

use futures_util::{StreamExt, stream};
use mockable::Clock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::assertions::SoftAssertions;
use super::ports::HttpTransport;
use super::report::{ScenarioOutcome, ScenarioReport, SuiteReport};
use super::scenario::Scenario;
use super::session::CheckContext;

/// Scenarios in flight at once unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Runs scenarios and collects their reports.
pub struct ScenarioRunner {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    concurrency: usize,
}

impl ScenarioRunner {
    /// Builds a runner with [`DEFAULT_CONCURRENCY`].
    /// ```rust,ignore
    /// let runner = ScenarioRunner::new(Arc::new(transport), Arc::new(DefaultClock));
    /// ```
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transport,
            clock,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many scenarios may run at once. Zero is treated as one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Configured concurrency limit.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs every scenario and returns the reports in input order.
    /// ```rust,ignore
    /// let report = runner.run(&scenarios, &context).await;
    /// assert_eq!(report.scenarios.len(), scenarios.len());
    /// ```
    pub async fn run(&self, scenarios: &[Scenario], context: &CheckContext) -> SuiteReport {
        let run_id = Uuid::new_v4();
        let started_at = self.clock.utc();
        info!(
            %run_id,
            scenarios = scenarios.len(),
            concurrency = self.concurrency,
            "starting API checks"
        );

        let reports: Vec<ScenarioReport> = stream::iter(scenarios)
            .map(|scenario| self.run_scenario(scenario, context))
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = SuiteReport::new(run_id, started_at, self.clock.utc(), reports);
        info!(
            %run_id,
            passed = report.summary.passed,
            failed = report.summary.failed,
            errored = report.summary.errored,
            skipped = report.summary.skipped,
            "API checks finished"
        );
        report
    }

    /// Runs one scenario's steps in order.
    /// ```rust,ignore
    /// let report = runner.run_scenario(&scenario, &context).await;
    /// assert!(report.outcome.is_success());
    /// ```
    pub async fn run_scenario(&self, scenario: &Scenario, context: &CheckContext) -> ScenarioReport {
        let name = scenario.name();
        let finish = |steps_run: usize, outcome: ScenarioOutcome| {
            info!(scenario = name, outcome = outcome.label(), "scenario finished");
            ScenarioReport {
                name: name.to_owned(),
                suite: scenario.suite(),
                steps_run,
                outcome,
            }
        };

        if let Some(missing) = context.first_unmet(&scenario.requirements()) {
            return finish(
                0,
                ScenarioOutcome::Skipped {
                    reason: format!("needs {missing}"),
                },
            );
        }

        let mut assertions = SoftAssertions::new();
        let mut steps_run = 0;
        for (step_number, step) in (1..).zip(scenario.steps()) {
            assertions.begin_step(step_number);
            let request = match step.request.resolve(context) {
                Ok(request) => request,
                Err(error) => {
                    return finish(
                        steps_run,
                        ScenarioOutcome::Errored {
                            step: step_number,
                            message: error.to_string(),
                        },
                    );
                }
            };

            debug!(
                scenario = name,
                step = step_number,
                method = %request.method,
                path = %request.path,
                "sending request"
            );
            match self.transport.send(&request).await {
                Ok(response) => {
                    debug!(
                        scenario = name,
                        step = step_number,
                        status = response.status,
                        body_len = response.body.len(),
                        "received response"
                    );
                    steps_run += 1;
                    step.expectation.evaluate(&response, &mut assertions);
                }
                Err(error) => {
                    warn!(scenario = name, step = step_number, %error, "request failed");
                    return finish(
                        steps_run,
                        ScenarioOutcome::Errored {
                            step: step_number,
                            message: error.to_string(),
                        },
                    );
                }
            }
        }

        let outcome = if assertions.is_clean() {
            ScenarioOutcome::Passed
        } else {
            ScenarioOutcome::Failed {
                failures: assertions.into_failures(),
            }
        };
        finish(steps_run, outcome)
    }
}
