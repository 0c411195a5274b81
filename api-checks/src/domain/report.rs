//! Per-scenario outcomes and the run summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::assertions::AssertionFailure;
use super::scenario::Suite;

/// How one scenario ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// Every check in every step held.
    Passed,
    /// At least one check failed; all failures are listed.
    Failed {
        /// Collected soft-assertion failures.
        failures: Vec<AssertionFailure>,
    },
    /// A request could not be completed; later steps did not run.
    Errored {
        /// Step that could not complete, starting at 1.
        step: usize,
        /// Transport or request error.
        message: String,
    },
    /// The scenario needs context the run does not have.
    Skipped {
        /// What was missing.
        reason: String,
    },
}

impl ScenarioOutcome {
    /// Short lower-case label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed { .. } => "failed",
            Self::Errored { .. } => "errored",
            Self::Skipped { .. } => "skipped",
        }
    }

    /// `true` unless the scenario failed or errored.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Passed | Self::Skipped { .. })
    }
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Owning suite.
    pub suite: Suite,
    /// Number of steps that received a response.
    pub steps_run: usize,
    /// How the scenario ended.
    #[serde(flatten)]
    pub outcome: ScenarioOutcome,
}

/// Outcome counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Scenarios run or skipped.
    pub total: usize,
    /// Scenarios that passed.
    pub passed: usize,
    /// Scenarios with failed checks.
    pub failed: usize,
    /// Scenarios cut short by a transport error.
    pub errored: usize,
    /// Scenarios not run for lack of context.
    pub skipped: usize,
}

impl Summary {
    fn tally(scenarios: &[ScenarioReport]) -> Self {
        scenarios
            .iter()
            .fold(Self::default(), |mut summary, report| {
                summary.total += 1;
                match report.outcome {
                    ScenarioOutcome::Passed => summary.passed += 1,
                    ScenarioOutcome::Failed { .. } => summary.failed += 1,
                    ScenarioOutcome::Errored { .. } => summary.errored += 1,
                    ScenarioOutcome::Skipped { .. } => summary.skipped += 1,
                }
                summary
            })
    }
}

/// Results of one run, in catalogue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Identifier for correlating logs with this report.
    pub run_id: Uuid,
    /// When the first scenario started.
    pub started_at: DateTime<Utc>,
    /// When the last scenario finished.
    pub finished_at: DateTime<Utc>,
    /// Outcome counts.
    pub summary: Summary,
    /// Per-scenario results.
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Builds a report and tallies its summary.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        scenarios: Vec<ScenarioReport>,
    ) -> Self {
        Self {
            run_id,
            started_at,
            finished_at,
            summary: Summary::tally(&scenarios),
            scenarios,
        }
    }

    /// `true` when no scenario failed or errored.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.scenarios
            .iter()
            .all(|report| report.outcome.is_success())
    }
}
