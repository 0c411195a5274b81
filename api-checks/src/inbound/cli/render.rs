//! Writers for the catalogue listing and the run report.

use std::io::{self, Write};

use thiserror::Error;

use super::OutputFormat;
use crate::domain::{Scenario, ScenarioOutcome, ScenarioReport, SuiteReport};

/// Errors raised while writing output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output stream rejected a write.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    /// The report could not be encoded as JSON.
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Writes one line per scenario: suite, name, and its requests.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_catalogue(out: &mut impl Write, scenarios: &[Scenario]) -> io::Result<()> {
    for scenario in scenarios {
        let requests = scenario
            .steps()
            .iter()
            .map(|step| format!("{} {}", step.request.method, step.request.path))
            .collect::<Vec<_>>()
            .join(" then ");
        writeln!(
            out,
            "{:<14} {:<40} {requests}",
            scenario.suite().as_str(),
            scenario.name()
        )?;
    }
    Ok(())
}

/// Writes `report` in the requested format.
///
/// # Errors
///
/// Returns [`RenderError`] when writing or encoding fails.
pub fn write_report(
    out: &mut impl Write,
    report: &SuiteReport,
    format: OutputFormat,
) -> Result<(), RenderError> {
    match format {
        OutputFormat::Text => write_text(out, report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text(out: &mut impl Write, report: &SuiteReport) -> io::Result<()> {
    for scenario in &report.scenarios {
        write_scenario(out, scenario)?;
    }
    let summary = report.summary;
    writeln!(out)?;
    writeln!(
        out,
        "{} scenarios: {} passed, {} failed, {} errored, {} skipped (run {})",
        summary.total,
        summary.passed,
        summary.failed,
        summary.errored,
        summary.skipped,
        report.run_id
    )
}

fn write_scenario(out: &mut impl Write, scenario: &ScenarioReport) -> io::Result<()> {
    let tag = match scenario.outcome {
        ScenarioOutcome::Passed => "PASS",
        ScenarioOutcome::Failed { .. } => "FAIL",
        ScenarioOutcome::Errored { .. } => "ERROR",
        ScenarioOutcome::Skipped { .. } => "SKIP",
    };
    let head = format!("{tag:<5} {:<14} {}", scenario.suite.as_str(), scenario.name);
    match &scenario.outcome {
        ScenarioOutcome::Passed => writeln!(out, "{head}"),
        ScenarioOutcome::Skipped { reason } => writeln!(out, "{head} ({reason})"),
        ScenarioOutcome::Errored { step, message } => {
            writeln!(out, "{head} (step {step}): {message}")
        }
        ScenarioOutcome::Failed { failures } => {
            writeln!(out, "{head}")?;
            for failure in failures {
                writeln!(out, "      step {}: {}", failure.step, failure.message)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use loan_fixtures::FixtureRegistry;
    use serde_json::Value;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{AssertionFailure, Suite, catalogue};

    fn scenario(name: &str, suite: Suite, outcome: ScenarioOutcome) -> ScenarioReport {
        ScenarioReport {
            name: name.to_owned(),
            suite,
            steps_run: 1,
            outcome,
        }
    }

    fn sample_report() -> SuiteReport {
        let at = Utc
            .with_ymd_and_hms(2026, 10, 16, 9, 0, 0)
            .single()
            .expect("valid time");
        SuiteReport::new(
            Uuid::nil(),
            at,
            at,
            vec![
                scenario("low risk", Suite::LoanDecision, ScenarioOutcome::Passed),
                scenario(
                    "update order",
                    Suite::Orders,
                    ScenarioOutcome::Failed {
                        failures: vec![AssertionFailure {
                            step: 1,
                            message: "expected status 200, got 400".to_owned(),
                        }],
                    },
                ),
                scenario(
                    "get order",
                    Suite::Orders,
                    ScenarioOutcome::Errored {
                        step: 1,
                        message: "request timed out: 30s".to_owned(),
                    },
                ),
                scenario(
                    "student login",
                    Suite::Login,
                    ScenarioOutcome::Skipped {
                        reason: "needs student credentials".to_owned(),
                    },
                ),
            ],
        )
    }

    fn render(format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        write_report(&mut buffer, &sample_report(), format).expect("render");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn text_report_lists_every_outcome_and_failure() {
        let text = render(OutputFormat::Text);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines.first().is_some_and(|line| line.starts_with("PASS ")));
        assert!(text.contains("FAIL  orders"));
        assert!(text.contains("      step 1: expected status 200, got 400"));
        assert!(text.contains("(step 1): request timed out: 30s"));
        assert!(text.contains("(needs student credentials)"));
        assert!(lines.last().is_some_and(|line| {
            line.starts_with("4 scenarios: 1 passed, 1 failed, 1 errored, 1 skipped")
        }));
    }

    #[test]
    fn json_report_is_machine_readable() {
        let text = render(OutputFormat::Json);
        let value: Value = serde_json::from_str(&text).expect("valid JSON");

        assert_eq!(value["summary"]["total"], 4);
        assert_eq!(value["scenarios"][1]["outcome"], "failed");
        assert_eq!(value["scenarios"][3]["suite"], "login");
    }

    #[test]
    fn catalogue_listing_shows_chained_requests() {
        let scenarios = catalogue(&FixtureRegistry::canonical());
        let mut buffer = Vec::new();

        write_catalogue(&mut buffer, &scenarios).expect("render");
        let text = String::from_utf8(buffer).expect("utf-8 output");

        assert_eq!(text.lines().count(), scenarios.len());
        assert!(text.contains("DELETE /test-orders/2 then DELETE /test-orders/2"));
    }
}
