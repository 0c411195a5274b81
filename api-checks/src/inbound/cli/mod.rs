//! Command-line surface: argument parsing and report rendering.
//!
//! Arguments pick what to run and how to print it. Connection details and
//! credentials come from [`crate::config::ChecksSettings`].

mod render;

use clap::{Parser, ValueEnum};

use crate::domain::{Selection, Suite};

pub use render::{RenderError, write_catalogue, write_report};

/// `api-checks` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "api-checks",
    about = "Run end-to-end checks against the loan-decision, login, and order APIs",
    version
)]
pub struct CliArgs {
    /// Run only this suite (`loan-decision`, `login`, or `orders`). Repeatable.
    #[arg(long = "suite", value_name = "suite", value_parser = parse_suite)]
    pub suites: Vec<Suite>,
    /// Run only the scenario with this name. Repeatable.
    #[arg(long = "scenario", value_name = "name")]
    pub scenarios: Vec<String>,
    /// Print the selected scenarios without running them.
    #[arg(long)]
    pub list: bool,
    /// Backend to run against.
    #[arg(long, value_enum, default_value_t = BackendKind::Live)]
    pub backend: BackendKind,
    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Scenarios in flight at once; overrides `API_CHECKS_CONCURRENCY`.
    #[arg(long, value_name = "n")]
    pub concurrency: Option<usize>,
    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long = "log-json")]
    pub log_json: bool,
}

impl CliArgs {
    /// Suite and name filters requested on the command line.
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection::all()
            .with_suites(self.suites.clone())
            .with_names(self.scenarios.clone())
    }
}

/// Where requests are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// The configured HTTP backend.
    Live,
    /// The in-process fake backend.
    Fake,
}

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per scenario plus a summary.
    Text,
    /// The full report as pretty-printed JSON.
    Json,
}

fn parse_suite(raw: &str) -> Result<Suite, String> {
    raw.parse::<Suite>().map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn defaults_run_everything_live_as_text() {
        let args = CliArgs::try_parse_from(["api-checks"]).expect("parses");

        assert_eq!(args.backend, BackendKind::Live);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.list);
        assert_eq!(args.selection(), Selection::all());
    }

    #[test]
    fn filters_are_repeatable() {
        let args = CliArgs::try_parse_from([
            "api-checks",
            "--suite",
            "orders",
            "--suite",
            "login",
            "--scenario",
            "delete order twice",
            "--backend",
            "fake",
            "--format",
            "json",
            "--concurrency",
            "2",
        ])
        .expect("parses");

        assert_eq!(args.suites, vec![Suite::Orders, Suite::Login]);
        assert_eq!(args.scenarios, vec!["delete order twice".to_owned()]);
        assert_eq!(args.backend, BackendKind::Fake);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.concurrency, Some(2));
    }

    #[rstest]
    #[case(&["api-checks", "--suite", "payments"])]
    #[case(&["api-checks", "--backend", "staging"])]
    #[case(&["api-checks", "--concurrency", "many"])]
    fn invalid_arguments_are_rejected(#[case] argv: &[&str]) {
        assert!(CliArgs::try_parse_from(argv).is_err());
    }
}
