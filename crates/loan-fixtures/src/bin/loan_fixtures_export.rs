//! Writes the canonical loan fixture registry to a JSON file.
//!
//! The exported file can be edited and loaded by the API checks as a
//! fixture override. Parsing and export live in `loan_fixtures::export_cli`.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use loan_fixtures::export_cli::{
    ExportCliError, ParseOutcome, parse_args, run_export, success_message,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ExportCliError> {
    match parse_args(env::args().skip(1))? {
        ParseOutcome::Help => {
            print_usage(io::stdout().lock());
            Ok(())
        }
        ParseOutcome::Options(options) => {
            let export = run_export(&options)?;
            let message = success_message(&export, options.output());
            if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
                drop(err);
            }
            Ok(())
        }
    }
}

fn print_usage(mut out: impl Write) {
    let usage = concat!(
        "Usage: loan-fixtures-export --output <path> [--force]\n",
        "\n",
        "Options:\n",
        "  --output <path>   File to write the canonical registry to\n",
        "  --force           Replace the file if it already exists\n",
        "  -h, --help        Print this help output\n",
    );
    if let Err(err) = out.write_all(usage.as_bytes()) {
        drop(err);
    }
}
