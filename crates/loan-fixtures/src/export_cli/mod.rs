//! CLI support for exporting the canonical fixture registry.
//!
//! The `loan-fixtures-export` binary delegates to these functions so the
//! parsing and export flow can be exercised without spawning a process.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;

use crate::error::RegistryError;
use crate::registry::FixtureRegistry;

/// Parsed options for the export CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    output: Utf8PathBuf,
    force: bool,
}

impl Options {
    /// Returns the path the registry will be written to.
    ///
    /// # Example
    ///
    /// ```
    /// use loan_fixtures::export_cli::{ParseOutcome, parse_args};
    ///
    /// let args = vec!["--output".to_owned(), "loans.json".to_owned()];
    /// let ParseOutcome::Options(options) = parse_args(args.into_iter()).expect("parse") else {
    ///     panic!("expected options");
    /// };
    ///
    /// assert_eq!(options.output().as_str(), "loans.json");
    /// ```
    #[must_use]
    pub fn output(&self) -> &Utf8Path {
        &self.output
    }

    /// Returns whether an existing file may be replaced.
    #[must_use]
    pub const fn force(&self) -> bool {
        self.force
    }
}

/// Outcome of parsing CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Show help output and exit successfully.
    Help,
    /// Continue with the parsed options.
    Options(Options),
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Number of loan fixtures written.
    pub loan_count: usize,
    /// Registry version written.
    pub version: u32,
}

/// Parses CLI arguments into export options.
///
/// # Errors
///
/// Returns [`ExportCliError`] when `--output` is missing, a flag lacks its
/// value, or an argument is not recognised.
pub fn parse_args<I>(mut args: I) -> Result<ParseOutcome, ExportCliError>
where
    I: Iterator<Item = String>,
{
    let mut output: Option<Utf8PathBuf> = None;
    let mut force = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(ParseOutcome::Help),
            "--output" => {
                let value = args.next().ok_or(ExportCliError::MissingValue { flag: "--output" })?;
                output = Some(Utf8PathBuf::from(value));
            }
            "--force" => force = true,
            _ => return Err(ExportCliError::UnknownArgument { value: arg }),
        }
    }

    let resolved_output = output.ok_or(ExportCliError::MissingOutputPath)?;
    Ok(ParseOutcome::Options(Options {
        output: resolved_output,
        force,
    }))
}

/// Writes the canonical registry to the configured output path.
///
/// # Errors
///
/// Returns [`ExportCliError`] when the target exists without `--force`, the
/// parent directory cannot be opened, or the write fails.
pub fn run_export(options: &Options) -> Result<Export, ExportCliError> {
    let parent = options
        .output
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = options
        .output
        .file_name()
        .ok_or_else(|| ExportCliError::InvalidOutputPath {
            path: options.output.clone(),
        })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
        ExportCliError::OpenDirectory {
            path: parent.to_path_buf(),
            message: err.to_string(),
        }
    })?;

    if !options.force && dir.exists(file_name) {
        return Err(ExportCliError::OutputExists {
            path: options.output.clone(),
        });
    }

    let registry = FixtureRegistry::canonical();
    registry.write_to_file(&dir, Utf8Path::new(file_name))?;

    Ok(Export {
        loan_count: registry.loans().len(),
        version: registry.version(),
    })
}

/// Formats the success message emitted by the CLI.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use loan_fixtures::export_cli::{Export, success_message};
///
/// let message = success_message(&Export { loan_count: 10, version: 1 }, Utf8Path::new("loans.json"));
/// assert_eq!(message, "Wrote 10 loan fixtures (version 1) to loans.json");
/// ```
#[must_use]
pub fn success_message(export: &Export, output: &Utf8Path) -> String {
    format!(
        "Wrote {} loan fixtures (version {}) to {output}",
        export.loan_count, export.version
    )
}

/// Errors surfaced by the export CLI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportCliError {
    /// Output path was not supplied.
    #[error("missing required flag: --output")]
    MissingOutputPath,
    /// A flag expected a value but none was provided.
    #[error("missing value for {flag}")]
    MissingValue {
        /// Flag that was missing its value.
        flag: &'static str,
    },
    /// An unsupported argument was supplied.
    #[error("unknown argument: {value}")]
    UnknownArgument {
        /// Argument value that was not recognised.
        value: String,
    },
    /// The output path does not name a file.
    #[error("output path '{path}' does not name a file")]
    InvalidOutputPath {
        /// The rejected path.
        path: Utf8PathBuf,
    },
    /// The output directory could not be opened.
    #[error("failed to open directory '{path}': {message}")]
    OpenDirectory {
        /// Directory that could not be opened.
        path: Utf8PathBuf,
        /// Underlying I/O error message.
        message: String,
    },
    /// The output file exists and `--force` was not given.
    #[error("'{path}' already exists; pass --force to replace it")]
    OutputExists {
        /// Existing output path.
        path: Utf8PathBuf,
    },
    /// Writing the registry failed.
    #[error("registry error: {source}")]
    Registry {
        /// Underlying registry error.
        #[from]
        source: RegistryError,
    },
}
