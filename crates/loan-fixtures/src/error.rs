//! Error types for the loan-fixtures crate.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when loading, querying, or writing a fixture
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry file could not be written.
    #[error("failed to write registry file at '{path}': {message}")]
    WriteError {
        /// Path to the registry file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry could not be rendered as JSON.
    #[error("failed to serialise registry: {message}")]
    SerializeError {
        /// Description of the serialisation error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry contains no loan fixtures.
    #[error("registry contains no loan fixtures")]
    EmptyLoans,

    /// Two fixtures share the same name.
    #[error("loan fixture '{name}' is defined more than once")]
    DuplicateScenario {
        /// The repeated fixture name.
        name: String,
    },

    /// The requested fixture name was not found in the registry.
    #[error("loan fixture '{name}' not found in registry")]
    ScenarioNotFound {
        /// The fixture name that was not found.
        name: String,
    },
}
