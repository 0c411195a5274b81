//! Fixture registry types and JSON parsing.
//!
//! The registry is the single keyed source of loan fixtures. The canonical
//! registry is built from [`LoanScenario`]'s literal table; a JSON registry
//! with the same shape can replace it when the checks run against a
//! deployment that needs different values.

use std::collections::BTreeSet;

use camino::Utf8Path;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};

use crate::atomic_io::write_atomic;
use crate::error::RegistryError;
use crate::loan::{LoanRequest, LoanScenario};

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// A registry of named loan fixtures.
///
/// # Example
///
/// ```
/// use loan_fixtures::FixtureRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "loans": [{
///         "name": "low-risk",
///         "request": {
///             "income": 2000, "debt": 0, "age": 25, "employed": true,
///             "loanAmount": 2000, "loanPeriod": 18
///         }
///     }]
/// }"#;
///
/// let registry = FixtureRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.loans().len(), 1);
/// assert_eq!(registry.find_loan("low-risk").expect("fixture").request().income, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRegistry {
    version: u32,
    loans: Vec<LoanFixture>,
}

impl FixtureRegistry {
    /// Builds the registry from the built-in canonical table.
    #[must_use]
    pub fn canonical() -> Self {
        let loans = LoanScenario::ALL
            .into_iter()
            .map(|scenario| LoanFixture {
                name: scenario.name().to_owned(),
                request: LoanRequest::for_scenario(scenario),
            })
            .collect();
        Self {
            version: SUPPORTED_VERSION,
            loans,
        }
    }

    /// Parses a fixture registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed or a field has the wrong type
    /// - The version is unsupported
    /// - The loans array is empty
    /// - A fixture name appears twice
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawFixtureRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a fixture registry from a JSON file under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(dir: &Dir, path: &Utf8Path) -> Result<Self, RegistryError> {
        let contents = dir
            .read_to_string(path)
            .map_err(|e| RegistryError::IoError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawFixtureRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.loans.is_empty() {
            return Err(RegistryError::EmptyLoans);
        }

        let mut seen = BTreeSet::new();
        for fixture in &raw.loans {
            if !seen.insert(fixture.name.as_str()) {
                return Err(RegistryError::DuplicateScenario {
                    name: fixture.name.clone(),
                });
            }
        }

        Ok(Self {
            version: raw.version,
            loans: raw.loans,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns all loan fixtures in registry order.
    #[must_use]
    pub fn loans(&self) -> &[LoanFixture] {
        &self.loans
    }

    /// Finds a loan fixture by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ScenarioNotFound`] if no fixture with the
    /// given name exists.
    pub fn find_loan(&self, name: &str) -> Result<&LoanFixture, RegistryError> {
        self.loans
            .iter()
            .find(|fixture| fixture.name == name)
            .ok_or_else(|| RegistryError::ScenarioNotFound {
                name: name.to_owned(),
            })
    }

    /// Renders the registry as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SerializeError`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        let raw = RawFixtureRegistryRef {
            version: self.version,
            loans: &self.loans,
        };
        serde_json::to_string_pretty(&raw).map_err(|e| RegistryError::SerializeError {
            message: e.to_string(),
        })
    }

    /// Writes the registry to `path` under `dir`, replacing any existing
    /// file atomically.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the registry cannot be serialised or
    /// written.
    pub fn write_to_file(&self, dir: &Dir, path: &Utf8Path) -> Result<(), RegistryError> {
        let mut contents = self.to_json()?;
        contents.push('\n');
        write_atomic(dir, path, &contents)
    }
}

/// A named loan fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanFixture {
    name: String,
    request: LoanRequest,
}

impl LoanFixture {
    /// Returns the fixture name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the request body for this fixture.
    #[must_use]
    pub const fn request(&self) -> &LoanRequest {
        &self.request
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFixtureRegistry {
    version: u32,
    loans: Vec<LoanFixture>,
}

#[derive(Serialize)]
struct RawFixtureRegistryRef<'a> {
    version: u32,
    loans: &'a [LoanFixture],
}
