//! Check settings loaded via OrthoConfig.
//!
//! Every field can be set with an `API_CHECKS_*` environment variable or a
//! configuration file. Unset fields fall back to the practice backend
//! defaults.

use std::path::PathBuf;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use loan_fixtures::{FixtureRegistry, LoginCredentials, RegistryError};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::DEFAULT_CONCURRENCY;

/// Backend the checks target unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://backend.tallinn-learning.ee";
/// Request timeout unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration values controlling a check run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "API_CHECKS")]
pub struct ChecksSettings {
    /// Backend root URL.
    pub base_url: Option<String>,
    /// API key for authenticated order requests.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds. Zero falls back to the default.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Scenarios in flight at once. Zero falls back to the default.
    #[ortho_config(default = 4)]
    pub concurrency: usize,
    /// Username posted to `/login/student`.
    pub student_username: Option<String>,
    /// Password posted to `/login/student`.
    pub student_password: Option<String>,
    /// Username exchanged for an order-service API key.
    pub orders_username: Option<String>,
    /// Password exchanged for an order-service API key.
    pub orders_password: Option<String>,
    /// Optional loan fixture registry overriding the canonical table.
    pub fixtures_path: Option<PathBuf>,
}

/// Errors raised while interpreting settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The base URL is not an absolute HTTP(S) URL.
    #[error("invalid base URL '{value}': {message}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Why it was rejected.
        message: String,
    },
    /// The fixtures path is not valid UTF-8.
    #[error("fixtures path '{path}' is not valid UTF-8")]
    NonUtf8Path {
        /// Lossy rendering of the path.
        path: String,
    },
    /// The fixtures path does not name a file.
    #[error("fixtures path '{path}' does not name a file")]
    InvalidFixturesPath {
        /// Configured path.
        path: Utf8PathBuf,
    },
    /// The fixtures directory could not be opened.
    #[error("failed to open fixtures directory '{path}': {message}")]
    OpenFixturesDir {
        /// Directory that could not be opened.
        path: Utf8PathBuf,
        /// Underlying I/O error message.
        message: String,
    },
    /// The fixture registry could not be loaded.
    #[error(transparent)]
    Fixtures(#[from] RegistryError),
}

impl ChecksSettings {
    /// Return the configured base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value does not
    /// parse or is not `http`/`https`.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        let invalid = |message: String| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            message,
        };
        let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(url)
    }

    /// Return the configured request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        let secs = if self.request_timeout_secs == 0 {
            DEFAULT_REQUEST_TIMEOUT_SECS
        } else {
            self.request_timeout_secs
        };
        Duration::from_secs(secs)
    }

    /// Return the configured concurrency.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        if self.concurrency == 0 {
            DEFAULT_CONCURRENCY
        } else {
            self.concurrency
        }
    }

    /// Student credentials, when both halves are set.
    #[must_use]
    pub fn student_credentials(&self) -> Option<LoginCredentials> {
        credentials(
            self.student_username.as_deref(),
            self.student_password.as_deref(),
        )
    }

    /// Order-service credentials, when both halves are set.
    #[must_use]
    pub fn orders_credentials(&self) -> Option<LoginCredentials> {
        credentials(
            self.orders_username.as_deref(),
            self.orders_password.as_deref(),
        )
    }

    /// Loads the configured fixture registry, or the canonical one.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the path is unusable or the registry
    /// file cannot be read or parsed.
    pub fn load_registry(&self) -> Result<FixtureRegistry, SettingsError> {
        let Some(path) = &self.fixtures_path else {
            return Ok(FixtureRegistry::canonical());
        };
        let utf8 = Utf8PathBuf::from_path_buf(path.clone()).map_err(|raw| {
            SettingsError::NonUtf8Path {
                path: raw.to_string_lossy().into_owned(),
            }
        })?;
        let file_name = utf8
            .file_name()
            .ok_or_else(|| SettingsError::InvalidFixturesPath { path: utf8.clone() })?;
        let parent = utf8
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
            SettingsError::OpenFixturesDir {
                path: parent.to_path_buf(),
                message: error.to_string(),
            }
        })?;
        Ok(FixtureRegistry::from_file(&dir, Utf8Path::new(file_name))?)
    }
}

fn credentials(username: Option<&str>, password: Option<&str>) -> Option<LoginCredentials> {
    let user = username.filter(|value| !value.trim().is_empty())?;
    let secret = password.filter(|value| !value.is_empty())?;
    Some(LoginCredentials::new(user, secret))
}
