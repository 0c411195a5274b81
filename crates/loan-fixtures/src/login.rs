//! Credentials payload for the student login endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Username and password pair posted to `/login/student`.
///
/// `Debug` redacts the password so credentials never reach logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl LoginCredentials {
    /// Builds a credentials payload.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_password() {
        let credentials = LoginCredentials::new("student", "s3cret");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("student"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn serialises_plain_field_names() {
        let json = serde_json::to_value(LoginCredentials::new("a", "b")).expect("serialise");
        assert_eq!(json, serde_json::json!({ "username": "a", "password": "b" }));
    }
}
