//! Expected status codes and body shapes for one request.

use std::fmt;

use serde_json::Value;

use super::assertions::SoftAssertions;
use super::ports::TransportResponse;

/// Accepted status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusExpectation {
    /// Exactly one code is accepted.
    Exact(u16),
    /// Any listed code is accepted.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Returns `true` when `status` is accepted.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => *expected == status,
            Self::OneOf(accepted) => accepted.contains(&status),
        }
    }
}

impl fmt::Display for StatusExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(expected) => write!(f, "{expected}"),
            Self::OneOf(accepted) => {
                let codes: Vec<String> = accepted.iter().map(u16::to_string).collect();
                f.write_str(&codes.join(" or "))
            }
        }
    }
}

/// A check on one top-level field of a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldExpectation {
    /// The field is present and not `null`.
    Defined,
    /// The field equals the given value.
    Equals(Value),
}

/// A named field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    /// Top-level field name.
    pub field: String,
    /// What the field must satisfy.
    pub expectation: FieldExpectation,
}

impl FieldCheck {
    /// The field must be present and non-null.
    #[must_use]
    pub fn defined(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            expectation: FieldExpectation::Defined,
        }
    }

    /// The field must equal `value`.
    #[must_use]
    pub fn equals(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_owned(),
            expectation: FieldExpectation::Equals(value.into()),
        }
    }
}

/// Expected response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyExpectation {
    /// The body is not inspected.
    Ignored,
    /// The body is empty or whitespace.
    Empty,
    /// The body is non-blank text.
    NonEmptyText,
    /// The body parses as JSON and satisfies every field check.
    Json(Vec<FieldCheck>),
}

/// Status and body expectation for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// Accepted status codes.
    pub status: StatusExpectation,
    /// Expected body shape.
    pub body: BodyExpectation,
}

impl Expectation {
    /// Expects `status` and ignores the body.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self {
            status: StatusExpectation::Exact(status),
            body: BodyExpectation::Ignored,
        }
    }

    /// Expects any of `statuses` and ignores the body.
    #[must_use]
    pub fn one_of(statuses: &[u16]) -> Self {
        Self {
            status: StatusExpectation::OneOf(statuses.to_vec()),
            body: BodyExpectation::Ignored,
        }
    }

    /// Replaces the body expectation.
    #[must_use]
    pub fn with_body(mut self, body: BodyExpectation) -> Self {
        self.body = body;
        self
    }

    /// Records every mismatch between `response` and this expectation.
    ///
    /// Status and body are both checked even when the status is wrong.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_checks::domain::{BodyExpectation, Expectation, FieldCheck, SoftAssertions};
    /// use api_checks::domain::ports::TransportResponse;
    ///
    /// let expectation = Expectation::status(200).with_body(BodyExpectation::Json(vec![
    ///     FieldCheck::equals("riskDecision", "positive"),
    /// ]));
    /// let mut assertions = SoftAssertions::new();
    /// expectation.evaluate(
    ///     &TransportResponse::new(200, r#"{"riskDecision":"negative"}"#),
    ///     &mut assertions,
    /// );
    ///
    /// assert_eq!(assertions.failures().len(), 1);
    /// ```
    pub fn evaluate(&self, response: &TransportResponse, assertions: &mut SoftAssertions) {
        assertions.check(self.status.matches(response.status), || {
            format!(
                "expected status {}, got {}",
                self.status, response.status
            )
        });
        evaluate_body(&self.body, &response.body, assertions);
    }
}

fn evaluate_body(expectation: &BodyExpectation, body: &str, assertions: &mut SoftAssertions) {
    match expectation {
        BodyExpectation::Ignored => {}
        BodyExpectation::Empty => {
            assertions.check(body.trim().is_empty(), || {
                format!("expected an empty body, got '{}'", preview(body))
            });
        }
        BodyExpectation::NonEmptyText => {
            assertions.check(!body.trim().is_empty(), || {
                "expected a non-empty body".to_owned()
            });
        }
        BodyExpectation::Json(checks) => match serde_json::from_str::<Value>(body) {
            Ok(document) => {
                for check in checks {
                    evaluate_field(check, &document, assertions);
                }
            }
            Err(error) => {
                assertions.fail(format!(
                    "expected a JSON body ({error}), got '{}'",
                    preview(body)
                ));
            }
        },
    }
}

fn evaluate_field(check: &FieldCheck, document: &Value, assertions: &mut SoftAssertions) {
    let actual = document.get(&check.field);
    match &check.expectation {
        FieldExpectation::Defined => {
            assertions.check(actual.is_some_and(|value| !value.is_null()), || {
                format!("expected field '{}' to be defined", check.field)
            });
        }
        FieldExpectation::Equals(expected) => {
            assertions.check(actual == Some(expected), || {
                let shown = actual.map_or_else(|| "nothing".to_owned(), Value::to_string);
                format!(
                    "expected field '{}' to equal {expected}, got {shown}",
                    check.field
                )
            });
        }
    }
}

fn preview(body: &str) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let head: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{head}...")
    } else {
        compact
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn evaluate(expectation: &Expectation, status: u16, body: &str) -> Vec<String> {
        let mut assertions = SoftAssertions::new();
        expectation.evaluate(&TransportResponse::new(status, body), &mut assertions);
        assertions
            .into_failures()
            .into_iter()
            .map(|failure| failure.message)
            .collect()
    }

    #[rstest]
    #[case(StatusExpectation::Exact(204), 204, true)]
    #[case(StatusExpectation::Exact(204), 200, false)]
    #[case(StatusExpectation::OneOf(vec![200, 201]), 201, true)]
    #[case(StatusExpectation::OneOf(vec![200, 201]), 400, false)]
    fn status_matching(
        #[case] expectation: StatusExpectation,
        #[case] status: u16,
        #[case] accepted: bool,
    ) {
        assert_eq!(expectation.matches(status), accepted);
    }

    #[test]
    fn one_of_statuses_render_as_alternatives() {
        assert_eq!(StatusExpectation::OneOf(vec![200, 204]).to_string(), "200 or 204");
    }

    #[rstest]
    #[case(BodyExpectation::Empty, "", true)]
    #[case(BodyExpectation::Empty, "  \n", true)]
    #[case(BodyExpectation::Empty, "{}", false)]
    #[case(BodyExpectation::NonEmptyText, "token-123", true)]
    #[case(BodyExpectation::NonEmptyText, "", false)]
    #[case(BodyExpectation::Json(Vec::new()), "{\"id\":1}", true)]
    #[case(BodyExpectation::Json(Vec::new()), "not json", false)]
    #[case(BodyExpectation::Ignored, "anything", true)]
    fn body_shapes(#[case] body: BodyExpectation, #[case] text: &str, #[case] passes: bool) {
        let expectation = Expectation::status(200).with_body(body);

        assert_eq!(evaluate(&expectation, 200, text).is_empty(), passes);
    }

    #[test]
    fn every_mismatch_is_collected() {
        let expectation = Expectation::status(200).with_body(BodyExpectation::Json(vec![
            FieldCheck::defined("applicationId"),
            FieldCheck::equals("riskLevel", "Low Risk"),
            FieldCheck::equals("riskPeriods", json!([12, 18, 24, 30, 36])),
        ]));

        let failures = evaluate(
            &expectation,
            400,
            r#"{"applicationId":null,"riskLevel":"High Risk","riskPeriods":[3,6]}"#,
        );

        assert_eq!(failures.len(), 4, "{failures:?}");
        assert_eq!(failures[0], "expected status 200, got 400");
        assert!(failures[1].contains("applicationId"));
        assert!(failures[2].contains("\"High Risk\""));
    }

    #[test]
    fn missing_fields_are_reported_as_nothing() {
        let expectation = Expectation::status(200).with_body(BodyExpectation::Json(vec![
            FieldCheck::equals("riskDecision", "positive"),
        ]));

        let failures = evaluate(&expectation, 200, "{}");

        assert_eq!(
            failures,
            vec!["expected field 'riskDecision' to equal \"positive\", got nothing".to_owned()]
        );
    }

    #[test]
    fn long_bodies_are_truncated_in_messages() {
        let body = "x".repeat(500);
        let failures = evaluate(
            &Expectation::status(400).with_body(BodyExpectation::Empty),
            400,
            &body,
        );

        assert!(failures[0].ends_with("...'"));
        assert!(failures[0].len() < 200);
    }
}
