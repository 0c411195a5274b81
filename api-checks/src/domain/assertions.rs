//! Soft assertions collected across the steps of one scenario.

use serde::Serialize;

/// One failed check, tagged with the 1-based step it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionFailure {
    /// Step number within the scenario, starting at 1.
    pub step: usize,
    /// Human-readable description of the mismatch.
    pub message: String,
}

/// Records failed checks without stopping at the first one.
///
/// # Examples
///
/// ```
/// use api_checks::domain::SoftAssertions;
///
/// let mut assertions = SoftAssertions::new();
/// assertions.begin_step(1);
/// assertions.check(true, || "status".to_owned());
/// assertions.check(false, || "riskLevel differs".to_owned());
/// assertions.check(false, || "riskDecision differs".to_owned());
///
/// assert_eq!(assertions.failures().len(), 2);
/// assert_eq!(assertions.failures()[0].step, 1);
/// ```
#[derive(Debug, Default)]
pub struct SoftAssertions {
    step: usize,
    failures: Vec<AssertionFailure>,
}

impl SoftAssertions {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes subsequent failures to `step`.
    pub const fn begin_step(&mut self, step: usize) {
        self.step = step;
    }

    /// Records a failure when `condition` is false. Returns `condition`.
    pub fn check(&mut self, condition: bool, message: impl FnOnce() -> String) -> bool {
        if !condition {
            self.fail(message());
        }
        condition
    }

    /// Records an unconditional failure.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.failures.push(AssertionFailure {
            step: self.step,
            message: message.into(),
        });
    }

    /// Failures recorded so far, in order.
    #[must_use]
    pub fn failures(&self) -> &[AssertionFailure] {
        &self.failures
    }

    /// Returns `true` when nothing has failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Consumes the collector and returns its failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<AssertionFailure> {
        self.failures
    }
}
