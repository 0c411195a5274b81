//! Loan application payloads and the canonical scenario table.
//!
//! Each [`LoanScenario`] maps to exactly one literal [`LoanRequest`]. The
//! values are chosen to drive one decision path in the loan calculator, so
//! they must not be derived or randomised.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One loan application as sent to the decision endpoint.
///
/// Money fields are signed so that invalid fixtures (a negative amount) can
/// be expressed; validation is the backend's job.
///
/// # Example
///
/// ```
/// use loan_fixtures::LoanRequest;
///
/// let request = LoanRequest::medium_risk();
/// let json = serde_json::to_value(&request).expect("serialise");
///
/// assert_eq!(json["loanAmount"], 500);
/// assert_eq!(json["loanPeriod"], 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    /// Monthly income.
    pub income: i64,
    /// Outstanding monthly debt.
    pub debt: i64,
    /// Applicant age in years.
    pub age: u32,
    /// Whether the applicant is currently employed.
    pub employed: bool,
    /// Requested loan amount.
    pub loan_amount: i64,
    /// Requested repayment period in months.
    pub loan_period: u32,
}

impl LoanRequest {
    /// Builds a request from literal field values.
    #[must_use]
    pub const fn new(
        income: i64,
        debt: i64,
        age: u32,
        employed: bool,
        loan_amount: i64,
        loan_period: u32,
    ) -> Self {
        Self {
            income,
            debt,
            age,
            employed,
            loan_amount,
            loan_period,
        }
    }

    /// Returns the canonical request for a named scenario.
    #[must_use]
    pub const fn for_scenario(scenario: LoanScenario) -> Self {
        match scenario {
            LoanScenario::LowRisk => Self::new(1500, 0, 25, true, 2000, 18),
            LoanScenario::MediumRisk => Self::new(20_000, 0, 30, true, 500, 9),
            LoanScenario::HighRisk => Self::new(1500, 1000, 20, true, 5000, 3),
            LoanScenario::InsufficientIncome => Self::new(0, 0, 20, true, 5000, 7),
            LoanScenario::HighLoanAmount => Self::new(1500, 1000, 20, true, 500_000_000, 7),
            LoanScenario::VeryShortLoanPeriod => Self::new(1500, 1000, 20, true, 5000, 1),
            LoanScenario::Unemployed => Self::new(1500, 1000, 20, false, 5000, 7),
            LoanScenario::MinimumAge => Self::new(1500, 1000, 18, true, 5000, 7),
            LoanScenario::InvalidLoanAmount => Self::new(1500, 1000, 20, true, -5000, 7),
            LoanScenario::ZeroIncomeEmployed => Self::new(0, 0, 20, true, 5000, 7),
        }
    }

    /// Applicant expected to land in the low risk band.
    #[must_use]
    pub const fn low_risk() -> Self {
        Self::for_scenario(LoanScenario::LowRisk)
    }

    /// Applicant expected to land in the medium risk band.
    #[must_use]
    pub const fn medium_risk() -> Self {
        Self::for_scenario(LoanScenario::MediumRisk)
    }

    /// Applicant expected to land in the high risk band.
    #[must_use]
    pub const fn high_risk() -> Self {
        Self::for_scenario(LoanScenario::HighRisk)
    }

    /// Applicant with no income at all.
    #[must_use]
    pub const fn insufficient_income() -> Self {
        Self::for_scenario(LoanScenario::InsufficientIncome)
    }

    /// Amount far above any sane lending ceiling.
    #[must_use]
    pub const fn high_loan_amount() -> Self {
        Self::for_scenario(LoanScenario::HighLoanAmount)
    }

    /// One-month repayment period.
    #[must_use]
    pub const fn very_short_loan_period() -> Self {
        Self::for_scenario(LoanScenario::VeryShortLoanPeriod)
    }

    /// Applicant with income but no employment.
    #[must_use]
    pub const fn unemployed() -> Self {
        Self::for_scenario(LoanScenario::Unemployed)
    }

    /// Applicant at the minimum lending age.
    #[must_use]
    pub const fn minimum_age() -> Self {
        Self::for_scenario(LoanScenario::MinimumAge)
    }

    /// Negative loan amount.
    #[must_use]
    pub const fn invalid_loan_amount() -> Self {
        Self::for_scenario(LoanScenario::InvalidLoanAmount)
    }

    /// Employed applicant reporting zero income.
    #[must_use]
    pub const fn zero_income_employed() -> Self {
        Self::for_scenario(LoanScenario::ZeroIncomeEmployed)
    }
}

/// Named loan scenarios in the canonical fixture table.
///
/// Scenario names are kebab-case and stable; they key the JSON registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoanScenario {
    /// `low-risk`
    LowRisk,
    /// `medium-risk`
    MediumRisk,
    /// `high-risk`
    HighRisk,
    /// `insufficient-income`
    InsufficientIncome,
    /// `high-loan-amount`
    HighLoanAmount,
    /// `very-short-loan-period`
    VeryShortLoanPeriod,
    /// `unemployed`
    Unemployed,
    /// `minimum-age`
    MinimumAge,
    /// `invalid-loan-amount`
    InvalidLoanAmount,
    /// `zero-income-employed`
    ZeroIncomeEmployed,
}

impl LoanScenario {
    /// Every scenario in table order.
    pub const ALL: [Self; 10] = [
        Self::LowRisk,
        Self::MediumRisk,
        Self::HighRisk,
        Self::InsufficientIncome,
        Self::HighLoanAmount,
        Self::VeryShortLoanPeriod,
        Self::Unemployed,
        Self::MinimumAge,
        Self::InvalidLoanAmount,
        Self::ZeroIncomeEmployed,
    ];

    /// Returns the stable registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LowRisk => "low-risk",
            Self::MediumRisk => "medium-risk",
            Self::HighRisk => "high-risk",
            Self::InsufficientIncome => "insufficient-income",
            Self::HighLoanAmount => "high-loan-amount",
            Self::VeryShortLoanPeriod => "very-short-loan-period",
            Self::Unemployed => "unemployed",
            Self::MinimumAge => "minimum-age",
            Self::InvalidLoanAmount => "invalid-loan-amount",
            Self::ZeroIncomeEmployed => "zero-income-employed",
        }
    }
}

impl fmt::Display for LoanScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a canonical loan scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown loan scenario '{name}'")]
pub struct UnknownLoanScenario {
    /// The rejected name.
    pub name: String,
}

impl FromStr for LoanScenario {
    type Err = UnknownLoanScenario;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name() == value)
            .ok_or_else(|| UnknownLoanScenario {
                name: value.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(LoanScenario::LowRisk, LoanRequest::new(1500, 0, 25, true, 2000, 18))]
    #[case(LoanScenario::MediumRisk, LoanRequest::new(20_000, 0, 30, true, 500, 9))]
    #[case(LoanScenario::HighRisk, LoanRequest::new(1500, 1000, 20, true, 5000, 3))]
    #[case(LoanScenario::InvalidLoanAmount, LoanRequest::new(1500, 1000, 20, true, -5000, 7))]
    fn canonical_table_holds_literal_values(
        #[case] scenario: LoanScenario,
        #[case] expected: LoanRequest,
    ) {
        assert_eq!(LoanRequest::for_scenario(scenario), expected);
    }

    #[test]
    fn named_constructors_match_the_table() {
        assert_eq!(LoanRequest::low_risk(), LoanRequest::for_scenario(LoanScenario::LowRisk));
        assert_eq!(
            LoanRequest::zero_income_employed(),
            LoanRequest::for_scenario(LoanScenario::ZeroIncomeEmployed)
        );
        assert_eq!(LoanRequest::high_loan_amount().loan_amount, 500_000_000);
        assert_eq!(LoanRequest::very_short_loan_period().loan_period, 1);
        assert!(!LoanRequest::unemployed().employed);
        assert_eq!(LoanRequest::minimum_age().age, 18);
        assert_eq!(LoanRequest::insufficient_income().income, 0);
    }

    #[test]
    fn scenario_names_round_trip_through_from_str() {
        for scenario in LoanScenario::ALL {
            let parsed: LoanScenario = scenario.name().parse().expect("known name");
            assert_eq!(parsed, scenario);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "very-low-risk"
            .parse::<LoanScenario>()
            .expect_err("unknown name");
        assert_eq!(err.to_string(), "unknown loan scenario 'very-low-risk'");
    }

    #[test]
    fn request_serialises_to_camel_case() {
        let json = serde_json::to_value(LoanRequest::low_risk()).expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({
                "income": 1500,
                "debt": 0,
                "age": 25,
                "employed": true,
                "loanAmount": 2000,
                "loanPeriod": 18
            })
        );
    }
}
