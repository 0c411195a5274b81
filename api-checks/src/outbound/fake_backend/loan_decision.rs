//! Risk rules the fake backend applies to loan applications.

use loan_fixtures::LoanRequest;
use serde_json::{Value, json};
use uuid::Uuid;

/// Amounts above this are always declined as very high risk.
pub(super) const MAX_LOAN_AMOUNT: i64 = 1_000_000;
/// Youngest accepted applicant.
pub(super) const MIN_AGE: u32 = 18;
/// Shortest period the risk bands cover, in months.
pub(super) const MIN_BANDED_PERIOD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    Unknown,
}

impl RiskLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
            Self::VeryHigh => "Very High Risk",
            Self::Unknown => "Unknown Risk",
        }
    }

    fn periods(self) -> Vec<u32> {
        match self {
            Self::Low => vec![12, 18, 24, 30, 36],
            Self::Medium => vec![6, 9, 12],
            Self::High => vec![3, 6],
            Self::VeryHigh | Self::Unknown => Vec::new(),
        }
    }

    const fn for_period(loan_period: u32) -> Self {
        match loan_period {
            0..MIN_BANDED_PERIOD => Self::Unknown,
            MIN_BANDED_PERIOD..6 => Self::High,
            6..12 => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Decision {
    pub(super) level: RiskLevel,
    pub(super) positive: bool,
    pub(super) score: i64,
}

impl Decision {
    pub(super) fn to_json(&self, application_id: Uuid) -> Value {
        json!({
            "riskScore": self.score,
            "riskLevel": self.level.as_str(),
            "riskPeriods": self.level.periods(),
            "applicationId": application_id.to_string(),
            "riskDecision": if self.positive { "positive" } else { "negative" },
        })
    }
}

/// Returns `None` for applications the backend rejects with 400.
pub(super) fn decide(request: &LoanRequest) -> Option<Decision> {
    if request.income <= 0 || request.loan_amount <= 0 || request.age < MIN_AGE {
        return None;
    }

    let score = request
        .debt
        .saturating_add(request.loan_amount)
        .saturating_mul(100)
        .checked_div(request.income)
        .unwrap_or(i64::MAX);

    let decision = if request.loan_amount > MAX_LOAN_AMOUNT {
        Decision {
            level: RiskLevel::VeryHigh,
            positive: false,
            score,
        }
    } else {
        let level = RiskLevel::for_period(request.loan_period);
        Decision {
            level,
            positive: level == RiskLevel::Unknown || request.employed,
            score,
        }
    };
    Some(decision)
}

#[cfg(test)]
mod tests {
    use loan_fixtures::LoanScenario;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(LoanScenario::LowRisk, RiskLevel::Low, true)]
    #[case(LoanScenario::MediumRisk, RiskLevel::Medium, true)]
    #[case(LoanScenario::HighRisk, RiskLevel::High, true)]
    #[case(LoanScenario::HighLoanAmount, RiskLevel::VeryHigh, false)]
    #[case(LoanScenario::VeryShortLoanPeriod, RiskLevel::Unknown, true)]
    #[case(LoanScenario::Unemployed, RiskLevel::Medium, false)]
    #[case(LoanScenario::MinimumAge, RiskLevel::Medium, true)]
    fn canonical_fixtures_get_their_decision(
        #[case] scenario: LoanScenario,
        #[case] level: RiskLevel,
        #[case] positive: bool,
    ) {
        let decision = decide(&LoanRequest::for_scenario(scenario)).expect("decided");

        assert_eq!(decision.level, level);
        assert_eq!(decision.positive, positive);
    }

    #[rstest]
    #[case(LoanScenario::InsufficientIncome)]
    #[case(LoanScenario::InvalidLoanAmount)]
    #[case(LoanScenario::ZeroIncomeEmployed)]
    fn invalid_fixtures_are_rejected(#[case] scenario: LoanScenario) {
        assert_eq!(decide(&LoanRequest::for_scenario(scenario)), None);
    }

    #[test]
    fn zero_income_is_rejected_whatever_else_is_set() {
        let request = LoanRequest::new(0, 0, 40, true, 100, 24);

        assert_eq!(decide(&request), None);
    }

    #[test]
    fn under_age_applicants_are_rejected() {
        let request = LoanRequest::new(1500, 0, 17, true, 500, 12);

        assert_eq!(decide(&request), None);
    }

    #[rstest]
    #[case(0, RiskLevel::Unknown)]
    #[case(2, RiskLevel::Unknown)]
    #[case(3, RiskLevel::High)]
    #[case(5, RiskLevel::High)]
    #[case(6, RiskLevel::Medium)]
    #[case(11, RiskLevel::Medium)]
    #[case(12, RiskLevel::Low)]
    #[case(360, RiskLevel::Low)]
    fn periods_map_to_bands(#[case] period: u32, #[case] level: RiskLevel) {
        assert_eq!(RiskLevel::for_period(period), level);
    }

    #[test]
    fn decision_json_has_every_field() {
        let decision = decide(&LoanRequest::low_risk()).expect("decided");

        let body = decision.to_json(Uuid::nil());

        assert_eq!(body["riskLevel"], "Low Risk");
        assert_eq!(body["riskPeriods"], json!([12, 18, 24, 30, 36]));
        assert_eq!(body["riskDecision"], "positive");
        assert_eq!(body["applicationId"], Uuid::nil().to_string());
        assert!(body["riskScore"].is_i64());
    }
}
