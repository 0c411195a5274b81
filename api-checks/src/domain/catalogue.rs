//! The scenario catalogue: every check and its expected outcome.
//!
//! Loan requests come from a [`FixtureRegistry`], so an override registry
//! changes the values sent without changing the expectations. Names missing
//! from an override fall back to the canonical table.

use loan_fixtures::{
    FixtureRegistry, LoanRequest, LoanScenario, Order, malformed_order, malformed_order_update,
};
use serde_json::json;

use super::expectation::{BodyExpectation, Expectation, FieldCheck};
use super::ports::HttpMethod;
use super::scenario::{
    ApiKeyPolicy, INVALID_API_KEY, QueryPolicy, RequestBody, RequestSpec, Scenario, Step, Suite,
};
use super::session::ORDERS_LOGIN_PATH;

/// Loan decision endpoint.
pub const LOAN_DECISION_PATH: &str = "/api/loan-calc/decision";
/// Student login endpoint.
pub const STUDENT_LOGIN_PATH: &str = "/login/student";

const RISK_FIELDS: [&str; 5] = [
    "riskScore",
    "riskLevel",
    "riskPeriods",
    "applicationId",
    "riskDecision",
];

/// Builds the full catalogue in report order: loan decision, login, orders.
///
/// # Examples
///
/// ```
/// use api_checks::domain::{Suite, catalogue};
/// use loan_fixtures::FixtureRegistry;
///
/// let scenarios = catalogue(&FixtureRegistry::canonical());
/// assert_eq!(scenarios.len(), 28);
/// assert_eq!(scenarios[0].name(), "low risk");
/// assert!(scenarios.iter().any(|s| s.suite() == Suite::Login));
/// ```
#[must_use]
pub fn catalogue(registry: &FixtureRegistry) -> Vec<Scenario> {
    let mut scenarios = loan_decision_scenarios(registry);
    scenarios.push(student_login_scenario());
    scenarios.extend(order_scenarios());
    scenarios
}

fn loan_request(registry: &FixtureRegistry, scenario: LoanScenario) -> LoanRequest {
    registry.find_loan(scenario.name()).map_or_else(
        |_| LoanRequest::for_scenario(scenario),
        |fixture| *fixture.request(),
    )
}

fn risk_decision(level: &str, periods: &[u32], decision: &str) -> BodyExpectation {
    BodyExpectation::Json(vec![
        FieldCheck::defined("riskScore"),
        FieldCheck::defined("applicationId"),
        FieldCheck::equals("riskLevel", level),
        FieldCheck::equals("riskPeriods", json!(periods)),
        FieldCheck::equals("riskDecision", decision),
    ])
}

fn complete_decision(decision: &str) -> BodyExpectation {
    let mut checks: Vec<FieldCheck> = RISK_FIELDS.into_iter().map(FieldCheck::defined).collect();
    checks.push(FieldCheck::equals("riskDecision", decision));
    BodyExpectation::Json(checks)
}

fn loan_decision_scenarios(registry: &FixtureRegistry) -> Vec<Scenario> {
    let rejected = || Expectation::status(400).with_body(BodyExpectation::Empty);
    let decided = |body| Expectation::status(200).with_body(body);

    let table = [
        (
            "low risk",
            LoanScenario::LowRisk,
            decided(risk_decision("Low Risk", &[12, 18, 24, 30, 36], "positive")),
        ),
        (
            "medium risk",
            LoanScenario::MediumRisk,
            decided(risk_decision("Medium Risk", &[6, 9, 12], "positive")),
        ),
        (
            "high risk",
            LoanScenario::HighRisk,
            decided(risk_decision("High Risk", &[3, 6], "positive")),
        ),
        (
            "insufficient income",
            LoanScenario::InsufficientIncome,
            rejected(),
        ),
        (
            "high loan amount",
            LoanScenario::HighLoanAmount,
            decided(risk_decision("Very High Risk", &[], "negative")),
        ),
        (
            "very short loan period",
            LoanScenario::VeryShortLoanPeriod,
            decided(risk_decision("Unknown Risk", &[], "positive")),
        ),
        (
            "unemployed",
            LoanScenario::Unemployed,
            decided(complete_decision("negative")),
        ),
        (
            "minimum age",
            LoanScenario::MinimumAge,
            decided(complete_decision("positive")),
        ),
        (
            "invalid loan amount",
            LoanScenario::InvalidLoanAmount,
            rejected(),
        ),
        (
            "zero income but employed",
            LoanScenario::ZeroIncomeEmployed,
            rejected(),
        ),
    ];

    table
        .into_iter()
        .map(|(name, fixture, expectation)| {
            let request = RequestSpec::new(HttpMethod::Post, LOAN_DECISION_PATH)
                .with_body(RequestBody::Loan(loan_request(registry, fixture)));
            Scenario::single(name, Suite::LoanDecision, request, expectation)
        })
        .collect()
}

fn student_login_scenario() -> Scenario {
    Scenario::single(
        "student login",
        Suite::Login,
        RequestSpec::new(HttpMethod::Post, STUDENT_LOGIN_PATH)
            .with_body(RequestBody::StudentCredentials),
        Expectation::status(200).with_body(BodyExpectation::NonEmptyText),
    )
}

fn order(path: &str, method: HttpMethod) -> RequestSpec {
    RequestSpec::new(method, format!("/test-orders{path}"))
}

fn keyed(path: &str, method: HttpMethod) -> RequestSpec {
    order(path, method).with_api_key(ApiKeyPolicy::Resolved)
}

fn invalid_key(path: &str, method: HttpMethod) -> RequestSpec {
    order(path, method).with_api_key(ApiKeyPolicy::Literal(INVALID_API_KEY.to_owned()))
}

fn order_scenarios() -> Vec<Scenario> {
    use HttpMethod::{Delete, Get, Post, Put};

    let json = || BodyExpectation::Json(Vec::new());
    let processing = || RequestBody::Order(Order::processing_update());
    let orders = |name: &str, request: RequestSpec, expectation: Expectation| {
        Scenario::single(name, Suite::Orders, request, expectation)
    };
    let delete_order_two = Step {
        request: keyed("/2", Delete),
        expectation: Expectation::status(204),
    };

    vec![
        orders(
            "create order",
            order("", Post).with_body(RequestBody::Order(Order::new_open())),
            Expectation::one_of(&[200, 201]).with_body(json()),
        ),
        orders(
            "create order with malformed data",
            order("", Post).with_body(RequestBody::Raw(malformed_order())),
            Expectation::status(400),
        ),
        orders(
            "get order",
            order("/1", Get),
            Expectation::status(200).with_body(json()),
        ),
        orders(
            "get unknown order",
            order("/9999", Get),
            Expectation::status(400),
        ),
        orders(
            "get order with non-numeric id",
            order("/invalid", Get),
            Expectation::status(400),
        ),
        orders(
            "get order without authentication",
            order("/1", Get),
            Expectation::one_of(&[200, 401]),
        ),
        orders(
            "update order",
            keyed("/1", Put).with_body(RequestBody::Order(Order::update(1))),
            Expectation::one_of(&[200, 204]),
        ),
        orders(
            "update order with id 0",
            keyed("/0", Put).with_body(processing()),
            Expectation::status(400),
        ),
        orders(
            "update order without key",
            order("/1", Put).with_body(processing()),
            Expectation::status(400),
        ),
        orders(
            "update order with invalid key",
            invalid_key("/1", Put).with_body(processing()),
            Expectation::status(400),
        ),
        orders(
            "update order with malformed data",
            keyed("/1", Put).with_body(RequestBody::Raw(malformed_order_update())),
            Expectation::status(400),
        ),
        orders(
            "delete order",
            keyed("/1", Delete),
            Expectation::status(204),
        ),
        orders(
            "delete order with id 0",
            keyed("/0", Delete),
            Expectation::status(400),
        ),
        orders(
            "delete order without key",
            order("/1", Delete),
            Expectation::status(400),
        ),
        orders(
            "delete order with invalid key",
            invalid_key("/1", Delete),
            Expectation::status(401),
        ),
        Scenario::chained(
            "delete order twice",
            Suite::Orders,
            vec![delete_order_two.clone(), delete_order_two],
        ),
        orders(
            "order credentials login",
            RequestSpec::new(Get, ORDERS_LOGIN_PATH).with_query(QueryPolicy::OrderCredentials),
            Expectation::status(200).with_body(json()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::rstest;

    use super::*;
    use crate::domain::scenario::Requirement;

    fn find<'a>(scenarios: &'a [Scenario], name: &str) -> &'a Scenario {
        scenarios
            .iter()
            .find(|scenario| scenario.name() == name)
            .expect("scenario exists")
    }

    #[test]
    fn catalogue_has_every_scenario_once() {
        let scenarios = catalogue(&FixtureRegistry::canonical());
        let names: BTreeSet<&str> = scenarios.iter().map(Scenario::name).collect();

        assert_eq!(scenarios.len(), 28);
        assert_eq!(names.len(), scenarios.len());
    }

    #[test]
    fn suites_appear_in_report_order() {
        let scenarios = catalogue(&FixtureRegistry::canonical());
        let suites: Vec<Suite> = scenarios.iter().map(Scenario::suite).collect();
        let mut sorted = suites.clone();
        sorted.sort();

        assert_eq!(suites, sorted);
    }

    #[rstest]
    #[case("low risk", LoanScenario::LowRisk)]
    #[case("insufficient income", LoanScenario::InsufficientIncome)]
    #[case("zero income but employed", LoanScenario::ZeroIncomeEmployed)]
    fn loan_scenarios_send_their_fixture(#[case] name: &str, #[case] fixture: LoanScenario) {
        let scenarios = catalogue(&FixtureRegistry::canonical());
        let step = find(&scenarios, name).steps().first().expect("one step");

        assert_eq!(step.request.path, LOAN_DECISION_PATH);
        assert_eq!(
            step.request.body,
            RequestBody::Loan(LoanRequest::for_scenario(fixture))
        );
    }

    #[test]
    fn override_registry_changes_only_named_fixtures() {
        let registry = FixtureRegistry::from_json(
            r#"{"version":1,"loans":[{"name":"low-risk","request":{
                "income":2000,"debt":0,"age":30,"employed":true,
                "loanAmount":500,"loanPeriod":12}}]}"#,
        )
        .expect("valid override");
        let scenarios = catalogue(&registry);

        let low = &find(&scenarios, "low risk").steps()[0].request.body;
        let high = &find(&scenarios, "high risk").steps()[0].request.body;

        assert_eq!(
            low,
            &RequestBody::Loan(LoanRequest::new(2000, 0, 30, true, 500, 12))
        );
        assert_eq!(high, &RequestBody::Loan(LoanRequest::high_risk()));
    }

    #[test]
    fn delete_twice_chains_two_keyed_deletes() {
        let scenarios = catalogue(&FixtureRegistry::canonical());
        let scenario = find(&scenarios, "delete order twice");

        assert_eq!(scenario.steps().len(), 2);
        for step in scenario.steps() {
            assert_eq!(step.request.method, HttpMethod::Delete);
            assert_eq!(step.request.path, "/test-orders/2");
            assert_eq!(step.request.api_key, ApiKeyPolicy::Resolved);
            assert_eq!(step.expectation, Expectation::status(204));
        }
    }

    #[rstest]
    #[case("low risk")]
    #[case("high loan amount")]
    #[case("very short loan period")]
    fn risk_decisions_require_score_and_application_id(#[case] name: &str) {
        let scenarios = catalogue(&FixtureRegistry::canonical());
        let BodyExpectation::Json(checks) = &find(&scenarios, name).steps()[0].expectation.body
        else {
            panic!("{name} should inspect a JSON body");
        };

        assert!(checks.contains(&FieldCheck::defined("riskScore")));
        assert!(checks.contains(&FieldCheck::defined("applicationId")));
    }

    #[rstest]
    #[case("student login", vec![Requirement::StudentCredentials])]
    #[case("order credentials login", vec![Requirement::OrderCredentials])]
    #[case("update order", vec![Requirement::ApiKey])]
    #[case("update order with invalid key", vec![])]
    #[case("get order", vec![])]
    fn requirements_follow_the_request(#[case] name: &str, #[case] expected: Vec<Requirement>) {
        let scenarios = catalogue(&FixtureRegistry::canonical());

        assert_eq!(find(&scenarios, name).requirements(), expected);
    }
}
