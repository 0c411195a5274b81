//! Behavioural tests for the loan-fixtures crate.
//!
//! Scenarios cover the canonical table, registry overrides, and the errors
//! reported for unknown or duplicated fixture names.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use loan_fixtures::{FixtureRegistry, LoanFixture, LoanRequest, LoanScenario, RegistryError};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

/// Test world holding the registry under test and the last lookup.
#[derive(Default, ScenarioState)]
struct World {
    json_input: Slot<String>,
    registry_result: Slot<Result<FixtureRegistry, RegistryError>>,
    lookup: Slot<Result<LoanFixture, RegistryError>>,
}

impl World {
    fn registry(&self) -> FixtureRegistry {
        self.registry_result
            .get()
            .expect("registry should be set")
            .expect("registry should be valid")
    }

    fn lookup(&self) -> Result<LoanFixture, RegistryError> {
        self.lookup.get().expect("a lookup should have run")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

fn override_json(income: i64) -> String {
    format!(
        r#"{{
    "version": 1,
    "loans": [
        {{
            "name": "low-risk",
            "request": {{
                "income": {income},
                "debt": 0,
                "age": 30,
                "employed": true,
                "loanAmount": 500,
                "loanPeriod": 12
            }}
        }}
    ]
}}"#
    )
}

// ============================================================================
// Given steps
// ============================================================================

#[given("the canonical fixture registry")]
fn the_canonical_fixture_registry(world: &World) {
    world.registry_result.set(Ok(FixtureRegistry::canonical()));
}

#[given("an override registry JSON with a low-risk income of {income:i64}")]
fn an_override_registry_json(world: &World, income: i64) {
    world.json_input.set(override_json(income));
}

#[given("registry JSON that defines low-risk twice")]
fn registry_json_that_defines_low_risk_twice(world: &World) {
    let entry = r#"{
        "name": "low-risk",
        "request": {
            "income": 1500, "debt": 0, "age": 30,
            "employed": true, "loanAmount": 500, "loanPeriod": 12
        }
    }"#;
    world
        .json_input
        .set(format!(r#"{{"version": 1, "loans": [{entry}, {entry}]}}"#));
}

// ============================================================================
// When steps
// ============================================================================

#[when("the registry is parsed")]
fn the_registry_is_parsed(world: &World) {
    let json = world.json_input.get().expect("JSON input should be set");
    world.registry_result.set(FixtureRegistry::from_json(&json));
}

#[when("the loan fixture {name} is looked up")]
fn the_loan_fixture_is_looked_up(world: &World, name: String) {
    let registry = world.registry();
    world
        .lookup
        .set(registry.find_loan(&name).map(LoanFixture::clone));
}

// ============================================================================
// Then steps
// ============================================================================

#[then("every loan scenario resolves to its literal table row")]
fn every_loan_scenario_resolves_to_its_table_row(world: &World) {
    let registry = world.registry();
    assert_eq!(registry.loans().len(), LoanScenario::ALL.len());
    for scenario in LoanScenario::ALL {
        let fixture = registry
            .find_loan(scenario.name())
            .expect("canonical registry covers every scenario");
        assert_eq!(fixture.request(), &LoanRequest::for_scenario(scenario));
    }
}

#[then("the fixture income is {income:i64}")]
fn the_fixture_income_is(world: &World, income: i64) {
    let fixture = world.lookup().expect("lookup should succeed");
    assert_eq!(fixture.request().income, income);
}

#[then("the lookup fails with a not found error")]
fn the_lookup_fails_with_a_not_found_error(world: &World) {
    assert!(matches!(
        world.lookup(),
        Err(RegistryError::ScenarioNotFound { .. })
    ));
}

#[then("parsing fails with a duplicate scenario error")]
fn parsing_fails_with_a_duplicate_scenario_error(world: &World) {
    let result = world
        .registry_result
        .get()
        .expect("registry result should be set");
    assert_eq!(
        result,
        Err(RegistryError::DuplicateScenario {
            name: "low-risk".to_owned()
        })
    );
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/loan_fixtures.feature",
    name = "Canonical registry provides every named scenario"
)]
fn canonical_registry_provides_every_named_scenario(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/loan_fixtures.feature",
    name = "Low risk fixture uses the canonical income"
)]
fn low_risk_fixture_uses_the_canonical_income(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/loan_fixtures.feature",
    name = "Override registry replaces canonical values"
)]
fn override_registry_replaces_canonical_values(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/loan_fixtures.feature",
    name = "Unknown fixture names are reported"
)]
fn unknown_fixture_names_are_reported(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/loan_fixtures.feature",
    name = "Registry with duplicate names is rejected"
)]
fn registry_with_duplicate_names_is_rejected(world: World) {
    let _ = world;
}
