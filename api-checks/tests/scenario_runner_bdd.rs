//! Behavioural tests for running the catalogue through the scenario runner.
//!
//! Every scenario targets the in-process fake backend so outcomes are
//! deterministic.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::future::Future;
use std::sync::Arc;

use api_checks::domain::ports::HttpTransport;
use api_checks::domain::{
    CheckContext, ScenarioOutcome, ScenarioReport, ScenarioRunner, Selection, Suite, SuiteReport,
    catalogue,
};
use api_checks::outbound::fake_backend::{FAKE_API_KEY, FakeBackend};
use loan_fixtures::FixtureRegistry;
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

/// Test world holding the backend, run context, and last report.
#[derive(Default, ScenarioState)]
struct World {
    backend: Slot<Arc<FakeBackend>>,
    context: Slot<CheckContext>,
    report: Slot<SuiteReport>,
}

impl World {
    fn run(&self, selection: Selection) {
        let backend = self.backend.get().expect("backend should be set");
        let context = self.context.get().expect("context should be set");
        let scenarios = selection
            .apply(catalogue(&FixtureRegistry::canonical()))
            .expect("selection matches scenarios");
        let transport: Arc<dyn HttpTransport> = backend;
        let runner = ScenarioRunner::new(transport, Arc::new(DefaultClock));
        let report = run_async(runner.run(&scenarios, &context));
        self.report.set(report);
    }

    fn report(&self) -> SuiteReport {
        self.report.get().expect("a run should have finished")
    }

    fn scenario(&self, name: &str) -> ScenarioReport {
        self.report()
            .scenarios
            .into_iter()
            .find(|scenario| scenario.name == name)
            .expect("scenario should be in the report")
    }
}

fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(future)
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("a fake backend")]
fn a_fake_backend(world: &World) {
    world.backend.set(Arc::new(FakeBackend::new()));
}

#[given("a fake backend that only accepts the key {key}")]
fn a_fake_backend_accepting(world: &World, key: String) {
    world.backend.set(Arc::new(FakeBackend::with_api_key(key)));
}

#[given("a run context holding the fake API key and demo credentials")]
fn a_full_run_context(world: &World) {
    world.context.set(
        CheckContext::new()
            .with_api_key(FAKE_API_KEY)
            .with_student_credentials(FakeBackend::demo_credentials())
            .with_orders_credentials(FakeBackend::demo_credentials()),
    );
}

#[given("an empty run context")]
fn an_empty_run_context(world: &World) {
    world.context.set(CheckContext::new());
}

// ============================================================================
// When steps
// ============================================================================

#[when("every scenario is run")]
fn every_scenario_is_run(world: &World) {
    world.run(Selection::all());
}

#[when("the {suite_name} suite is run")]
fn the_suite_is_run(world: &World, suite_name: String) {
    let suite: Suite = suite_name.parse().expect("known suite");
    world.run(Selection::all().with_suites(vec![suite]));
}

#[when("the scenario \"{name}\" is run")]
fn the_scenario_is_run(world: &World, name: String) {
    world.run(Selection::all().with_names(vec![name]));
}

// ============================================================================
// Then steps
// ============================================================================

#[then("every scenario passes")]
fn every_scenario_passes(world: &World) {
    let report = world.report();
    for scenario in &report.scenarios {
        assert_eq!(scenario.outcome, ScenarioOutcome::Passed, "{}", scenario.name);
    }
}

#[then("the report lists scenarios in catalogue order")]
fn the_report_is_in_catalogue_order(world: &World) {
    let expected: Vec<String> = catalogue(&FixtureRegistry::canonical())
        .iter()
        .map(|scenario| scenario.name().to_owned())
        .collect();
    let actual: Vec<String> = world
        .report()
        .scenarios
        .into_iter()
        .map(|scenario| scenario.name)
        .collect();
    assert_eq!(actual, expected);
}

#[then("the scenario \"{name}\" is skipped")]
fn the_scenario_is_skipped(world: &World, name: String) {
    let scenario = world.scenario(&name);
    assert!(matches!(scenario.outcome, ScenarioOutcome::Skipped { .. }));
    assert_eq!(scenario.steps_run, 0);
}

#[then("the scenario \"{name}\" fails at step {step:usize}")]
fn the_scenario_fails_at_step(world: &World, name: String, step: usize) {
    let ScenarioOutcome::Failed { failures } = world.scenario(&name).outcome else {
        panic!("expected {name} to fail");
    };
    assert!(!failures.is_empty());
    assert!(failures.iter().all(|failure| failure.step == step));
}

#[then("the scenario \"{name}\" passes after {steps:usize} steps")]
fn the_scenario_passes_after(world: &World, name: String, steps: usize) {
    let scenario = world.scenario(&name);
    assert_eq!(scenario.outcome, ScenarioOutcome::Passed);
    assert_eq!(scenario.steps_run, steps);
}

#[then("the run succeeds")]
fn the_run_succeeds(world: &World) {
    assert!(world.report().is_success());
}

#[then("the run fails")]
fn the_run_fails(world: &World) {
    assert!(!world.report().is_success());
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/scenario_runner.feature",
    name = "Full catalogue passes against the fake backend"
)]
fn full_catalogue_passes(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/scenario_runner.feature",
    name = "Keyed scenarios are skipped without an API key"
)]
fn keyed_scenarios_are_skipped(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/scenario_runner.feature",
    name = "A rejected key fails the keyed happy path"
)]
fn rejected_key_fails_keyed_happy_path(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/scenario_runner.feature",
    name = "Deleting twice runs both steps"
)]
fn deleting_twice_runs_both_steps(world: World) {
    let _ = world;
}
