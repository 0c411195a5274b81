//! `api-checks` entry-point: runs the scenario catalogue and prints a report.
//!
//! Exits non-zero when any scenario fails or errors. Skipped scenarios do not
//! affect the exit code.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::error::Error;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use api_checks::config::ChecksSettings;
use api_checks::domain::ports::HttpTransport;
use api_checks::domain::{CheckContext, ScenarioRunner, catalogue, resolve_api_key};
use api_checks::inbound::cli::{BackendKind, CliArgs, write_catalogue, write_report};
use api_checks::outbound::fake_backend::FakeBackend;
use api_checks::outbound::http::ReqwestTransport;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    if let Err(error) = init_tracing(args.log_json) {
        report(&format!("tracing init failed: {error}"));
    }

    let settings = ChecksSettings::load_from_iter([OsString::from("api-checks")])
        .map_err(|error| eyre!("failed to load settings: {error}"))?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(&args, &settings))
}

/// Installs the global subscriber. Fails when one is already installed.
fn init_tracing(json: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
    let subscriber = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    if json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
}

fn report(message: &str) {
    if let Err(err) = writeln!(io::stderr().lock(), "{message}") {
        drop(err);
    }
}

async fn run(args: &CliArgs, settings: &ChecksSettings) -> Result<ExitCode> {
    let registry = settings
        .load_registry()
        .wrap_err("failed to load loan fixtures")?;
    let scenarios = args.selection().apply(catalogue(&registry))?;

    if args.list {
        write_catalogue(&mut io::stdout().lock(), &scenarios)?;
        return Ok(ExitCode::SUCCESS);
    }

    let transport = transport_for(args.backend, settings)?;
    let context = context_for(args.backend, settings, transport.as_ref()).await;
    let concurrency = args
        .concurrency
        .unwrap_or_else(|| settings.concurrency());

    let runner =
        ScenarioRunner::new(transport, Arc::new(DefaultClock)).with_concurrency(concurrency);
    let report = runner.run(&scenarios, &context).await;
    info!(
        run_id = %report.run_id,
        total = report.summary.total,
        passed = report.summary.passed,
        failed = report.summary.failed,
        errored = report.summary.errored,
        skipped = report.summary.skipped,
        "run finished"
    );

    write_report(&mut io::stdout().lock(), &report, args.format)?;
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn transport_for(backend: BackendKind, settings: &ChecksSettings) -> Result<Arc<dyn HttpTransport>> {
    match backend {
        BackendKind::Live => {
            let base_url = settings.base_url()?;
            info!(base_url = %base_url, "running against live backend");
            let transport = ReqwestTransport::new(base_url, settings.request_timeout())
                .wrap_err("failed to build HTTP client")?;
            Ok(Arc::new(transport))
        }
        BackendKind::Fake => {
            info!("running against in-process fake backend");
            Ok(Arc::new(FakeBackend::new()))
        }
    }
}

/// Builds the run context. The fake backend issues its own key, so a
/// configured key only applies to the live backend.
async fn context_for(
    backend: BackendKind,
    settings: &ChecksSettings,
    transport: &dyn HttpTransport,
) -> CheckContext {
    let (configured_key, student, orders) = match backend {
        BackendKind::Live => (
            settings.api_key.as_deref(),
            settings.student_credentials(),
            settings.orders_credentials(),
        ),
        BackendKind::Fake => (
            None,
            settings
                .student_credentials()
                .or_else(|| Some(FakeBackend::demo_credentials())),
            settings
                .orders_credentials()
                .or_else(|| Some(FakeBackend::demo_credentials())),
        ),
    };

    let mut context = CheckContext::new();
    match resolve_api_key(transport, configured_key, orders.as_ref()).await {
        Ok(Some((key, source))) => {
            info!(source = ?source, "API key available");
            context = context.with_api_key(key);
        }
        Ok(None) => info!("no API key available; keyed order scenarios will be skipped"),
        Err(error) => warn!(
            error = %error,
            "API key resolution failed; keyed order scenarios will be skipped"
        ),
    }
    if let Some(credentials) = student {
        context = context.with_student_credentials(credentials);
    }
    if let Some(credentials) = orders {
        context = context.with_orders_credentials(credentials);
    }
    context
}
