use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clap::{CommandFactory, FromArgMatches};
use tracing::info;

use crate::args::{Command, CompareArgs, TesterArgs};
use crate::charts;
use crate::config::{self, DEFAULT_CONFIG_FILES};
use crate::error::{AppError, AppResult, ConfigError};
use crate::http::{self, Executor, HttpExecutor};
use crate::report;
use crate::runner;
use crate::shutdown::{setup_signal_shutdown_handler, shutdown_channel};
use crate::workload::{RequestCycle, expand_endpoints};

/// Parses the CLI, sets up logging and the runtime, and executes the
/// selected plan.
///
/// # Errors
///
/// Returns an error on configuration/setup failures and on report-write
/// failures; per-request failures never surface here.
pub fn run() -> AppResult<()> {
    let args = match parse_args()? {
        Some(args) => args,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<Option<TesterArgs>> {
    let mut cmd = TesterArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;

    Ok(Some(args))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(mut args: TesterArgs) -> AppResult<()> {
    if let Some(command) = args.command.take() {
        match command {
            Command::Compare(compare_args) => return run_compare(&compare_args).await,
        }
    }
    run_load_test(&args).await
}

async fn run_load_test(args: &TesterArgs) -> AppResult<()> {
    let config = config::load_run_config(args.config.as_deref())?;

    let descriptors = expand_endpoints(&config.endpoints, &config.block_range, &config.base_url);
    let Some(cycle) = RequestCycle::new(descriptors) else {
        return Err(AppError::config(ConfigError::NoEndpoints));
    };

    let client = http::build_client(config.performance.timeout)?;
    let executor: Arc<dyn Executor> = Arc::new(HttpExecutor::new(client));

    info!("Starting '{}' against {}", config.test_name, config.base_url);
    info!(
        "{} requests over {} descriptors, concurrency {}, timeout {}s, warm-up {}",
        config.performance.total_requests,
        cycle.len(),
        config.performance.concurrent_requests,
        config.performance.timeout.as_secs(),
        config.performance.warm_up_requests
    );

    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let started_at = Utc::now();
    let outcome = runner::run(&config.performance, &cycle, &executor, &mut shutdown_rx).await;
    let finished_at = Utc::now();

    drop(shutdown_tx.send(()));
    signal_handle.await?;

    let run_report =
        report::build_run_report(&config, &outcome, started_at, finished_at, args.verbose);
    // Summary first: a failed report write must not swallow the aggregates.
    report::print_run_summary(&run_report, &config.performance.metrics);

    let output = args
        .output
        .clone()
        .unwrap_or_else(report::default_output_path);
    let output_path = PathBuf::from(output);
    report::write_report(&output_path, &run_report).await?;
    info!("Report written to {}", output_path.display());

    if let Some(charts_dir) = args.charts.as_deref() {
        charts::render_run_charts(&run_report, Path::new(charts_dir))?;
        info!("Charts written to {}", charts_dir);
    }

    Ok(())
}

async fn run_compare(args: &CompareArgs) -> AppResult<()> {
    let left = report::read_report(Path::new(&args.left)).await?;
    let right = report::read_report(Path::new(&args.right)).await?;

    let comparison = report::compare_reports(&left, &right);
    let rendered = report::render_comparison(&comparison);

    match args.output.as_deref() {
        Some(path) => {
            report::write_comparison(Path::new(path), &rendered).await?;
            info!("Comparison written to {}", path);
        }
        None => print!("{}", rendered),
    }

    if let Some(charts_dir) = args.charts.as_deref() {
        charts::render_compare_charts(&left, &right, Path::new(charts_dir))?;
        info!("Charts written to {}", charts_dir);
    }

    Ok(())
}
