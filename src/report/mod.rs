//! Assembly, serialization, and human-readable rendering of run reports.
mod compare;
mod summary;


pub use compare::{
    Comparison, DELTA_THRESHOLD_PCT, DeltaClass, EndpointComparison, MetricDelta, compare_reports,
    render_comparison,
};
pub use summary::print_run_summary;

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::config::RunConfig;
use crate::error::{AppError, AppResult, ReportError};
use crate::metrics::{BlockRangeSnapshot, ConfigSnapshot, RunReport, aggregate_run};
use crate::runner::RunRecords;

/// Assembles the serialized report model for one finished run. Per-request
/// timings are carried only in verbose mode.
#[must_use]
pub fn build_run_report(
    config: &RunConfig,
    outcome: &RunRecords,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    verbose: bool,
) -> RunReport {
    let (endpoints, overall) = aggregate_run(&outcome.records, outcome.main_duration);

    RunReport {
        test_name: config.test_name.clone(),
        base_url: config.base_url.clone(),
        started_at: started_at.to_rfc3339(),
        finished_at: finished_at.to_rfc3339(),
        config: ConfigSnapshot {
            concurrent_requests: config.performance.concurrent_requests,
            total_requests: config.performance.total_requests,
            timeout_seconds: config.performance.timeout.as_secs(),
            warm_up_requests: config.performance.warm_up_requests,
            block_range: config.block_range.enabled.then_some(BlockRangeSnapshot {
                start: config.block_range.start,
                end: config.block_range.end,
            }),
        },
        endpoints,
        overall,
        individual_timings: verbose.then(|| outcome.records.clone()),
    }
}

/// Default report destination mirroring `results/<timestamp>.json`.
#[must_use]
pub fn default_output_path() -> String {
    format!("results/{}.json", Local::now().format("%Y%m%d-%H%M%S"))
}

/// Serializes the report as pretty JSON to the given path, creating parent
/// directories on demand.
///
/// # Errors
///
/// Returns an error when the directory cannot be created or the file cannot
/// be serialized or written.
pub async fn write_report(path: &Path, report: &RunReport) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(|err| {
            AppError::report(ReportError::CreateReportDir {
                path: parent.to_path_buf(),
                source: err,
            })
        })?;
    }

    let json = serde_json::to_vec_pretty(report)
        .map_err(|err| AppError::report(ReportError::SerializeReport { source: err }))?;

    let file = tokio::fs::File::create(path).await.map_err(|err| {
        AppError::report(ReportError::WriteReport {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await.map_err(|err| {
        AppError::report(ReportError::WriteReport {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    writer.flush().await.map_err(|err| {
        AppError::report(ReportError::WriteReport {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    Ok(())
}

/// Reads a previously written run report.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed.
pub async fn read_report(path: &Path) -> AppResult<RunReport> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        AppError::report(ReportError::ReadReport {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        AppError::report(ReportError::ParseReport {
            path: path.to_path_buf(),
            source: err,
        })
    })
}

/// Writes the rendered comparison text to a file.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub async fn write_comparison(path: &Path, rendered: &str) -> AppResult<()> {
    tokio::fs::write(path, rendered).await.map_err(|err| {
        AppError::report(ReportError::WriteComparison {
            path: path.to_path_buf(),
            source: err,
        })
    })
}
