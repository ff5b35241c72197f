use std::time::Duration;

use super::*;
use crate::error::{AppError, AppResult};

const EPSILON: f64 = 1e-9;

fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < EPSILON
}

fn record(endpoint: &str, request_id: u64, response_time: f64, success: bool) -> OutcomeRecord {
    OutcomeRecord {
        endpoint: endpoint.to_owned(),
        request_id,
        timestamp_ms: 0,
        response_time,
        success,
        status_code: success.then_some(200),
        error: (!success).then(|| "connection reset".to_owned()),
    }
}

#[test]
fn nearest_rank_follows_ceil_convention() -> AppResult<()> {
    // Times in ms-as-seconds: p95 of five samples selects the last one.
    let times = [0.010, 0.020, 0.030, 0.040, 0.050];
    if nearest_rank(&times, 0.95) != Some(0.050) {
        return Err(AppError::from("Expected p95 = 50ms at n = 5"));
    }
    if nearest_rank(&times, 0.50) != Some(0.030) {
        return Err(AppError::from("Expected p50 = 30ms at n = 5"));
    }
    if nearest_rank(&times, 0.99) != Some(0.050) {
        return Err(AppError::from("Expected p99 = 50ms at n = 5"));
    }
    Ok(())
}

#[test]
fn nearest_rank_handles_degenerate_samples() -> AppResult<()> {
    if nearest_rank(&[], 0.95).is_some() {
        return Err(AppError::from("Expected empty sample to yield None"));
    }
    let single = [0.125];
    for percentile in [0.50, 0.95, 0.99] {
        if nearest_rank(&single, percentile) != Some(0.125) {
            return Err(AppError::from("Expected single sample at every percentile"));
        }
    }
    Ok(())
}

#[test]
fn aggregates_partition_by_label() -> AppResult<()> {
    let records = vec![
        record("/block", 1, 0.100, true),
        record("/network/status", 2, 0.020, true),
        record("/block", 3, 0.300, true),
        record("/block", 4, 0.200, false),
    ];
    let (endpoints, overall) = aggregate_run(&records, Duration::from_secs(2));

    let Some(block) = endpoints.get("/block") else {
        return Err(AppError::from("Expected /block aggregate"));
    };
    if block.request_count != 3 || block.success_count != 2 || block.failure_count != 1 {
        return Err(AppError::from("Expected /block counts 3/2/1"));
    }
    if block.min_response_time != Some(0.100) || block.max_response_time != Some(0.300) {
        return Err(AppError::from("Expected /block min/max over successes"));
    }
    if !block.avg_response_time.is_some_and(|avg| approx(avg, 0.200)) {
        return Err(AppError::from("Expected /block avg of successes"));
    }
    if !approx(block.throughput, 1.0) {
        return Err(AppError::from("Expected 2 successes over 2s"));
    }

    let count_sum: u64 = endpoints.values().map(|aggregate| aggregate.request_count).sum();
    if count_sum != 4 || overall.request_count != 4 {
        return Err(AppError::from("Expected counts to sum to the record total"));
    }
    if !approx(overall.throughput, 1.5) {
        return Err(AppError::from("Expected overall 3 successes over 2s"));
    }
    Ok(())
}

#[test]
fn zero_successes_yield_null_latency_stats() -> AppResult<()> {
    let records = vec![
        record("/block", 1, 30.0, false),
        record("/block", 2, 30.0, false),
    ];
    let (endpoints, overall) = aggregate_run(&records, Duration::from_secs(60));
    let Some(block) = endpoints.get("/block") else {
        return Err(AppError::from("Expected /block aggregate"));
    };
    if block.avg_response_time.is_some()
        || block.min_response_time.is_some()
        || block.max_response_time.is_some()
        || block.p50_response_time.is_some()
        || block.p95_response_time.is_some()
        || block.p99_response_time.is_some()
    {
        return Err(AppError::from("Expected all latency stats to be None"));
    }
    if !approx(block.success_rate, 0.0) || !approx(block.error_rate, 1.0) {
        return Err(AppError::from("Expected 0 success rate and 1 error rate"));
    }
    if !approx(block.throughput, 0.0) {
        return Err(AppError::from("Expected zero throughput"));
    }
    if block.errors != ["connection reset"] {
        return Err(AppError::from("Expected deduplicated error messages"));
    }
    if overall.success_count != 0 {
        return Err(AppError::from("Expected overall zero successes"));
    }
    Ok(())
}

#[test]
fn aggregation_is_idempotent() -> AppResult<()> {
    let records = vec![
        record("/block", 1, 0.010, true),
        record("/block", 2, 0.050, true),
        record("/network/status", 3, 0.020, false),
    ];
    let duration = Duration::from_millis(1500);
    let first = aggregate_run(&records, duration);
    let second = aggregate_run(&records, duration);
    if first != second {
        return Err(AppError::from("Expected identical aggregates on re-run"));
    }
    Ok(())
}

#[test]
fn success_rate_counts_non_2xx_as_success() -> AppResult<()> {
    // A captured status code is a completed request, whatever the code.
    let mut failed_status = record("/block", 1, 0.040, true);
    failed_status.status_code = Some(500);
    let records = vec![failed_status, record("/block", 2, 0.060, true)];
    let (_, overall) = aggregate_run(&records, Duration::from_secs(1));
    if overall.success_count != 2 {
        return Err(AppError::from("Expected 5xx responses to count as completed"));
    }
    if !approx(overall.success_rate, 1.0) {
        return Err(AppError::from("Expected full success rate"));
    }
    Ok(())
}

#[test]
fn percentiles_use_successful_samples_only() -> AppResult<()> {
    let records = vec![
        record("/block", 1, 0.010, true),
        record("/block", 2, 0.020, true),
        record("/block", 3, 0.030, true),
        record("/block", 4, 0.040, true),
        record("/block", 5, 0.050, true),
        record("/block", 6, 9.999, false),
    ];
    let (endpoints, _) = aggregate_run(&records, Duration::from_secs(1));
    let Some(block) = endpoints.get("/block") else {
        return Err(AppError::from("Expected /block aggregate"));
    };
    if block.p95_response_time != Some(0.050) {
        return Err(AppError::from("Expected failed samples excluded from p95"));
    }
    Ok(())
}
