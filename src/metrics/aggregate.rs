use std::collections::BTreeMap;
use std::time::Duration;

use super::types::{EndpointAggregate, OutcomeRecord};

/// Label of the aggregate spanning every record in a run.
pub const OVERALL_LABEL: &str = "overall";

/// Reduces a run's outcome records into one aggregate per endpoint label
/// plus the overall aggregate. Pure function of its inputs: aggregating the
/// same records twice yields identical values.
///
/// Throughput is computed against the main-phase wall duration at run level;
/// per-endpoint aggregates use the same duration.
#[must_use]
pub fn aggregate_run(
    records: &[OutcomeRecord],
    main_duration: Duration,
) -> (BTreeMap<String, EndpointAggregate>, EndpointAggregate) {
    let mut by_label: BTreeMap<&str, Vec<&OutcomeRecord>> = BTreeMap::new();
    for record in records {
        by_label
            .entry(record.endpoint.as_str())
            .or_default()
            .push(record);
    }

    let endpoints = by_label
        .iter()
        .map(|(label, group)| ((*label).to_owned(), aggregate_label(label, group, main_duration)))
        .collect();

    let everything: Vec<&OutcomeRecord> = records.iter().collect();
    let overall = aggregate_label(OVERALL_LABEL, &everything, main_duration);

    (endpoints, overall)
}

fn aggregate_label(
    label: &str,
    records: &[&OutcomeRecord],
    main_duration: Duration,
) -> EndpointAggregate {
    let request_count = u64::try_from(records.len()).unwrap_or(u64::MAX);

    let mut success_times: Vec<f64> = records
        .iter()
        .filter(|record| record.success)
        .map(|record| record.response_time)
        .collect();
    success_times.sort_by(f64::total_cmp);
    let success_count = u64::try_from(success_times.len()).unwrap_or(u64::MAX);
    let failure_count = request_count.saturating_sub(success_count);

    let avg = if success_times.is_empty() {
        None
    } else {
        let sum: f64 = success_times.iter().sum();
        Some(sum / success_count as f64)
    };

    let duration_secs = main_duration.as_secs_f64();
    let throughput = if duration_secs > 0.0 {
        success_count as f64 / duration_secs
    } else {
        0.0
    };

    let (success_rate, error_rate) = if request_count > 0 {
        let rate = success_count as f64 / request_count as f64;
        (rate, 1.0 - rate)
    } else {
        (0.0, 0.0)
    };

    let mut errors: Vec<String> = Vec::new();
    for record in records {
        if let Some(message) = record.error.as_ref()
            && !errors.iter().any(|seen| seen == message)
        {
            errors.push(message.clone());
        }
    }

    EndpointAggregate {
        endpoint: label.to_owned(),
        request_count,
        success_count,
        failure_count,
        avg_response_time: avg,
        min_response_time: success_times.first().copied(),
        max_response_time: success_times.last().copied(),
        p50_response_time: nearest_rank(&success_times, 0.50),
        p95_response_time: nearest_rank(&success_times, 0.95),
        p99_response_time: nearest_rank(&success_times, 0.99),
        throughput,
        success_rate,
        error_rate,
        errors,
    }
}

/// Nearest-rank percentile over an ascending-sorted sample:
/// index = ceil(p × n) − 1, clamped to [0, n−1]. Returns `None` for an
/// empty sample.
#[must_use]
pub fn nearest_rank(sorted_ascending: &[f64], percentile: f64) -> Option<f64> {
    if sorted_ascending.is_empty() {
        return None;
    }
    let len = sorted_ascending.len();
    let rank = (percentile * len as f64).ceil();
    let index = if rank < 1.0 {
        0
    } else {
        (rank as usize).saturating_sub(1).min(len.saturating_sub(1))
    };
    sorted_ascending.get(index).copied()
}
