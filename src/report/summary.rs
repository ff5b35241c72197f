use crate::config::{MetricKind, MetricSelection};
use crate::metrics::{EndpointAggregate, RunReport};

const HEADER_WIDTH: usize = 72;

/// Prints the per-endpoint summary table and overall line after a run,
/// filtered to the configured metric selection.
pub fn print_run_summary(report: &RunReport, metrics: &MetricSelection) {
    println!();
    println!("{}", "=".repeat(HEADER_WIDTH));
    println!("SUMMARY REPORT for {}", report.test_name);
    println!("{}", "=".repeat(HEADER_WIDTH));

    for aggregate in report.endpoints.values() {
        println!("  {}", format_aggregate_line(aggregate, metrics));
    }

    println!("{}", "-".repeat(HEADER_WIDTH));
    println!("  {}", format_aggregate_line(&report.overall, metrics));

    let failed: Vec<&EndpointAggregate> = report
        .endpoints
        .values()
        .filter(|aggregate| !aggregate.errors.is_empty())
        .collect();
    if !failed.is_empty() {
        println!();
        println!("Errors encountered:");
        for aggregate in failed {
            for message in &aggregate.errors {
                println!("  {} - {}", aggregate.endpoint, message);
            }
        }
    }
}

pub(crate) fn format_aggregate_line(
    aggregate: &EndpointAggregate,
    metrics: &MetricSelection,
) -> String {
    let mut segments = vec![format!(
        "{:<24} {:>5} reqs",
        aggregate.endpoint, aggregate.request_count
    )];

    if metrics.contains(MetricKind::SuccessRate) {
        segments.push(format!("Success: {:6.2}%", aggregate.success_rate * 100.0));
    }
    if metrics.contains(MetricKind::Avg) {
        segments.push(format!("Avg: {}", format_ms(aggregate.avg_response_time)));
    }
    if metrics.contains(MetricKind::Min) {
        segments.push(format!("Min: {}", format_ms(aggregate.min_response_time)));
    }
    if metrics.contains(MetricKind::Max) {
        segments.push(format!("Max: {}", format_ms(aggregate.max_response_time)));
    }
    if metrics.contains(MetricKind::P50) {
        segments.push(format!("p50: {}", format_ms(aggregate.p50_response_time)));
    }
    if metrics.contains(MetricKind::P95) {
        segments.push(format!("p95: {}", format_ms(aggregate.p95_response_time)));
    }
    if metrics.contains(MetricKind::P99) {
        segments.push(format!("p99: {}", format_ms(aggregate.p99_response_time)));
    }
    if metrics.contains(MetricKind::Throughput) {
        segments.push(format!("{:6.2} req/s", aggregate.throughput));
    }

    segments.join(" | ")
}

fn format_ms(seconds: Option<f64>) -> String {
    seconds.map_or_else(
        || "n/a".to_owned(),
        |value| format!("{:7.2}ms", value * 1000.0),
    )
}
