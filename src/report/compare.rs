use std::collections::BTreeSet;

use crate::metrics::{EndpointAggregate, RunReport};

/// Percent delta beyond which a metric counts as improved or regressed.
pub const DELTA_THRESHOLD_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaClass {
    Improved,
    Regressed,
    Similar,
}

impl DeltaClass {
    /// Classifies a percent delta with a strict ±5% threshold; an exact
    /// ±5% delta is Similar.
    #[must_use]
    pub const fn classify(delta_pct: f64) -> Self {
        if delta_pct < -DELTA_THRESHOLD_PCT {
            DeltaClass::Improved
        } else if delta_pct > DELTA_THRESHOLD_PCT {
            DeltaClass::Regressed
        } else {
            DeltaClass::Similar
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DeltaClass::Improved => "↓ Improved",
            DeltaClass::Regressed => "↑ Regressed",
            DeltaClass::Similar => "≈ Similar",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricDelta {
    pub metric: &'static str,
    /// Seconds, as stored in the reports.
    pub left: f64,
    pub right: f64,
    pub delta_pct: f64,
    pub class: DeltaClass,
}

#[derive(Debug, Clone)]
pub struct EndpointComparison {
    pub endpoint: String,
    pub deltas: Vec<MetricDelta>,
    pub left_count: Option<u64>,
    pub right_count: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub left_name: String,
    pub right_name: String,
    pub improvements: u64,
    pub regressions: u64,
    pub endpoints: Vec<EndpointComparison>,
}

const COMPARED_METRICS: [(&str, fn(&EndpointAggregate) -> Option<f64>); 4] = [
    ("avg", |aggregate| aggregate.avg_response_time),
    ("p50", |aggregate| aggregate.p50_response_time),
    ("p95", |aggregate| aggregate.p95_response_time),
    ("p99", |aggregate| aggregate.p99_response_time),
];

/// Compares two run reports per endpoint label across avg/p50/p95/p99.
/// A metric contributes a delta only when both runs report it.
#[must_use]
pub fn compare_reports(left: &RunReport, right: &RunReport) -> Comparison {
    let labels: BTreeSet<&String> = left.endpoints.keys().chain(right.endpoints.keys()).collect();

    let mut improvements: u64 = 0;
    let mut regressions: u64 = 0;
    let mut endpoints = Vec::with_capacity(labels.len());

    for label in labels {
        let left_aggregate = left.endpoints.get(label);
        let right_aggregate = right.endpoints.get(label);

        let mut deltas = Vec::new();
        if let (Some(left_aggregate), Some(right_aggregate)) = (left_aggregate, right_aggregate) {
            for (metric, extract) in COMPARED_METRICS {
                let (Some(left_value), Some(right_value)) =
                    (extract(left_aggregate), extract(right_aggregate))
                else {
                    continue;
                };
                if left_value <= 0.0 {
                    continue;
                }
                let delta_pct = (right_value - left_value) / left_value * 100.0;
                let class = DeltaClass::classify(delta_pct);
                match class {
                    DeltaClass::Improved => improvements = improvements.saturating_add(1),
                    DeltaClass::Regressed => regressions = regressions.saturating_add(1),
                    DeltaClass::Similar => {}
                }
                deltas.push(MetricDelta {
                    metric,
                    left: left_value,
                    right: right_value,
                    delta_pct,
                    class,
                });
            }
        }

        endpoints.push(EndpointComparison {
            endpoint: label.clone(),
            deltas,
            left_count: left_aggregate.map(|aggregate| aggregate.request_count),
            right_count: right_aggregate.map(|aggregate| aggregate.request_count),
        });
    }

    Comparison {
        left_name: left.test_name.clone(),
        right_name: right.test_name.clone(),
        improvements,
        regressions,
        endpoints,
    }
}

/// Renders the comparison as the textual report.
#[must_use]
pub fn render_comparison(comparison: &Comparison) -> String {
    let mut lines = vec![
        "Performance Test Comparison Report".to_owned(),
        "=".repeat(50),
        String::new(),
        format!("Test 1: {}", comparison.left_name),
        format!("Test 2: {}", comparison.right_name),
        String::new(),
        "Overall Summary".to_owned(),
        "-".repeat(15),
        format!(
            "Total Improvements: {} | Total Regressions: {}",
            comparison.improvements, comparison.regressions
        ),
        String::new(),
        "Detailed Comparison by Endpoint".to_owned(),
        "=".repeat(50),
    ];

    for endpoint in &comparison.endpoints {
        lines.push(String::new());
        lines.push(endpoint.endpoint.clone());
        lines.push("-".repeat(endpoint.endpoint.len().max(1)));

        match (endpoint.left_count, endpoint.right_count) {
            (Some(left_count), Some(right_count)) => {
                for delta in &endpoint.deltas {
                    lines.push(format!(
                        "  {:>4}: {:>8.1}ms → {:>8.1}ms ({:+6.1}%) {}",
                        delta.metric.to_uppercase(),
                        delta.left * 1000.0,
                        delta.right * 1000.0,
                        delta.delta_pct,
                        delta.class.as_str()
                    ));
                }
                if endpoint.deltas.is_empty() {
                    lines.push("  No comparable latency samples".to_owned());
                }
                lines.push(format!("  Requests: {} → {}", left_count, right_count));
            }
            (Some(_), None) => {
                lines.push("  Only present in Test 1".to_owned());
            }
            (None, Some(_)) => {
                lines.push("  Only present in Test 2".to_owned());
            }
            (None, None) => {}
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
