use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The outcome of a single executed request. Produced by the executor,
/// immutable afterwards; response times are wall-clock seconds around the
/// call itself, excluding scheduling delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub endpoint: String,
    /// Sequential id in dispatch order, starting at 1 for the main phase.
    pub request_id: u64,
    /// Unix epoch milliseconds at dispatch.
    pub timestamp_ms: i64,
    pub response_time: f64,
    pub success: bool,
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reduced statistics for one aggregation label. Latency fields are `None`
/// when the label saw no successful request, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointAggregate {
    pub endpoint: String,
    pub request_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub avg_response_time: Option<f64>,
    pub min_response_time: Option<f64>,
    pub max_response_time: Option<f64>,
    pub p50_response_time: Option<f64>,
    pub p95_response_time: Option<f64>,
    pub p99_response_time: Option<f64>,
    /// Successful requests per second over the main-phase wall duration.
    pub throughput: f64,
    /// Fraction in [0, 1]; the text summary renders percentages.
    pub success_rate: f64,
    pub error_rate: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlockRangeSnapshot {
    pub start: u64,
    pub end: u64,
}

/// Snapshot of the settings a run was executed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub concurrent_requests: usize,
    pub total_requests: u64,
    pub timeout_seconds: u64,
    pub warm_up_requests: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_range: Option<BlockRangeSnapshot>,
}

/// The complete serialized artifact of one run; written once, read-only
/// afterwards by the comparison and chart tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub test_name: String,
    pub base_url: String,
    pub started_at: String,
    pub finished_at: String,
    pub config: ConfigSnapshot,
    pub endpoints: BTreeMap<String, EndpointAggregate>,
    pub overall: EndpointAggregate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_timings: Option<Vec<OutcomeRecord>>,
}
