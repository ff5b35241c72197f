use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Default test name when the config omits one.
const DEFAULT_TEST_NAME: &str = "performance-test";
/// Performance defaults applied when the `performance` section is sparse.
const DEFAULT_CONCURRENT_REQUESTS: u64 = 10;
const DEFAULT_TOTAL_REQUESTS: u64 = 100;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_WARM_UP_REQUESTS: u64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[serde(alias = "get")]
    Get,
    #[default]
    #[serde(alias = "post")]
    Post,
}

/// Raw configuration document as parsed from YAML or JSON.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    pub test_name: Option<String>,
    pub base_url: Option<String>,
    pub block_range: Option<BlockRangeConfig>,
    pub performance: Option<PerformanceConfig>,
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BlockRangeConfig {
    #[serde(default)]
    pub enabled: bool,
    pub start: Option<i64>,
    pub end: Option<i64>,
    #[serde(default)]
    pub per_block_labels: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PerformanceConfig {
    pub concurrent_requests: Option<u64>,
    pub total_requests: Option<u64>,
    pub timeout_seconds: Option<u64>,
    pub warm_up_requests: Option<u64>,
    pub metrics: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndpointConfig {
    pub path: Option<String>,
    pub method: Option<HttpMethod>,
    #[serde(default)]
    pub uses_block_index: bool,
    pub payload: Option<serde_json::Value>,
}

/// One declared endpoint, immutable once loaded.
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    pub path: String,
    pub method: HttpMethod,
    pub uses_block_index: bool,
    pub payload: Option<serde_json::Value>,
}

/// Inclusive block-index range used to parameterize block-indexed endpoints.
#[derive(Debug, Clone, Copy)]
pub struct BlockRange {
    pub enabled: bool,
    pub start: u64,
    pub end: u64,
    /// When true, block-indexed requests are labeled `"<path>#<block>"` and
    /// aggregated per block; otherwise they share the endpoint's path label.
    pub per_block_labels: bool,
}

impl BlockRange {
    pub(crate) const DISABLED: Self = Self {
        enabled: false,
        start: 1,
        end: 1,
        per_block_labels: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Avg,
    Min,
    Max,
    P50,
    P95,
    P99,
    Throughput,
    SuccessRate,
}

impl MetricKind {
    const KNOWN: &'static str = "avg, min, max, p50, p95, p99, throughput, success-rate";

    const ALL: [MetricKind; 8] = [
        MetricKind::Avg,
        MetricKind::Min,
        MetricKind::Max,
        MetricKind::P50,
        MetricKind::P95,
        MetricKind::P99,
        MetricKind::Throughput,
        MetricKind::SuccessRate,
    ];

    fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "avg" => Ok(MetricKind::Avg),
            "min" => Ok(MetricKind::Min),
            "max" => Ok(MetricKind::Max),
            "p50" => Ok(MetricKind::P50),
            "p95" => Ok(MetricKind::P95),
            "p99" => Ok(MetricKind::P99),
            "throughput" => Ok(MetricKind::Throughput),
            "success-rate" => Ok(MetricKind::SuccessRate),
            _ => Err(ConfigError::UnknownMetric {
                name: name.to_owned(),
                known: Self::KNOWN,
            }),
        }
    }
}

/// The metrics the text summary renders; the JSON report always carries all.
#[derive(Debug, Clone)]
pub struct MetricSelection {
    selected: Vec<MetricKind>,
}

impl MetricSelection {
    #[must_use]
    pub fn all() -> Self {
        Self {
            selected: MetricKind::ALL.to_vec(),
        }
    }

    /// Parses a metric-name list from the config document.
    ///
    /// # Errors
    ///
    /// Returns an error for names outside the known metric set. An empty
    /// list selects every metric.
    pub fn from_names(names: &[String]) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Ok(Self::all());
        }
        let selected = names
            .iter()
            .map(|name| MetricKind::parse(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selected })
    }

    #[must_use]
    pub fn contains(&self, kind: MetricKind) -> bool {
        self.selected.contains(&kind)
    }
}

impl Default for MetricSelection {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone)]
pub struct PerformanceSettings {
    pub concurrent_requests: usize,
    pub total_requests: u64,
    pub timeout: Duration,
    pub warm_up_requests: u64,
    pub metrics: MetricSelection,
}

/// Fully validated configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub test_name: String,
    pub base_url: String,
    pub block_range: BlockRange,
    pub performance: PerformanceSettings,
    pub endpoints: Vec<EndpointSpec>,
}

impl RunConfig {
    /// Validates a parsed config document into run settings.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing/invalid base URL, an invalid block
    /// range, an empty endpoint list, non-positive performance values, or
    /// unknown metric names.
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let base_url = file.base_url.ok_or(ConfigError::MissingBaseUrl)?;
        Url::parse(&base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            source: err,
        })?;
        let base_url = base_url.trim_end_matches('/').to_owned();

        let block_range = file
            .block_range
            .as_ref()
            .map_or(Ok(BlockRange::DISABLED), validate_block_range)?;

        let performance = validate_performance(file.performance.unwrap_or_default())?;

        if file.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        let endpoints = file
            .endpoints
            .into_iter()
            .enumerate()
            .map(|(index, endpoint)| {
                let path = endpoint
                    .path
                    .filter(|path| !path.trim().is_empty())
                    .ok_or(ConfigError::EndpointMissingPath { index })?;
                Ok(EndpointSpec {
                    path,
                    method: endpoint.method.unwrap_or_default(),
                    uses_block_index: endpoint.uses_block_index,
                    payload: endpoint.payload,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            test_name: file.test_name.unwrap_or_else(|| DEFAULT_TEST_NAME.to_owned()),
            base_url,
            block_range,
            performance,
            endpoints,
        })
    }
}

fn validate_block_range(config: &BlockRangeConfig) -> Result<BlockRange, ConfigError> {
    let start = config.start.unwrap_or(1);
    let end = config.end.unwrap_or(1);
    if !config.enabled {
        return Ok(BlockRange::DISABLED);
    }
    for value in [start, end] {
        if value < 0 {
            return Err(ConfigError::BlockRangeNegative { value });
        }
    }
    if start > end {
        return Err(ConfigError::BlockRangeInverted { start, end });
    }
    Ok(BlockRange {
        enabled: true,
        start: u64::try_from(start).unwrap_or(0),
        end: u64::try_from(end).unwrap_or(0),
        per_block_labels: config.per_block_labels,
    })
}

fn validate_performance(config: PerformanceConfig) -> Result<PerformanceSettings, ConfigError> {
    let concurrent = config
        .concurrent_requests
        .unwrap_or(DEFAULT_CONCURRENT_REQUESTS);
    if concurrent == 0 {
        return Err(ConfigError::FieldMustBePositive {
            field: "performance.concurrent-requests",
        });
    }
    let total = config.total_requests.unwrap_or(DEFAULT_TOTAL_REQUESTS);
    if total == 0 {
        return Err(ConfigError::FieldMustBePositive {
            field: "performance.total-requests",
        });
    }
    let timeout_seconds = config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    if timeout_seconds == 0 {
        return Err(ConfigError::FieldMustBePositive {
            field: "performance.timeout-seconds",
        });
    }
    let metrics = config
        .metrics
        .map_or(Ok(MetricSelection::all()), |names| {
            MetricSelection::from_names(&names)
        })?;

    Ok(PerformanceSettings {
        concurrent_requests: usize::try_from(concurrent).unwrap_or(usize::MAX),
        total_requests: total,
        timeout: Duration::from_secs(timeout_seconds),
        warm_up_requests: config.warm_up_requests.unwrap_or(DEFAULT_WARM_UP_REQUESTS),
        metrics,
    })
}
