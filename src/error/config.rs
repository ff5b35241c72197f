use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML config '{path}': {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .yaml, .yml, or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have a .yaml, .yml, or .json extension.")]
    MissingExtension,
    #[error("No config file found. Pass --config or create meshbench.yaml.")]
    NoConfigFound,
    #[error("Config is missing 'base-url'.")]
    MissingBaseUrl,
    #[error("Invalid base-url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Config must declare at least one endpoint.")]
    NoEndpoints,
    #[error("Endpoint {index} is missing 'path'.")]
    EndpointMissingPath { index: usize },
    #[error("Block range start {start} must be <= end {end}.")]
    BlockRangeInverted { start: i64, end: i64 },
    #[error("Block range bounds must not be negative (got {value}).")]
    BlockRangeNegative { value: i64 },
    #[error("Config '{field}' must be >= 1.")]
    FieldMustBePositive { field: &'static str },
    #[error("Unknown metric '{name}'. Known metrics: {known}.")]
    UnknownMetric { name: String, known: &'static str },
}
