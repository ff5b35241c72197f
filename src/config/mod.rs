//! Configuration loading and validation.
//!
//! A run is driven entirely by an explicit [`RunConfig`] built from the
//! declarative config file; components never read ambient state.
mod loader;
mod types;


pub use loader::{DEFAULT_CONFIG_FILES, load_config, load_config_file};
pub use types::{
    BlockRange, BlockRangeConfig, ConfigFile, EndpointConfig, EndpointSpec, HttpMethod, MetricKind,
    MetricSelection, PerformanceConfig, PerformanceSettings, RunConfig,
};

use crate::error::AppResult;

/// Loads and validates the run configuration in one step.
///
/// # Errors
///
/// Returns an error when no config file can be found, read, or parsed, or
/// when validation of the parsed document fails.
pub fn load_run_config(path: Option<&str>) -> AppResult<RunConfig> {
    let file = load_config(path)?;
    Ok(RunConfig::from_file(file)?)
}
