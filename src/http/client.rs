use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, AppResult, HttpError};

pub const DEFAULT_USER_AGENT: &str = concat!("meshbench/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client with the per-request timeout applied.
///
/// # Errors
///
/// Returns an error when the underlying TLS/connector setup fails.
pub fn build_client(timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
