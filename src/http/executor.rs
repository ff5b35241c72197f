use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tokio::time::Instant;
use tracing::debug;

use crate::config::HttpMethod;
use crate::metrics::OutcomeRecord;
use crate::workload::RequestDescriptor;

/// Executes one request descriptor into an outcome record. The seam lets
/// the scheduler run against a synthetic executor in tests.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, descriptor: &RequestDescriptor, request_id: u64) -> OutcomeRecord;
}

pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    /// Sends the descriptor's request and folds every failure mode into the
    /// record; nothing propagates past this boundary. A request is a success
    /// iff it completed without a transport error and a status code was
    /// captured; non-2xx codes still count as completed.
    async fn execute(&self, descriptor: &RequestDescriptor, request_id: u64) -> OutcomeRecord {
        let timestamp_ms = Utc::now().timestamp_millis();
        let start = Instant::now();

        let mut request = match descriptor.method {
            HttpMethod::Get => self.client.get(&descriptor.url),
            HttpMethod::Post => self.client.post(&descriptor.url),
        };
        if let Some(payload) = descriptor.payload.as_ref() {
            request = request.json(payload);
        }

        let (success, status_code, error) = match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // Drain the body so response time covers the full exchange.
                match response.bytes().await {
                    Ok(_) => (true, Some(status), None),
                    Err(err) => {
                        debug!("Reading body from {} failed: {}", descriptor.url, err);
                        (false, Some(status), Some(err.to_string()))
                    }
                }
            }
            Err(err) => {
                debug!("Request to {} failed: {}", descriptor.url, err);
                let status = err.status().map(|status| status.as_u16());
                (false, status, Some(err.to_string()))
            }
        };

        OutcomeRecord {
            endpoint: descriptor.label.clone(),
            request_id,
            timestamp_ms,
            response_time: start.elapsed().as_secs_f64(),
            success,
            status_code,
            error,
        }
    }
}
