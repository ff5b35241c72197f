//! Bounded-concurrency scheduler driving the request cycle.
//!
//! A fixed pool of permits caps in-flight executions; outcomes flow back
//! over a channel in completion order. Request ids preserve dispatch order
//! for downstream correlation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::PerformanceSettings;
use crate::http::Executor;
use crate::metrics::OutcomeRecord;
use crate::shutdown::ShutdownReceiver;
use crate::workload::RequestCycle;

/// First request id of the main phase; warm-up executions never consume ids.
const FIRST_REQUEST_ID: u64 = 1;

/// Everything the main phase produced, ordered by completion.
#[derive(Debug)]
pub struct RunRecords {
    pub records: Vec<OutcomeRecord>,
    pub main_duration: Duration,
    pub interrupted: bool,
}

/// Runs the warm-up and main phases over the descriptor cycle.
///
/// Warm-up outcomes are discarded entirely. The main phase dispatches
/// exactly `total-requests` executions unless interrupted, in which case
/// dispatch stops and in-flight requests are drained into a partial result.
pub async fn run(
    performance: &PerformanceSettings,
    cycle: &RequestCycle,
    executor: &Arc<dyn Executor>,
    shutdown_rx: &mut ShutdownReceiver,
) -> RunRecords {
    if performance.warm_up_requests > 0 {
        info!(
            "Warming up with {} requests across {} descriptors",
            performance.warm_up_requests,
            cycle.len()
        );
        let warmup = drive_phase(
            performance.concurrent_requests,
            performance.warm_up_requests,
            cycle,
            executor,
            shutdown_rx,
        )
        .await;
        if warmup.interrupted {
            warn!("Interrupted during warm-up; nothing to report");
            return RunRecords {
                records: Vec::new(),
                main_duration: Duration::ZERO,
                interrupted: true,
            };
        }
    }

    info!(
        "Dispatching {} requests at concurrency {}",
        performance.total_requests, performance.concurrent_requests
    );
    let started = Instant::now();
    let main = drive_phase(
        performance.concurrent_requests,
        performance.total_requests,
        cycle,
        executor,
        shutdown_rx,
    )
    .await;
    let main_duration = started.elapsed();

    if main.interrupted {
        warn!(
            "Interrupted after {} of {} requests; reporting partial results",
            main.records.len(),
            performance.total_requests
        );
    }

    RunRecords {
        records: main.records,
        main_duration,
        interrupted: main.interrupted,
    }
}

struct PhaseOutcome {
    records: Vec<OutcomeRecord>,
    interrupted: bool,
}

async fn drive_phase(
    concurrent: usize,
    count: u64,
    cycle: &RequestCycle,
    executor: &Arc<dyn Executor>,
    shutdown_rx: &mut ShutdownReceiver,
) -> PhaseOutcome {
    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let mut interrupted = false;

    for seq in 0..count {
        let permit = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => {
                interrupted = true;
                break;
            }
            permit = Arc::clone(&semaphore).acquire_owned() => {
                let Ok(permit) = permit else { break };
                permit
            }
        };
        let Some(descriptor) = cycle.get(seq) else {
            break;
        };
        let descriptor = descriptor.clone();
        let request_id = seq.saturating_add(FIRST_REQUEST_ID);
        let executor = Arc::clone(executor);
        let outcome_tx = outcome_tx.clone();
        tokio::spawn(async move {
            let record = executor.execute(&descriptor, request_id).await;
            drop(permit);
            drop(outcome_tx.send(record));
        });
    }
    drop(outcome_tx);

    // Every spawned task holds a sender clone; the channel closes once the
    // last in-flight request finishes, interrupted or not.
    let mut records = Vec::new();
    while let Some(record) = outcome_rx.recv().await {
        records.push(record);
    }

    PhaseOutcome {
        records,
        interrupted,
    }
}
