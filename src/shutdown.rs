use tokio::sync::broadcast;
use tracing::warn;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

/// Single-slot fan-out; one interrupt notification is all a run needs.
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}

/// Forwards a process interrupt into the shutdown channel so the scheduler
/// stops dispatching and in-flight requests drain. The task also exits when
/// a shutdown is sent from elsewhere, so the run can reap it on completion.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    // Subscribe before spawning so a send racing the task startup is not
    // lost.
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_rx.recv() => {}
            () = interrupt_signal() => {
                drop(shutdown_tx.send(()));
            }
        }
    })
}

/// Resolves once the process receives Ctrl+C, or SIGTERM on Unix.
async fn interrupt_signal() {
    #[cfg(unix)]
    {
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(term_signal) => Some(term_signal),
            Err(err) => {
                warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            () = async {
                if let Some(term_signal) = term_signal.as_mut() {
                    term_signal.recv().await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {}
        }
    }

    #[cfg(not(unix))]
    {
        drop(tokio::signal::ctrl_c().await);
    }
}
