//! Graceful shutdown with a drain deadline
//!
//! Once a shutdown signal arrives, in-flight requests get
//! `server.shutdown_timeout_secs` to finish before the server future is
//! dropped.

use std::{future::Future, time::Duration};

use tokio::{signal, sync::watch};
use tracing::{info, warn};

/// How the server stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// All connections closed on their own
    Drained,
    /// The drain deadline elapsed and open connections were dropped
    TimedOut,
}

/// Signal handle shared between the serve future and the deadline
#[derive(Debug)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Create a trigger and the receiver the deadline waits on
    #[must_use]
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, receiver)
    }

    /// Mark shutdown as started
    pub fn fire(&self) {
        let _ = self.sender.send(true);
    }
}

/// Drive `server` until it finishes, or until `timeout` after shutdown started
pub async fn run_with_deadline<S, E>(
    server: S,
    mut started: watch::Receiver<bool>,
    timeout: Duration,
) -> Result<ShutdownOutcome, E>
where
    S: Future<Output = Result<(), E>>,
{
    let deadline = async move {
        // A dropped sender means shutdown can no longer start
        if started.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
        info!("⏳ Waiting up to {:?} for connections to close...", timeout);
        tokio::time::sleep(timeout).await;
    };

    tokio::select! {
        result = server => result.map(|()| ShutdownOutcome::Drained),
        () = deadline => {
            warn!(timeout_secs = timeout.as_secs(), "Shutdown deadline elapsed, dropping open connections");
            Ok(ShutdownOutcome::TimedOut)
        }
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn stuck_server_is_dropped_after_deadline() {
        let (trigger, started) = ShutdownTrigger::new();
        let server = std::future::pending::<Result<(), Infallible>>();

        trigger.fire();
        let outcome = run_with_deadline(server, started, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(outcome, ShutdownOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_does_not_run_before_shutdown() {
        let (trigger, started) = ShutdownTrigger::new();
        let server = async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<(), Infallible>(())
        };

        let outcome = run_with_deadline(server, started, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(outcome, ShutdownOutcome::Drained);
        drop(trigger);
    }

    #[tokio::test(start_paused = true)]
    async fn server_finishing_within_deadline_is_drained() {
        let (trigger, started) = ShutdownTrigger::new();
        trigger.fire();
        let server = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<(), Infallible>(())
        };

        let outcome = run_with_deadline(server, started, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(outcome, ShutdownOutcome::Drained);
    }

    #[tokio::test]
    async fn server_errors_are_returned() {
        let (_trigger, started) = ShutdownTrigger::new();
        let server = async { Err::<(), &str>("bind lost") };

        let err = run_with_deadline(server, started, Duration::from_secs(30))
            .await
            .unwrap_err();

        assert_eq!(err, "bind lost");
    }
}
