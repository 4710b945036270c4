//! Inspector loop: decide on each candidate and forward the verdict.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::pipeline::{CandidateRecord, DecisionEngine, Forwarder};

/// Spawn the single long-lived decide-and-forward task.
///
/// Runs until the channel closes or `shutdown` flips to `true`. A shutdown
/// cancels a pending simulated delay but never an HTTP call already sent.
pub fn spawn_inspector(
    mut rx: mpsc::Receiver<CandidateRecord>,
    mut engine: DecisionEngine,
    forwarder: Forwarder,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(url = forwarder.url(), "Inspector started");

        loop {
            let candidate = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                next = rx.recv() => match next {
                    Some(candidate) => candidate,
                    None => break,
                },
            };

            let decision = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                decision = engine.inspect(candidate) => decision,
            };

            match forwarder.forward(&decision).await {
                Ok(delivery) if delivery.status.is_success() => {
                    info!(
                        id = decision.id,
                        approve = decision.approve.as_i32(),
                        status = delivery.status.as_u16(),
                        response = %delivery.body,
                        "Decision delivered"
                    );
                }
                Ok(delivery) => {
                    warn!(
                        id = decision.id,
                        approve = decision.approve.as_i32(),
                        status = delivery.status.as_u16(),
                        response = %delivery.body,
                        "Recipient rejected decision"
                    );
                }
                Err(e) => {
                    error!(id = decision.id, error = %e, "Failed to forward decision");
                }
            }
        }

        info!("Inspector stopped");
    })
}

/// Resolve once the flag is `true` (or its sender is gone).
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        let stopping = *shutdown.borrow_and_update();
        if stopping || shutdown.changed().await.is_err() {
            return;
        }
    }
}
