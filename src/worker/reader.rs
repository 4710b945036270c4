//! Read loop: pulls queue messages and hands candidates to the inspector.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::channels::MessageSource;
use crate::error::ChannelError;
use crate::pipeline::CandidateRecord;

/// First pause after a transient read error; doubled up to `MAX_BACKOFF`.
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Spawn the single long-lived reader task.
///
/// Each message becomes one `CandidateRecord`; the send waits while the
/// inspector is still busy with the previous one. A `Disconnected` error is
/// retried after a backoff. The loop ends on `Closed` (shutdown), on any
/// other source error, or when the inspector is gone.
pub fn spawn_reader(
    source: Arc<dyn MessageSource>,
    tx: mpsc::Sender<CandidateRecord>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(source = source.name(), "Reader started");

        let mut backoff = INITIAL_BACKOFF;

        loop {
            let message = match source.recv().await {
                Ok(message) => {
                    backoff = INITIAL_BACKOFF;
                    message
                }
                Err(e @ ChannelError::Disconnected { .. }) => {
                    warn!(
                        source = source.name(),
                        error = %e,
                        retry_in_ms = backoff.as_millis() as u64,
                        "Read interrupted, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    continue;
                }
                Err(ChannelError::Closed { .. }) => {
                    info!(source = source.name(), "Source closed, reader stopping");
                    break;
                }
                Err(e) => {
                    error!(source = source.name(), error = %e, "Read failed, reader stopping");
                    break;
                }
            };

            let candidate = CandidateRecord::from_message(&message);
            debug!(
                id = candidate.id,
                partition = message.partition,
                offset = message.offset,
                "Candidate received"
            );

            if tx.send(candidate).await.is_err() {
                debug!("Inspector gone, reader stopping");
                break;
            }
        }
    })
}
