//! Worker tasks and their lifecycle.
//!
//! - `reader`: pulls messages from the source into the handoff channel
//! - `inspector`: takes candidates off the channel, decides, forwards
//!
//! `Bridge` owns both tasks: one of each for the life of the process,
//! joined by a single-slot channel.

pub mod inspector;
pub mod reader;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::channels::MessageSource;
use crate::config::InspectorConfig;
use crate::pipeline::{DecisionEngine, Forwarder};

pub use inspector::spawn_inspector;
pub use reader::spawn_reader;

/// At most one candidate waits between the reader and the inspector.
pub const HANDOFF_CAPACITY: usize = 1;

/// Running read → decide → forward pipeline.
pub struct Bridge {
    source: Arc<dyn MessageSource>,
    shutdown: watch::Sender<bool>,
    reader: JoinHandle<()>,
    inspector: JoinHandle<()>,
    grace: Duration,
}

impl Bridge {
    /// Start the pipeline with an entropy-seeded decision engine.
    pub fn start(
        config: &InspectorConfig,
        source: Arc<dyn MessageSource>,
        forwarder: Forwarder,
    ) -> Self {
        let engine = DecisionEngine::new(config.decision_delay);
        Self::start_with_engine(config, source, engine, forwarder)
    }

    /// Start the pipeline with a caller-supplied engine.
    pub fn start_with_engine(
        config: &InspectorConfig,
        source: Arc<dyn MessageSource>,
        engine: DecisionEngine,
        forwarder: Forwarder,
    ) -> Self {
        let (tx, rx) = mpsc::channel(HANDOFF_CAPACITY);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let reader = spawn_reader(Arc::clone(&source), tx);
        let inspector = spawn_inspector(rx, engine, forwarder, shutdown_rx);

        Self {
            source,
            shutdown,
            reader,
            inspector,
            grace: config.shutdown_grace,
        }
    }

    /// Close the source once, stop the inspector, and wait up to the grace
    /// period for both tasks. Records already taken off the queue but not
    /// yet forwarded are dropped.
    pub async fn shutdown(self) {
        let Self {
            source,
            shutdown,
            reader,
            inspector,
            grace,
        } = self;

        if let Err(e) = source.close() {
            error!(source = source.name(), error = %e, "Failed to close source");
        }
        drop(source);

        // The inspector may already be gone; nothing to signal then.
        let _ = shutdown.send(true);

        let deadline = Instant::now() + grace;
        join_until(reader, "reader", deadline).await;
        join_until(inspector, "inspector", deadline).await;
        info!("Pipeline stopped");
    }
}

async fn join_until(mut handle: JoinHandle<()>, task: &str, deadline: Instant) {
    match tokio::time::timeout_at(deadline, &mut handle).await {
        Ok(Ok(())) => debug!(task, "Task finished"),
        Ok(Err(e)) => error!(task, error = %e, "Task ended abnormally"),
        Err(_) => {
            warn!(task, "Task still running after grace period, aborting");
            handle.abort();
        }
    }
}
