use std::sync::Arc;

use tracing::{error, info};

use candidate_inspector::channels::KafkaSource;
use candidate_inspector::config::InspectorConfig;
use candidate_inspector::pipeline::Forwarder;
use candidate_inspector::worker::Bridge;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = InspectorConfig::load().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    eprintln!("🔎 Candidate Inspector v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Brokers: {}", config.brokers.join(", "));
    eprintln!("   Topic: {} (group {})", config.topic, config.group_id);
    eprintln!("   Recipient: {}", config.approval_url());
    eprintln!("   Decision delay: {:?}\n", config.decision_delay);

    let forwarder = Forwarder::new(config.approval_url(), config.http_timeout)?;

    // Without a consumer nothing is read, but we still wait for a signal.
    let bridge = match KafkaSource::connect(&config) {
        Ok(source) => Some(Bridge::start(&config, Arc::new(source), forwarder)),
        Err(e) => {
            error!(error = %e, "Consumer unavailable, no candidates will be read");
            None
        }
    };

    wait_for_signal().await?;
    info!("Shutting down inspector...");

    if let Some(bridge) = bridge {
        bridge.shutdown().await;
    }

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
