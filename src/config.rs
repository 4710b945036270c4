//! Configuration types.
//!
//! Every setting can be given as a long flag or as an environment variable;
//! the flag wins when both are present. The four connection settings are
//! required and an empty value is rejected before anything is started.

use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;

/// Default simulated processing delay before a decision is made.
pub const DEFAULT_DECISION_DELAY_MS: u64 = 3000;

/// Default time allowed for the worker tasks to stop after a signal.
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

/// Command-line / environment surface.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "candidate-inspector",
    about = "Consume candidate records from Kafka, decide, and post the verdict over HTTP",
    version
)]
pub struct InspectorArgs {
    /// Kafka bootstrap brokers to connect to, as a comma separated list
    #[arg(long, env = "KAFKA_BROKERS")]
    pub brokers: Option<String>,

    /// Kafka consumer group definition
    #[arg(long, env = "CONSUMER_GROUP")]
    pub group: Option<String>,

    /// Kafka topic to be consumed
    #[arg(long, env = "KAFKA_TOPIC")]
    pub topic: Option<String>,

    /// Host of the response recipient (host[:port], no scheme)
    #[arg(long = "host", env = "RECIPIENT_HOST")]
    pub recipient_host: Option<String>,

    /// Simulated processing time per candidate in milliseconds, 0 disables it
    #[arg(long, env = "DECISION_DELAY_MS", default_value_t = DEFAULT_DECISION_DELAY_MS)]
    pub decision_delay_ms: u64,

    /// Timeout for the outbound HTTP call in seconds (unset means no timeout)
    #[arg(long, env = "HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,

    /// Seconds to wait for the worker tasks to stop on shutdown
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = DEFAULT_SHUTDOWN_GRACE_SECS)]
    pub shutdown_grace_secs: u64,
}

/// Validated inspector configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct InspectorConfig {
    /// Kafka bootstrap brokers (`host:port`).
    pub brokers: Vec<String>,
    /// Kafka consumer group id.
    pub group_id: String,
    /// Topic holding candidate records.
    pub topic: String,
    /// Recipient host for decisions, without scheme.
    pub recipient_host: String,
    /// Simulated processing time before each decision.
    pub decision_delay: Duration,
    /// Outbound HTTP timeout; `None` waits indefinitely.
    pub http_timeout: Option<Duration>,
    /// Grace period for the worker tasks on shutdown.
    pub shutdown_grace: Duration,
}

impl InspectorConfig {
    /// Parse flags and environment, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(InspectorArgs::parse())
    }

    /// Validate parsed arguments.
    pub fn from_args(args: InspectorArgs) -> Result<Self, ConfigError> {
        let brokers_raw = required(args.brokers, "brokers", "--brokers", "KAFKA_BROKERS")?;
        let topic = required(args.topic, "topic", "--topic", "KAFKA_TOPIC")?;
        let group_id = required(args.group, "group", "--group", "CONSUMER_GROUP")?;
        let recipient_host =
            required(args.recipient_host, "recipient host", "--host", "RECIPIENT_HOST")?;

        let brokers: Vec<String> = brokers_raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // A value made only of commas is as good as empty.
        if brokers.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "brokers".into(),
                message: format!("no broker addresses in {brokers_raw:?}"),
            });
        }

        Ok(Self {
            brokers,
            group_id,
            topic,
            recipient_host,
            decision_delay: Duration::from_millis(args.decision_delay_ms),
            http_timeout: args.http_timeout_secs.map(Duration::from_secs),
            shutdown_grace: Duration::from_secs(args.shutdown_grace_secs),
        })
    }

    /// Full URL decisions are posted to.
    pub fn approval_url(&self) -> String {
        format!("http://{}/approval/", self.recipient_host)
    }
}

fn required(
    value: Option<String>,
    key: &str,
    flag: &str,
    env: &str,
) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingRequired {
            key: key.to_string(),
            hint: format!("Set the {flag} flag or the {env} environment variable"),
        }),
    }
}
