//! Kafka message source: one consumer group subscription on one topic.

use std::future::Future;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::Message;
use tokio::sync::watch;
use tracing::info;

use crate::channels::{MessageSource, QueueMessage};
use crate::config::InspectorConfig;
use crate::error::ChannelError;

/// Minimum bytes the broker accumulates before answering a fetch (1 KB).
pub const FETCH_MIN_BYTES: u32 = 1_000;

/// Upper bound on the data returned by one fetch (10 MB).
pub const FETCH_MAX_BYTES: u32 = 10_000_000;

const NAME: &str = "kafka";

/// Consumer settings for the inspector's subscription.
pub fn client_config(config: &InspectorConfig) -> ClientConfig {
    let mut client = ClientConfig::new();
    client
        .set("bootstrap.servers", config.brokers.join(","))
        .set("group.id", &config.group_id)
        .set("fetch.min.bytes", FETCH_MIN_BYTES.to_string())
        .set("fetch.max.bytes", FETCH_MAX_BYTES.to_string())
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "earliest")
        .set("enable.partition.eof", "false");
    client
}

/// Kafka-backed [`MessageSource`].
///
/// Dropping the last handle leaves the consumer group; `close` unsubscribes
/// and wakes any pending `recv`.
pub struct KafkaSource {
    consumer: StreamConsumer,
    topic: String,
    closed: watch::Sender<bool>,
}

impl KafkaSource {
    /// Create the consumer and subscribe. Does not wait for the brokers.
    pub fn connect(config: &InspectorConfig) -> Result<Self, ChannelError> {
        let consumer: StreamConsumer = client_config(config)
            .create()
            .map_err(|e| ChannelError::StartupFailed {
                name: NAME.into(),
                reason: e.to_string(),
            })?;

        consumer
            .subscribe(&[config.topic.as_str()])
            .map_err(|e| ChannelError::StartupFailed {
                name: NAME.into(),
                reason: format!("subscribe to {}: {e}", config.topic),
            })?;

        info!(
            brokers = %config.brokers.join(","),
            group = %config.group_id,
            topic = %config.topic,
            "Kafka consumer subscribed"
        );

        let (closed, _) = watch::channel(false);
        Ok(Self {
            consumer,
            topic: config.topic.clone(),
            closed,
        })
    }

    fn closed_error(&self) -> ChannelError {
        ChannelError::Closed { name: NAME.into() }
    }
}

#[async_trait]
impl MessageSource for KafkaSource {
    fn name(&self) -> &str {
        NAME
    }

    async fn recv(&self) -> Result<QueueMessage, ChannelError> {
        let mut closed = self.closed.subscribe();
        let received = until_closed(&mut closed, async {
            self.consumer.recv().await.map(|m| QueueMessage {
                key: m.key().map(<[u8]>::to_vec),
                payload: m.payload().map(<[u8]>::to_vec),
                partition: m.partition(),
                offset: m.offset(),
            })
        })
        .await;

        match received {
            None => Err(self.closed_error()),
            Some(Ok(message)) => Ok(message),
            Some(Err(e)) => Err(consume_error(&e)),
        }
    }

    fn close(&self) -> Result<(), ChannelError> {
        if self.closed.send_replace(true) {
            return Ok(());
        }
        self.consumer.unsubscribe();
        info!(topic = %self.topic, "Kafka consumer closed");
        Ok(())
    }
}

/// Run `fut` unless the close flag is or becomes `true`; `None` means closed.
async fn until_closed<F: Future>(
    closed: &mut watch::Receiver<bool>,
    fut: F,
) -> Option<F::Output> {
    let already_closed = *closed.borrow_and_update();
    if already_closed {
        return None;
    }

    tokio::select! {
        _ = closed.changed() => None,
        output = fut => Some(output),
    }
}

/// Map a consumer error. Only librdkafka's fatal code ends the subscription;
/// broker transport failures and the like are retried by the reader.
fn consume_error(e: &KafkaError) -> ChannelError {
    if e.rdkafka_error_code() == Some(RDKafkaErrorCode::Fatal) {
        ChannelError::Fatal {
            name: NAME.into(),
            reason: e.to_string(),
        }
    } else {
        ChannelError::Disconnected {
            name: NAME.into(),
            reason: e.to_string(),
        }
    }
}
