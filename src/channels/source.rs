//! Message source abstraction.

use async_trait::async_trait;

use crate::error::ChannelError;

/// One message pulled from the queue, detached from the client that read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueMessage {
    /// Message key (the candidate id as decimal text).
    pub key: Option<Vec<u8>>,
    /// Message value (JSON client record).
    pub payload: Option<Vec<u8>>,
    pub partition: i32,
    pub offset: i64,
}

/// A pull-based subscription.
///
/// `recv` blocks until a message arrives. After `close`, pending and future
/// `recv` calls return `ChannelError::Closed`.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Source name for logs.
    fn name(&self) -> &str;

    /// Wait for the next message.
    async fn recv(&self) -> Result<QueueMessage, ChannelError>;

    /// Close the underlying connection.
    fn close(&self) -> Result<(), ChannelError>;
}
