//! Message sources feeding the inspection pipeline.

pub mod kafka;
pub mod source;

pub use kafka::KafkaSource;
pub use source::*;
