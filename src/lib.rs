//! Candidate inspector, a Kafka to HTTP bridge worker that decides on each candidate.

pub mod channels;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod worker;
