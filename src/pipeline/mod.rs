//! Candidate inspection pipeline.
//!
//! Every candidate taken off the queue flows through:
//! 1. `types`: key/value decoding into a `CandidateRecord`
//! 2. `decision`: simulated check and weighted verdict
//! 3. `forwarder`: one HTTP POST of the `DecisionRecord`
//!
//! No retries: a failed delivery is logged and the next candidate proceeds.

pub mod decision;
pub mod forwarder;
pub mod types;

pub use decision::DecisionEngine;
pub use forwarder::{Delivery, Forwarder};
pub use types::{CandidateRecord, ClientRecord, DecisionRecord, Verdict};
