//! Decision engine: weighted random verdict after a simulated check.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::types::{CandidateRecord, DecisionRecord, Verdict};

/// Draws in `[0, DRAW_RANGE)` below this value are rejected (30%).
const REJECT_BELOW: u32 = 3;
const DRAW_RANGE: u32 = 10;

/// Produces one verdict per candidate.
pub struct DecisionEngine {
    rng: StdRng,
    delay: Duration,
}

impl DecisionEngine {
    /// Engine seeded from OS entropy.
    pub fn new(delay: Duration) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            delay,
        }
    }

    /// Deterministic engine for tests and replays.
    pub fn with_seed(seed: u64, delay: Duration) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            delay,
        }
    }

    /// Simulate the check, then decide.
    ///
    /// The wait is a plain timer, so dropping the future cancels it.
    pub async fn inspect(&mut self, candidate: CandidateRecord) -> DecisionRecord {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let decision = self.decide(candidate.id);
        debug!(
            id = decision.id,
            surname = %candidate.client.surname,
            approve = decision.approve.as_i32(),
            "Candidate inspected"
        );
        decision
    }

    /// Draw a verdict for `id` without waiting.
    pub fn decide(&mut self, id: i64) -> DecisionRecord {
        DecisionRecord {
            id,
            approve: draw_verdict(&mut self.rng),
        }
    }
}

/// 30% reject, 70% approve.
pub fn draw_verdict<R: Rng + ?Sized>(rng: &mut R) -> Verdict {
    if rng.gen_range(0..DRAW_RANGE) < REJECT_BELOW {
        Verdict::Reject
    } else {
        Verdict::Approve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::ClientRecord;

    #[test]
    fn split_is_roughly_thirty_seventy() {
        let mut engine = DecisionEngine::with_seed(7, Duration::ZERO);
        let draws = 100_000;
        let rejects = (0..draws)
            .filter(|i| engine.decide(*i).approve == Verdict::Reject)
            .count();

        let ratio = rejects as f64 / draws as f64;
        assert!((0.28..0.32).contains(&ratio), "reject ratio {ratio}");
    }

    #[test]
    fn verdict_is_always_plus_or_minus_one() {
        let mut engine = DecisionEngine::new(Duration::ZERO);
        for id in 0..1_000 {
            let decision = engine.decide(id);
            assert_eq!(decision.id, id);
            assert!(matches!(decision.approve.as_i32(), 1 | -1));
        }
    }

    #[test]
    fn same_seed_same_verdicts() {
        let mut a = DecisionEngine::with_seed(99, Duration::ZERO);
        let mut b = DecisionEngine::with_seed(99, Duration::ZERO);
        for id in 0..100 {
            assert_eq!(a.decide(id), b.decide(id));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn inspect_waits_for_the_delay() {
        let mut engine = DecisionEngine::with_seed(1, Duration::from_secs(3));
        let candidate = CandidateRecord {
            id: 42,
            client: ClientRecord::default(),
        };

        let started = tokio::time::Instant::now();
        let decision = engine.inspect(candidate).await;
        assert_eq!(decision.id, 42);
        assert!(started.elapsed() >= Duration::from_secs(3));
    }
}
