//! Success/failure strategy for simulated generation.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tansan_models::JobKind;

use crate::config::StudioConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Decides whether a simulated generation succeeds.
pub trait OutcomeDecider: Send + Sync {
    fn decide(&self, kind: JobKind) -> Outcome;
}

/// Fails when a uniform draw falls below the kind's failure rate.
#[derive(Debug)]
pub struct ProbabilisticOutcome<R> {
    rng: Mutex<R>,
    failure_rates: HashMap<JobKind, f64>,
}

impl<R: Rng + Send> ProbabilisticOutcome<R> {
    pub fn new(rng: R, failure_rates: impl IntoIterator<Item = (JobKind, f64)>) -> Self {
        Self {
            rng: Mutex::new(rng),
            failure_rates: failure_rates.into_iter().collect(),
        }
    }

    pub fn failure_rate(&self, kind: JobKind) -> f64 {
        self.failure_rates.get(&kind).copied().unwrap_or(0.0)
    }
}

impl ProbabilisticOutcome<StdRng> {
    /// Rates from `config`, seeded from `rng_seed` when set.
    pub fn from_config(config: &StudioConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(
            rng,
            JobKind::ALL
                .into_iter()
                .map(|kind| (kind, config.kind(kind).failure_rate)),
        )
    }
}

impl<R: Rng + Send> OutcomeDecider for ProbabilisticOutcome<R> {
    fn decide(&self, kind: JobKind) -> Outcome {
        let rate = self.failure_rate(kind);
        if rate <= 0.0 {
            return Outcome::Success;
        }
        let draw: f64 = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random();
        if draw < rate {
            Outcome::Failure
        } else {
            Outcome::Success
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSucceed;

impl OutcomeDecider for AlwaysSucceed {
    fn decide(&self, _kind: JobKind) -> Outcome {
        Outcome::Success
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFail;

impl OutcomeDecider for AlwaysFail {
    fn decide(&self, _kind: JobKind) -> Outcome {
        Outcome::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_never_fails() {
        let decider = ProbabilisticOutcome::new(StdRng::seed_from_u64(7), [(JobKind::Music, 0.0)]);
        assert!((0..500).all(|_| decider.decide(JobKind::Music) == Outcome::Success));
        assert_eq!(decider.decide(JobKind::Tts), Outcome::Success);
    }

    #[test]
    fn test_full_rate_always_fails() {
        let decider = ProbabilisticOutcome::new(StdRng::seed_from_u64(7), [(JobKind::Tts, 1.0)]);
        assert!((0..500).all(|_| decider.decide(JobKind::Tts) == Outcome::Failure));
    }

    #[test]
    fn test_rate_is_roughly_honored() {
        let decider = ProbabilisticOutcome::new(StdRng::seed_from_u64(42), [(JobKind::Tts, 0.1)]);
        let failures = (0..10_000)
            .filter(|_| decider.decide(JobKind::Tts) == Outcome::Failure)
            .count();
        assert!((700..1300).contains(&failures), "failures = {}", failures);
    }

    #[test]
    fn test_seeded_config_is_reproducible() {
        let config = StudioConfig::default().with_rng_seed(99);
        let a = ProbabilisticOutcome::from_config(&config);
        let b = ProbabilisticOutcome::from_config(&config);
        let draws_a: Vec<_> = (0..50).map(|_| a.decide(JobKind::Tts)).collect();
        let draws_b: Vec<_> = (0..50).map(|_| b.decide(JobKind::Tts)).collect();
        assert_eq!(draws_a, draws_b);
        assert_eq!(a.failure_rate(JobKind::Tts), 0.1);
    }

    #[test]
    fn test_fixed_deciders() {
        assert_eq!(AlwaysSucceed.decide(JobKind::Tts), Outcome::Success);
        assert_eq!(AlwaysFail.decide(JobKind::Voiceover), Outcome::Failure);
    }
}
