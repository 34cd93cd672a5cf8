// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulated packet loss.

use rand::Rng;

/// Default probability that a cycle's transmission is dropped.
pub const DEFAULT_DROP_PROBABILITY: f64 = 0.1;

/// Independent per-cycle Bernoulli trial deciding whether to skip transmission.
///
/// Carries no state between decisions: there is no limit on consecutive
/// drops and no compensation after one.
#[derive(Debug, Clone, Copy)]
pub struct LossDecider {
    probability: f64,
}

impl LossDecider {
    /// `probability` is clamped to `[0.0, 1.0]`; NaN never drops.
    pub fn new(probability: f64) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self { probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Returns `true` when this cycle's reading should be dropped.
    pub fn should_drop<R: Rng>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.probability
    }
}

impl Default for LossDecider {
    fn default() -> Self {
        Self::new(DEFAULT_DROP_PROBABILITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_drop_frequency_close_to_probability() {
        let decider = LossDecider::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 100_000;

        let drops = (0..trials).filter(|_| decider.should_drop(&mut rng)).count();
        let freq = drops as f64 / trials as f64;

        // 99% interval for p=0.1, n=1e5 is about +/-0.0025; allow 0.01.
        assert!((freq - 0.1).abs() < 0.01, "observed drop frequency {}", freq);
    }

    #[test]
    fn test_zero_never_drops() {
        let decider = LossDecider::new(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..10_000).all(|_| !decider.should_drop(&mut rng)));
    }

    #[test]
    fn test_one_always_drops() {
        let decider = LossDecider::new(1.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..10_000).all(|_| decider.should_drop(&mut rng)));
    }

    #[test]
    fn test_out_of_range_probability_clamped() {
        assert_eq!(LossDecider::new(1.5).probability(), 1.0);
        assert_eq!(LossDecider::new(-0.2).probability(), 0.0);
        assert_eq!(LossDecider::new(f64::NAN).probability(), 0.0);
    }
}
