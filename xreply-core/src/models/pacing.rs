//! Delivery pacing.

use rand::Rng;
use std::time::Duration;

/// Per-character delay of simulated typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    /// Minimum delay.
    pub base: Duration,
    /// Random extra added on top of `base`.
    pub variance: Duration,
}

impl TypingDelay {
    /// No delay at all.
    pub const ZERO: Self = Self {
        base: Duration::ZERO,
        variance: Duration::ZERO,
    };

    /// Creates a delay from milliseconds.
    pub const fn from_millis(base: u64, variance: u64) -> Self {
        Self {
            base: Duration::from_millis(base),
            variance: Duration::from_millis(variance),
        }
    }

    /// Draws one per-character delay in `[base, base + variance)`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let variance_ms = u64::try_from(self.variance.as_millis()).unwrap_or(u64::MAX);
        if variance_ms == 0 {
            return self.base;
        }
        self.base + Duration::from_millis(rng.gen_range(0..variance_ms))
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self::from_millis(50, 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sample_bounds() {
        let delay = TypingDelay::from_millis(30, 20);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let d = delay.sample(&mut rng);
            assert!(d >= Duration::from_millis(30) && d < Duration::from_millis(50));
        }
        assert_eq!(TypingDelay::ZERO.sample(&mut rng), Duration::ZERO);
    }
}
