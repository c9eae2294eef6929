// =============================================================================
// Wilder Smoothing
// =============================================================================
//
// Shared running average behind RSI and ATR: seeded with the simple mean of
// the first `period` samples, then `avg = (avg * (period - 1) + x) / period`.
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WilderAverage {
    period: f64,
    value: f64,
}

impl WilderAverage {
    /// Seed from the first `period` samples.  `None` when `seed` is empty or
    /// its mean is non-finite.
    pub fn seed(seed: &[f64]) -> Option<Self> {
        if seed.is_empty() {
            return None;
        }
        let period = seed.len() as f64;
        let value = seed.iter().sum::<f64>() / period;
        value.is_finite().then_some(Self { period, value })
    }

    pub fn update(&mut self, sample: f64) -> f64 {
        self.value = (self.value * (self.period - 1.0) + sample) / self.period;
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}
