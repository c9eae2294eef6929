// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   k     = 2 / (period + 1)
//   EMA_0 = x_0
//   EMA_t = x_t * k + EMA_{t-1} * (1 - k)
//
// The series is seeded with the first data point, not an SMA, so the output
// is index-aligned with the input.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Compute the EMA series for `series` and look-back `period`.
///
/// The output has exactly one value per input point and its first value is
/// the first input value.
///
/// # Edge cases
/// - empty input => empty vec
/// - `period == 0` => empty vec (no meaningful smoothing constant)
pub fn calculate_ema(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || series.is_empty() {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);

    let mut result = Vec::with_capacity(series.len());
    let mut prev = series[0];
    result.push(prev);

    for &value in &series[1..] {
        prev = value * k + prev * (1.0 - k);
        result.push(prev);
    }

    result
}

/// EMA20 vs EMA50 trend reading on a close series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendState {
    pub ema20: f64,
    pub ema50: f64,
    /// EMA20 strictly above EMA50.
    pub in_uptrend: bool,
    /// (EMA20 - EMA50) / EMA50 * 100, or 0 when EMA50 is not positive.
    pub strength_pct: f64,
}

/// Classify the trend from the EMA20/EMA50 stack.
///
/// Returns `None` with fewer than 50 closes.
pub fn trend_alignment(closes: &[f64]) -> Option<TrendState> {
    if closes.len() < 50 {
        return None;
    }

    let ema20 = *calculate_ema(closes, 20).last()?;
    let ema50 = *calculate_ema(closes, 50).last()?;

    let strength_pct = if ema50 > 0.0 {
        (ema20 - ema50) / ema50 * 100.0
    } else {
        0.0
    };

    Some(TrendState {
        ema20,
        ema50,
        in_uptrend: ema20 > ema50,
        strength_pct,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
