// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line  = EMA(12) - EMA(26)
//   Signal     = EMA(9) of the MACD line, restricted to indices >= 26 so the
//                unstable EMA warm-up region is never smoothed into it
//   Histogram  = MACD - Signal
//
// Crossovers compare the sign of the current histogram against the previous
// bar's histogram.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::calculate_ema;

const FAST: usize = 12;
const SLOW: usize = 26;
const SIGNAL: usize = 9;

/// Minimum number of closes before MACD is reported.
pub const MACD_MIN_CLOSES: usize = 35;

/// Latest MACD reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdState {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub prev_histogram: f64,
    /// Previous histogram <= 0 and current > 0.
    pub bullish_cross: bool,
    /// Previous histogram >= 0 and current < 0.
    pub bearish_cross: bool,
    /// Current histogram above the previous one.
    pub rising: bool,
}

/// Compute the latest MACD state.
///
/// Returns `None` with fewer than 35 closes or when the trimmed MACD line
/// holds fewer than two points.
pub fn calculate_macd(closes: &[f64]) -> Option<MacdState> {
    if closes.len() < MACD_MIN_CLOSES {
        return None;
    }

    let ema_fast = calculate_ema(closes, FAST);
    let ema_slow = calculate_ema(closes, SLOW);

    let trimmed: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .skip(SLOW)
        .map(|(f, s)| f - s)
        .collect();

    if trimmed.len() < 2 {
        return None;
    }

    let signal_line = calculate_ema(&trimmed, SIGNAL);
    let cur = trimmed.len() - 1;
    let prev = cur - 1;

    let histogram = trimmed[cur] - signal_line[cur];
    let prev_histogram = trimmed[prev] - signal_line[prev];

    Some(MacdState {
        macd: trimmed[cur],
        signal: signal_line[cur],
        histogram,
        prev_histogram,
        bullish_cross: prev_histogram <= 0.0 && histogram > 0.0,
        bearish_cross: prev_histogram >= 0.0 && histogram < 0.0,
        rising: histogram > prev_histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_unavailable_below_minimum() {
        let closes: Vec<f64> = (0..34).map(|i| 100.0 + i as f64).collect();
        assert!(calculate_macd(&closes).is_none());
    }

    #[test]
    fn macd_available_at_37_closes() {
        let closes: Vec<f64> = (0..37).map(|i| 100.0 + i as f64).collect();
        assert!(calculate_macd(&closes).is_some());
    }

    #[test]
    fn macd_available_at_minimum() {
        let closes: Vec<f64> = (0..35).map(|i| 100.0 + (i as f64).sin()).collect();
        assert!(calculate_macd(&closes).is_some());
    }

    #[test]
    fn macd_positive_in_steady_uptrend() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + i as f64 * 0.5).collect();
        let m = calculate_macd(&closes).unwrap();
        assert!(m.macd > 0.0);
        assert!((m.histogram - (m.macd - m.signal)).abs() < 1e-12);
    }

    #[test]
    fn macd_flat_series_has_no_crossover() {
        let m = calculate_macd(&vec![50.0; 60]).unwrap();
        assert_eq!(m.histogram, 0.0);
        assert!(!m.bullish_cross);
        // prev >= 0 and current < 0 is false for 0 -> 0
        assert!(!m.bearish_cross);
        assert!(!m.rising);
    }

    #[test]
    fn macd_bullish_cross_after_reversal() {
        // Long decline, then a sharp rally: the histogram must flip positive at
        // some bar; scan forward and check the flags agree with the sign change.
        let mut closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let mut saw_cross = false;
        for i in 0..30 {
            closes.push(141.0 + i as f64 * 3.0);
            let m = calculate_macd(&closes).unwrap();
            if m.bullish_cross {
                assert!(m.prev_histogram <= 0.0 && m.histogram > 0.0);
                assert!(m.rising);
                saw_cross = true;
                break;
            }
        }
        assert!(saw_cross, "expected a bullish crossover during the rally");
    }
}
