// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), with σ the population standard deviation of
// the trailing window.
//
//   bandwidth% = (upper - lower) / mean * 100
//   %B         = (close - lower) / (upper - lower), 0.5 when the bands touch
//
// Squeeze: the current bandwidth is below 75% of the average bandwidth
// measured by sliding the same window across all history.  The baseline is
// only computed from 70 closes upward; below that the current bandwidth is
// its own baseline and the squeeze never fires.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Closes required before the sliding bandwidth baseline is computed.
const SQUEEZE_HISTORY: usize = 70;
const SQUEEZE_RATIO: f64 = 0.75;

/// Latest Bollinger Band reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerState {
    pub upper: f64,
    pub mean: f64,
    pub lower: f64,
    /// (upper - lower) / mean * 100
    pub bandwidth: f64,
    /// Position of the last close inside the envelope.
    pub percent_b: f64,
    /// Baseline bandwidth the squeeze is measured against.
    pub avg_bandwidth: f64,
    pub squeeze: bool,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Returns `None` when:
/// - Fewer than `period` data points.
/// - The mean is zero (degenerate input).
pub fn calculate_bollinger(closes: &[f64], period: usize, mult: f64) -> Option<BollingerState> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let (mean, std_dev) = window_stats(&closes[closes.len() - period..])?;
    let upper = mean + mult * std_dev;
    let lower = mean - mult * std_dev;
    let bandwidth = (upper - lower) / mean * 100.0;

    let last = closes[closes.len() - 1];
    let percent_b = if upper != lower {
        (last - lower) / (upper - lower)
    } else {
        0.5
    };

    let avg_bandwidth = if closes.len() >= SQUEEZE_HISTORY {
        let widths: Vec<f64> = closes
            .windows(period)
            .filter_map(window_stats)
            .map(|(m, sd)| (2.0 * mult * sd) / m * 100.0)
            .collect();
        if widths.is_empty() {
            bandwidth
        } else {
            widths.iter().sum::<f64>() / widths.len() as f64
        }
    } else {
        bandwidth
    };

    if !bandwidth.is_finite() || !percent_b.is_finite() {
        return None;
    }

    Some(BollingerState {
        upper,
        mean,
        lower,
        bandwidth,
        percent_b,
        avg_bandwidth,
        squeeze: bandwidth < avg_bandwidth * SQUEEZE_RATIO,
    })
}

/// Mean and population standard deviation of a window.
fn window_stats(window: &[f64]) -> Option<(f64, f64)> {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    if mean == 0.0 || !mean.is_finite() {
        return None;
    }
    let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}
