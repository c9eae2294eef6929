// =============================================================================
// Relative Strength Index
// =============================================================================
//
// Gains and losses of consecutive closes, each Wilder-smoothed, then
// RSI = 100 - 100 / (1 + avg_gain / avg_loss).  A zero average loss reads
// 100, including on a flat series.
//
// Playbook zones: 30-40 primary entry, above 70 hard-reject overbought.
// =============================================================================

use super::wilder::WilderAverage;

/// RSI series for `closes`, one value per close from index `period` on.
///
/// Empty when `period` is zero or there are fewer than `period + 1` closes.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip();

    let (Some(mut up), Some(mut down)) = (
        WilderAverage::seed(&gains[..period]),
        WilderAverage::seed(&losses[..period]),
    ) else {
        return Vec::new();
    };

    let mut series = Vec::with_capacity(gains.len() - period + 1);
    series.push(rsi_value(up.value(), down.value()));
    for (&gain, &loss) in gains[period..].iter().zip(&losses[period..]) {
        series.push(rsi_value(up.update(gain), down.update(loss)));
    }
    series
}

/// Latest RSI, `None` on insufficient history.
pub fn current_rsi(closes: &[f64], period: usize) -> Option<f64> {
    calculate_rsi(closes, period).last().copied()
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
}
