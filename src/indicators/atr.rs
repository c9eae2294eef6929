// =============================================================================
// Average True Range
// =============================================================================
//
// True range per bar is max(high - low, |high - prev close|, |low - prev
// close|), Wilder-smoothed over `period` bars.  Sizes the stop and both
// targets of the ATR trade levels.
// =============================================================================

use super::wilder::WilderAverage;
use crate::market_data::Candle;

fn true_range(prev: &Candle, cur: &Candle) -> f64 {
    (cur.high - cur.low)
        .max((cur.high - prev.close).abs())
        .max((cur.low - prev.close).abs())
}

/// Latest ATR.  `None` when `period` is zero, with fewer than `period + 1`
/// candles, or when a non-finite value enters the average.
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() <= period {
        return None;
    }

    let ranges: Vec<f64> = candles
        .windows(2)
        .map(|w| true_range(&w[0], &w[1]))
        .collect();
    let mut atr = WilderAverage::seed(&ranges[..period])?;
    for &tr in &ranges[period..] {
        if !atr.update(tr).is_finite() {
            return None;
        }
    }
    Some(atr.value())
}
