// =============================================================================
// Fair Value Gap
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::market_data::Candle;

/// Oldest bar considered, counted back from the latest.
const LOOKBACK: usize = 20;
/// Newest gap start, counted back from the latest.
const MIN_BARS_BACK: usize = 5;
/// Price within this fraction of the gap midpoint counts as "near".
const NEAR_MID_FRACTION: f64 = 0.015;

/// Bullish three-bar imbalance: bar `i`'s high below bar `i + 2`'s low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairValueGap {
    pub low: f64,
    pub high: f64,
    pub mid: f64,
    /// Latest close sits inside `[low, high]`.
    pub in_zone: bool,
    /// Latest candle wicked below the midpoint and closed its body back above.
    pub rejection_candle: bool,
}

/// Most recent gap the latest close is inside or within 1.5% of the middle of.
pub fn detect_fvg(candles: &[Candle]) -> Option<FairValueGap> {
    let n = candles.len();
    if n < MIN_BARS_BACK {
        return None;
    }
    let last = candles[n - 1];
    let price = last.close;
    let newest = n - MIN_BARS_BACK;
    let oldest = n.saturating_sub(LOOKBACK);
    if newest < oldest {
        return None;
    }

    for i in (oldest..=newest).rev() {
        let gap_low = candles[i].high;
        let gap_high = candles[i + 2].low;
        if gap_high <= gap_low {
            continue;
        }

        let mid = (gap_low + gap_high) / 2.0;
        let in_zone = price >= gap_low && price <= gap_high;
        let near_mid = price > 0.0 && (price - mid).abs() / price < NEAR_MID_FRACTION;
        if in_zone || near_mid {
            return Some(FairValueGap {
                low: gap_low,
                high: gap_high,
                mid,
                in_zone,
                rejection_candle: is_rejection(&last, mid),
            });
        }
    }
    None
}

fn is_rejection(candle: &Candle, mid: f64) -> bool {
    candle.low < mid
        && candle.open.min(candle.close) > mid
        && candle.lower_wick() >= candle.body() * 0.5
}
