// =============================================================================
// Support & Resistance — swing pivots around the current price
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::market_data::Candle;

/// Bars compared on each side of a pivot.
const PIVOT_WING: usize = 2;
/// Distance, as a fraction of price, that counts as "near" a level.
const NEAR_LEVEL_FRACTION: f64 = 0.02;

/// Pivot levels around the latest close.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    /// Pivot lows below price, nearest first.
    pub supports: Vec<f64>,
    /// Pivot highs above price, nearest first.
    pub resistances: Vec<f64>,
    pub near_support: bool,
    pub near_resistance: bool,
}

impl SupportResistance {
    pub fn nearest_support(&self) -> Option<f64> {
        self.supports.first().copied()
    }

    pub fn nearest_resistance(&self) -> Option<f64> {
        self.resistances.first().copied()
    }
}

/// Find up to `count` pivot supports and resistances.
///
/// A bar is a support pivot when its low is `<=` the lows of the two bars on
/// either side (resistance: high `>=` the highs).  Only pivots on the correct
/// side of the latest close are kept.
pub fn find_support_resistance(candles: &[Candle], count: usize) -> SupportResistance {
    let Some(last) = candles.last() else {
        return SupportResistance::default();
    };
    let price = last.close;

    let mut supports = Vec::new();
    let mut resistances = Vec::new();

    if candles.len() > PIVOT_WING * 2 {
        for i in PIVOT_WING..candles.len() - PIVOT_WING {
            let wings = (i - PIVOT_WING..i).chain(i + 1..=i + PIVOT_WING);

            let low = candles[i].low;
            let high = candles[i].high;
            let mut is_low_pivot = true;
            let mut is_high_pivot = true;
            for j in wings {
                is_low_pivot &= low <= candles[j].low;
                is_high_pivot &= high >= candles[j].high;
            }

            if is_low_pivot && low < price {
                supports.push(low);
            }
            if is_high_pivot && high > price {
                resistances.push(high);
            }
        }
    }

    supports.sort_by(|a, b| b.total_cmp(a));
    resistances.sort_by(|a, b| a.total_cmp(b));

    let near_support = supports
        .first()
        .map(|s| price > 0.0 && (price - s) / price < NEAR_LEVEL_FRACTION)
        .unwrap_or(false);
    let near_resistance = resistances
        .first()
        .map(|r| price > 0.0 && (r - price) / price < NEAR_LEVEL_FRACTION)
        .unwrap_or(false);

    supports.truncate(count);
    resistances.truncate(count);

    SupportResistance {
        supports,
        resistances,
        near_support,
        near_resistance,
    }
}
