// =============================================================================
// Benchmark — market-wide risk gate
// =============================================================================
//
// Computed once per batch from the benchmark instrument's candles and shared
// read-only with every scoring pass.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::indicators::current_rsi;
use crate::market_data::{closes, InstrumentCandles};

/// 4h change at or below this marks the market unsafe.
pub const RISK_OFF_CHANGE_PCT: f64 = -3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkState {
    pub symbol: String,
    /// Latest 1h close, falling back to the latest 4h close.
    pub price: Option<f64>,
    /// Last 4h close against the previous one, in percent.
    pub change_4h: f64,
    pub safe: bool,
    pub rsi_1h: Option<f64>,
}

impl BenchmarkState {
    pub fn from_candles(symbol: impl Into<String>, candles: &InstrumentCandles) -> Self {
        let symbol = symbol.into();
        let closes_4h = closes(&candles.candles_4h);
        let closes_1h = closes(&candles.candles_1h);

        let change_4h = change_pct(&closes_4h);
        let state = Self::from_change(symbol, change_4h);

        let state = Self {
            price: closes_1h.last().or(closes_4h.last()).copied(),
            rsi_1h: current_rsi(&closes_1h, 14),
            ..state
        };

        if state.safe {
            info!(
                symbol = %state.symbol,
                change_4h = format!("{:.2}", state.change_4h),
                "benchmark safe"
            );
        } else {
            warn!(
                symbol = %state.symbol,
                change_4h = format!("{:.2}", state.change_4h),
                "benchmark risk-off"
            );
        }
        state
    }

    /// State carrying only a 4h change, for callers that already know it.
    pub fn from_change(symbol: impl Into<String>, change_4h: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
            change_4h,
            safe: change_4h > RISK_OFF_CHANGE_PCT,
            rsi_1h: None,
        }
    }
}

fn change_pct(closes: &[f64]) -> f64 {
    let [.., prev, last] = closes else {
        return 0.0;
    };
    if *prev > 0.0 {
        (last - prev) / prev * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Candle;

    fn series(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle {
                open_time: i as i64 * 14_400_000,
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1.0,
            })
            .collect()
    }

    #[test]
    fn drop_of_five_percent_is_unsafe() {
        let candles = InstrumentCandles {
            candles_1h: series(&[95.0]),
            candles_4h: series(&[100.0, 95.0]),
        };
        let b = BenchmarkState::from_candles("BTCUSDT", &candles);
        assert!((b.change_4h + 5.0).abs() < 1e-9);
        assert!(!b.safe);
        assert_eq!(b.price, Some(95.0));
        assert!(b.rsi_1h.is_none());
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(!BenchmarkState::from_change("BTCUSDT", -3.0).safe);
        assert!(BenchmarkState::from_change("BTCUSDT", -2.99).safe);
    }

    #[test]
    fn single_close_means_flat() {
        let candles = InstrumentCandles {
            candles_1h: vec![],
            candles_4h: series(&[100.0]),
        };
        let b = BenchmarkState::from_candles("BTCUSDT", &candles);
        assert_eq!(b.change_4h, 0.0);
        assert!(b.safe);
        assert_eq!(b.price, Some(100.0));
    }
}
