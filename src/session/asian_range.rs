// =============================================================================
// Asian Range
// =============================================================================

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::market_data::Candle;

const LOOKBACK: usize = 50;
const ASIAN_CLOSE_HOUR: u32 = 8;
const TIGHT_RANGE_PCT: f64 = 1.5;

/// High/low of the most recent Asian session in the 1h candles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsianRange {
    pub high: f64,
    pub low: f64,
    pub range_pct: f64,
    pub tight: bool,
    pub candle_count: usize,
}

/// Group the last 50 one-hour candles by UTC day, keeping bars that open
/// before 08:00, and measure the latest day with at least two of them.
pub fn detect_asian_range(candles_1h: &[Candle]) -> Option<AsianRange> {
    let start = candles_1h.len().saturating_sub(LOOKBACK);

    let mut by_day: BTreeMap<NaiveDate, Vec<&Candle>> = BTreeMap::new();
    for candle in &candles_1h[start..] {
        let Some(opened) = Utc.timestamp_millis_opt(candle.open_time).single() else {
            continue;
        };
        if opened.hour() < ASIAN_CLOSE_HOUR {
            by_day.entry(opened.date_naive()).or_default().push(candle);
        }
    }

    let bars = by_day.values().rev().find(|bars| bars.len() >= 2)?;

    let high = bars.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let low = bars.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    let range_pct = if low > 0.0 {
        (high - low) / low * 100.0
    } else {
        0.0
    };

    Some(AsianRange {
        high,
        low,
        range_pct,
        tight: range_pct < TIGHT_RANGE_PCT,
        candle_count: bars.len(),
    })
}
