// =============================================================================
// Scoring Context — every derived reading one scoring pass looks at
// =============================================================================
//
// Built once per instrument per pass, then handed read-only to the rejection
// gate, each scoring rule, the setup classifier and the checklist.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::benchmark::BenchmarkState;
use crate::indicators::{
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, current_rsi,
    roc_momentum, trend_alignment, BollingerState, MacdState, RocMomentum, TrendState,
};
use crate::market_data::{closes, volumes, InstrumentCandles};
use crate::session::{
    detect_asian_range, detect_liquidity_sweep, session_volume, AsianRange, LiquiditySweep,
    SessionInfo, VolumeProfile,
};
use crate::structure::{
    classify_pattern, detect_fvg, find_support_resistance, CandleSignal, FairValueGap,
    SupportResistance,
};

/// Fewer 1h candles than this and the instrument is not scored.
pub const MIN_CANDLES_1H: usize = 50;

const RSI_PERIOD: usize = 14;
const ATR_PERIOD: usize = 14;
const BB_PERIOD: usize = 20;
const BB_MULT: f64 = 2.0;
const ROC_PERIOD: usize = 10;
const LONG_EMA: usize = 200;
const DAILY_BIAS_EMA: usize = 20;
const SR_LEVELS: usize = 3;
/// Bars back for the 24h change on 1h candles.
const DAY_BARS: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringContext {
    pub price: f64,
    pub change_24h: f64,
    pub rsi_1h: Option<f64>,
    pub rsi_4h: Option<f64>,
    pub ema200: Option<f64>,
    /// Distance from the long EMA, in percent.
    pub price_vs_ema200: Option<f64>,
    pub structure: SupportResistance,
    pub candle: CandleSignal,
    pub fvg: Option<FairValueGap>,
    pub session: SessionInfo,
    pub asian_range: Option<AsianRange>,
    pub sweep: Option<LiquiditySweep>,
    pub volume: Option<VolumeProfile>,
    pub macd: Option<MacdState>,
    pub atr: Option<f64>,
    pub bollinger: Option<BollingerState>,
    pub trend: Option<TrendState>,
    pub roc: Option<RocMomentum>,
    /// Last 4h close above the 4h EMA20.
    pub daily_bias_up: Option<bool>,
    pub benchmark_change_4h: f64,
    pub benchmark_safe: bool,
    pub has_narrative: bool,
}

impl ScoringContext {
    /// Derive every reading for one instrument at `now`.
    ///
    /// Returns `None` with fewer than 50 one-hour candles or no 4h candles.
    pub fn build(
        candles: &InstrumentCandles,
        benchmark: &BenchmarkState,
        has_narrative: bool,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let c1h = &candles.candles_1h;
        if c1h.len() < MIN_CANDLES_1H || candles.candles_4h.is_empty() {
            return None;
        }

        let closes_1h = closes(c1h);
        let closes_4h = closes(&candles.candles_4h);
        let price = *closes_1h.last()?;

        let ema200 = calculate_ema(&closes_1h, LONG_EMA.min(closes_1h.len() - 1))
            .last()
            .copied();
        let price_vs_ema200 = ema200
            .filter(|e| *e > 0.0)
            .map(|e| (price - e) / e * 100.0);

        let structure = find_support_resistance(c1h, SR_LEVELS);
        let session = SessionInfo::at(now);
        let asian_range = detect_asian_range(c1h);
        let sweep = detect_liquidity_sweep(
            c1h,
            structure.nearest_support(),
            structure.nearest_resistance(),
            asian_range.as_ref(),
        );
        let volume = session_volume(
            &volumes(c1h),
            session.profile.volume_multiplier,
            structure.near_support,
            structure.near_resistance,
        );

        let daily_bias_up = match (
            closes_4h.last(),
            calculate_ema(&closes_4h, DAILY_BIAS_EMA).last(),
        ) {
            (Some(close), Some(ema)) => Some(close > ema),
            _ => None,
        };

        Some(Self {
            price,
            change_24h: change_24h(&closes_1h),
            rsi_1h: current_rsi(&closes_1h, RSI_PERIOD),
            rsi_4h: current_rsi(&closes_4h, RSI_PERIOD),
            ema200,
            price_vs_ema200,
            candle: classify_pattern(c1h),
            fvg: detect_fvg(c1h),
            structure,
            session,
            asian_range,
            sweep,
            volume,
            macd: calculate_macd(&closes_1h),
            atr: calculate_atr(c1h, ATR_PERIOD),
            bollinger: calculate_bollinger(&closes_1h, BB_PERIOD, BB_MULT),
            trend: trend_alignment(&closes_1h),
            roc: roc_momentum(&closes_1h, ROC_PERIOD),
            daily_bias_up,
            benchmark_change_4h: benchmark.change_4h,
            benchmark_safe: benchmark.safe,
            has_narrative,
        })
    }

    /// RSI 1h inside the primary 30–40 zone.
    pub fn rsi_in_primary_zone(&self) -> bool {
        self.rsi_1h.is_some_and(|r| (30.0..=40.0).contains(&r))
    }

    pub fn rsi_below(&self, level: f64) -> bool {
        self.rsi_1h.is_some_and(|r| r < level)
    }

    pub fn session_volume_ratio(&self) -> f64 {
        self.volume.map(|v| v.session_ratio).unwrap_or(0.0)
    }
}

fn change_24h(closes: &[f64]) -> f64 {
    let Some(&last) = closes.last() else {
        return 0.0;
    };
    let then = closes[closes.len().saturating_sub(DAY_BARS + 1)];
    if then > 0.0 {
        (last - then) / then * 100.0
    } else {
        0.0
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 14, 10, 30, 0).unwrap()
    }

    #[test]
    fn short_history_is_not_scored() {
        let candles = InstrumentCandles {
            candles_1h: hourly_candles(49, 100.0),
            candles_4h: four_hour_candles(30, 100.0),
        };
        let bench = BenchmarkState::from_change("BTCUSDT", 0.0);
        assert!(ScoringContext::build(&candles, &bench, false, now()).is_none());

        let no_4h = InstrumentCandles {
            candles_1h: hourly_candles(60, 100.0),
            candles_4h: vec![],
        };
        assert!(ScoringContext::build(&no_4h, &bench, false, now()).is_none());
    }

    #[test]
    fn fifty_candles_produce_a_full_context() {
        let candles = InstrumentCandles {
            candles_1h: hourly_candles(50, 100.0),
            candles_4h: four_hour_candles(30, 100.0),
        };
        let bench = BenchmarkState::from_change("BTCUSDT", -1.0);
        let ctx = ScoringContext::build(&candles, &bench, true, now()).unwrap();
        assert!(ctx.rsi_1h.is_some());
        assert!(ctx.macd.is_some());
        assert!(ctx.atr.is_some());
        assert!(ctx.volume.is_some());
        assert!(ctx.trend.is_some());
        // fewer than 70 closes: squeeze never fires
        assert!(!ctx.bollinger.unwrap().squeeze);
        assert!(ctx.benchmark_safe);
        assert!(ctx.has_narrative);
        assert_eq!(ctx.session.session, crate::types::SessionName::London);
    }

    #[test]
    fn change_24h_uses_close_24_bars_back() {
        let mut closes = vec![100.0; 30];
        closes[5] = 50.0; // index 30 - 25
        closes[29] = 110.0;
        assert!((change_24h(&closes) - 120.0).abs() < 1e-9);
        // short series compares against the first close
        assert!((change_24h(&[100.0, 105.0]) - 5.0).abs() < 1e-9);
    }
}
