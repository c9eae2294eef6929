// =============================================================================
// Candle Pattern Classification
// =============================================================================
//
// Looks at the last three 1h candles and names the strongest pattern, checked
// in a fixed priority order.  Named reversal patterns carry HIGH confirmation,
// a plain green candle LOW.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::market_data::Candle;
use crate::types::Confirmation;

/// Patterns recognised on the most recent bars, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandlePattern {
    BullishEngulfing,
    Hammer,
    MorningStar,
    ShootingStar,
    BearishEngulfing,
    GreenCandle,
    RedCandle,
    NotAvailable,
}

impl CandlePattern {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BullishEngulfing => "Bullish Engulfing",
            Self::Hammer => "Hammer",
            Self::MorningStar => "Morning Star",
            Self::ShootingStar => "Shooting Star",
            Self::BearishEngulfing => "Bearish Engulfing",
            Self::GreenCandle => "Green Candle",
            Self::RedCandle => "Red Candle",
            Self::NotAvailable => "N/A",
        }
    }

    /// Named reversal patterns, as opposed to the plain-colour fallback.
    pub fn is_reversal(&self) -> bool {
        matches!(
            self,
            Self::BullishEngulfing
                | Self::Hammer
                | Self::MorningStar
                | Self::ShootingStar
                | Self::BearishEngulfing
        )
    }
}

impl std::fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classified signal candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleSignal {
    pub pattern: CandlePattern,
    pub bullish: bool,
    pub confirmation: Confirmation,
}

impl CandleSignal {
    fn new(pattern: CandlePattern, bullish: bool) -> Self {
        let confirmation = if pattern.is_reversal() {
            Confirmation::High
        } else if pattern == CandlePattern::GreenCandle {
            Confirmation::Low
        } else {
            Confirmation::None
        };
        Self {
            pattern,
            bullish,
            confirmation,
        }
    }

    /// Bullish with a named reversal pattern behind it.
    pub fn is_confirmed_bullish(&self) -> bool {
        self.bullish && self.confirmation == Confirmation::High
    }
}

/// Small middle body relative to the first candle of a Morning Star.
const STAR_BODY_RATIO: f64 = 0.35;
/// First Morning Star candle must be mostly body.
const LARGE_BODY_SHARE: f64 = 0.5;

/// Classify the last 1–3 candles.  First match wins:
/// Bullish Engulfing → Hammer → Morning Star → Shooting Star →
/// Bearish Engulfing → Green / Red candle.
///
/// Fewer than three candles yields a neutral `NotAvailable` signal.
pub fn classify_pattern(candles: &[Candle]) -> CandleSignal {
    if candles.len() < 3 {
        return CandleSignal {
            pattern: CandlePattern::NotAvailable,
            bullish: false,
            confirmation: Confirmation::None,
        };
    }

    let n = candles.len();
    let first = &candles[n - 3];
    let prev = &candles[n - 2];
    let last = &candles[n - 1];

    let body = last.body();
    let prev_body = prev.body();

    if last.is_bullish() && body > prev_body && last.close > prev.open && last.open < prev.close {
        return CandleSignal::new(CandlePattern::BullishEngulfing, true);
    }

    if last.is_bullish() && last.lower_wick() > body * 2.0 && last.upper_wick() < body * 0.3 {
        return CandleSignal::new(CandlePattern::Hammer, true);
    }

    if is_morning_star(first, prev, last) {
        return CandleSignal::new(CandlePattern::MorningStar, true);
    }

    if last.is_bearish() && last.upper_wick() > body * 2.0 && last.lower_wick() < body * 0.3 {
        return CandleSignal::new(CandlePattern::ShootingStar, false);
    }

    if last.is_bearish() && body > prev_body && last.close < prev.open && last.open > prev.close {
        return CandleSignal::new(CandlePattern::BearishEngulfing, false);
    }

    if last.is_bullish() {
        CandleSignal::new(CandlePattern::GreenCandle, true)
    } else {
        CandleSignal::new(CandlePattern::RedCandle, false)
    }
}

/// Large bearish candle, small-bodied star, bullish candle closing above the
/// first candle's midpoint.
fn is_morning_star(first: &Candle, star: &Candle, third: &Candle) -> bool {
    let first_body = first.body();
    let first_range = first.high - first.low;
    if !first.is_bearish() || first_range <= 0.0 || first_body < first_range * LARGE_BODY_SHARE {
        return false;
    }

    let first_midpoint = (first.open + first.close) / 2.0;
    star.body() <= first_body * STAR_BODY_RATIO
        && third.is_bullish()
        && third.close > first_midpoint
}
