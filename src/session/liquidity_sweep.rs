// =============================================================================
// Liquidity Sweep Detection
// =============================================================================

use serde::{Deserialize, Serialize};

use super::asian_range::AsianRange;
use crate::market_data::Candle;

const RECENT_BARS: usize = 5;
/// Wick-to-body multiple for pivot levels.
const LEVEL_WICK_MULT: f64 = 1.5;
/// Asian levels hold thinner liquidity, so a smaller wick suffices.
const ASIAN_WICK_MULT: f64 = 1.0;
/// Stand-in body for doji candles.
const MIN_BODY: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    None,
    BullishSweep,
    BearishSweep,
    AsianLowSweep,
    AsianHighSweep,
}

impl SweepKind {
    /// Wire tag, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BullishSweep => "bullish_sweep",
            Self::BearishSweep => "bearish_sweep",
            Self::AsianLowSweep => "asian_low_sweep",
            Self::AsianHighSweep => "asian_high_sweep",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::BullishSweep => "Stop Hunt Below Support",
            Self::BearishSweep => "Stop Hunt Above Resistance",
            Self::AsianLowSweep => "Asian Low Swept, Bullish Reversal",
            Self::AsianHighSweep => "Asian High Swept, Bearish Reversal",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, Self::BullishSweep | Self::AsianLowSweep)
    }
}

/// Stop hunt found in the recent candles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquiditySweep {
    pub kind: SweepKind,
    /// Level whose resting stops were taken.
    pub level: f64,
}

impl LiquiditySweep {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn bullish(&self) -> bool {
        self.kind.is_bullish()
    }
}

/// Look for a wick through a defended level that closed back on the
/// defended side, over the last five candles.
///
/// The most recent bullish sweep wins; a bearish sweep is only returned when
/// no bullish one exists.
pub fn detect_liquidity_sweep(
    candles: &[Candle],
    nearest_support: Option<f64>,
    nearest_resistance: Option<f64>,
    asian: Option<&AsianRange>,
) -> Option<LiquiditySweep> {
    if candles.len() < RECENT_BARS {
        return None;
    }

    let mut found = Vec::new();
    for c in &candles[candles.len() - RECENT_BARS..] {
        let body = match c.body() {
            b if b == 0.0 => MIN_BODY,
            b => b,
        };
        let lower = c.lower_wick();
        let upper = c.upper_wick();

        if let Some(s) = nearest_support {
            if c.low < s && c.close > s && lower > body * LEVEL_WICK_MULT {
                found.push(LiquiditySweep {
                    kind: SweepKind::BullishSweep,
                    level: s,
                });
            }
        }
        if let Some(r) = nearest_resistance {
            if c.high > r && c.close < r && upper > body * LEVEL_WICK_MULT {
                found.push(LiquiditySweep {
                    kind: SweepKind::BearishSweep,
                    level: r,
                });
            }
        }
        if let Some(range) = asian {
            if c.low < range.low && c.close > range.low && lower > body * ASIAN_WICK_MULT {
                found.push(LiquiditySweep {
                    kind: SweepKind::AsianLowSweep,
                    level: range.low,
                });
            }
            if c.high > range.high && c.close < range.high && upper > body * ASIAN_WICK_MULT {
                found.push(LiquiditySweep {
                    kind: SweepKind::AsianHighSweep,
                    level: range.high,
                });
            }
        }
    }

    found
        .iter()
        .rev()
        .find(|s| s.bullish())
        .or_else(|| found.last())
        .copied()
}
