// =============================================================================
// Structure Detectors
// =============================================================================
//
// Price-action readings taken directly from the candle sequence:
// - Candlestick pattern on the last 1–3 bars, with confirmation strength
// - Pivot-based support / resistance levels around the current price
// - Fair-value-gap (three-bar imbalance) zones near the current price

pub mod candle_pattern;
pub mod fvg;
pub mod support_resistance;

pub use candle_pattern::{classify_pattern, CandlePattern, CandleSignal};
pub use fvg::{detect_fvg, FairValueGap};
pub use support_resistance::{find_support_resistance, SupportResistance};
