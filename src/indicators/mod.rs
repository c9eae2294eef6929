// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the playbook scores
// on.  Scalar readings come back as `Option<T>` and series as (possibly empty)
// vectors, so callers are forced to handle insufficient history.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod wilder;

pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, BollingerState};
pub use ema::{calculate_ema, trend_alignment, TrendState};
pub use macd::{calculate_macd, MacdState};
pub use roc::{calculate_roc, roc_momentum, RocMomentum};
pub use rsi::{calculate_rsi, current_rsi};
