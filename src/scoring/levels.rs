// =============================================================================
// Trade Levels — two parallel strategies over the same price
// =============================================================================
//
//   ATR-based:  stop = farther of (price - 1.5*ATR) and 0.995 * nearest
//               support; targets at +2*ATR and +3.5*ATR.
//   Playbook:   fixed -2% stop, +3.5% / +5% targets.
//
// The session-adjusted stop widens the ATR stop by the session's buffer and,
// around the Asian session, below the Asian low.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::session::{AsianRange, SessionInfo};

const ATR_STOP_MULT: f64 = 1.5;
const ATR_TP1_MULT: f64 = 2.0;
const ATR_TP2_MULT: f64 = 3.5;
const SUPPORT_STOP_FACTOR: f64 = 0.995;
/// Support assumed 2% below price when no pivot exists.
const DEFAULT_SUPPORT_FACTOR: f64 = 0.98;
/// Stop and targets used in place of ATR when it is unavailable.
const NO_ATR_STOP_FACTOR: f64 = 0.985;
const NO_ATR_TP1_FACTOR: f64 = 1.035;
const NO_ATR_TP2_FACTOR: f64 = 1.05;

pub const PLAYBOOK_STOP_PCT: f64 = 2.0;
pub const PLAYBOOK_TP1_PCT: f64 = 3.5;
pub const PLAYBOOK_TP2_PCT: f64 = 5.0;
/// A classified setup whose playbook reward:risk falls below this is
/// penalised.
pub const MIN_REWARD_RISK: f64 = 2.0;

const ASIAN_LOW_STOP_FACTOR: f64 = 0.995;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub stop_loss: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub risk_pct: f64,
    pub tp1_pct: f64,
    pub tp2_pct: f64,
    pub reward_risk: f64,
}

impl TradeLevels {
    fn from_prices(entry: f64, stop_loss: f64, tp1: f64, tp2: f64) -> Self {
        // Distance from entry to `to`, in percent of entry.
        let pct = |from: f64, to: f64| {
            if entry > 0.0 {
                (to - from) / entry * 100.0
            } else {
                0.0
            }
        };
        let risk_pct = pct(stop_loss, entry);
        let tp1_pct = pct(entry, tp1);
        Self {
            entry,
            stop_loss,
            tp1,
            tp2,
            risk_pct,
            tp1_pct,
            tp2_pct: pct(entry, tp2),
            reward_risk: if risk_pct > 0.0 { tp1_pct / risk_pct } else { 0.0 },
        }
    }
}

/// Volatility-scaled levels.  The stop is the lower (safer) of the ATR stop
/// and just under the nearest support.
pub fn atr_levels(price: f64, atr: Option<f64>, nearest_support: Option<f64>) -> TradeLevels {
    let support = nearest_support.unwrap_or(price * DEFAULT_SUPPORT_FACTOR);
    let support_stop = support * SUPPORT_STOP_FACTOR;

    let (atr_stop, tp1, tp2) = match atr {
        Some(atr) => (
            price - atr * ATR_STOP_MULT,
            price + atr * ATR_TP1_MULT,
            price + atr * ATR_TP2_MULT,
        ),
        None => (
            price * NO_ATR_STOP_FACTOR,
            price * NO_ATR_TP1_FACTOR,
            price * NO_ATR_TP2_FACTOR,
        ),
    };

    TradeLevels::from_prices(price, atr_stop.min(support_stop), tp1, tp2)
}

/// Fixed-percentage playbook levels.  `reward_risk` here is the playbook
/// ratio from [`playbook_reward_risk`].
pub fn playbook_levels(price: f64) -> TradeLevels {
    let levels = TradeLevels::from_prices(
        price,
        price * (1.0 - PLAYBOOK_STOP_PCT / 100.0),
        price * (1.0 + PLAYBOOK_TP1_PCT / 100.0),
        price * (1.0 + PLAYBOOK_TP2_PCT / 100.0),
    );
    TradeLevels {
        reward_risk: playbook_reward_risk(),
        ..levels
    }
}

/// Mean of the two playbook target distances over the playbook stop.
pub fn playbook_reward_risk() -> f64 {
    ((PLAYBOOK_TP1_PCT + PLAYBOOK_TP2_PCT) / 2.0) / PLAYBOOK_STOP_PCT
}

/// Widen `stop` by the session buffer, then under the Asian low while the
/// Asian session runs or London is about to open.
pub fn session_adjusted_stop(
    stop: f64,
    session: &SessionInfo,
    asian_range: Option<&AsianRange>,
) -> f64 {
    let buffered = stop * (1.0 - session.profile.stop_buffer);
    match asian_range {
        Some(range) if session.in_asian || session.transition_risk => {
            buffered.min(range.low * ASIAN_LOW_STOP_FACTOR)
        }
        _ => buffered,
    }
}
