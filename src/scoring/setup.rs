// =============================================================================
// Setup Classification — first match wins: A, then B, then C
// =============================================================================

use serde::{Deserialize, Serialize};

use super::context::ScoringContext;
use crate::types::{SetupStatus, SetupType};

const SETUP_A_CONFIRMED_BONUS: i32 = 15;
const SETUP_A_FORMING_BONUS: i32 = 5;
const SETUP_A_FORMING_MIN: usize = 4;
const SETUP_C_MIN_SCORE: i32 = 40;

/// The six Setup A criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupACriteria {
    pub rsi_in_zone: bool,
    pub near_support: bool,
    pub confirmed_candle: bool,
    pub session_volume_ok: bool,
    pub signal_volume_above_average: bool,
    pub benchmark_safe: bool,
}

impl SetupACriteria {
    pub fn evaluate(ctx: &ScoringContext) -> Self {
        Self {
            rsi_in_zone: ctx.rsi_in_primary_zone(),
            near_support: ctx.structure.near_support,
            confirmed_candle: ctx.candle.is_confirmed_bullish(),
            session_volume_ok: ctx.session_volume_ratio() >= 0.8,
            signal_volume_above_average: ctx.volume.is_some_and(|v| v.signal_above_average),
            benchmark_safe: ctx.benchmark_safe,
        }
    }

    fn named(&self) -> [(&'static str, bool); 6] {
        [
            ("RSI 30-40", self.rsi_in_zone),
            ("near support", self.near_support),
            ("confirmed candle", self.confirmed_candle),
            ("session volume", self.session_volume_ok),
            ("signal candle volume", self.signal_volume_above_average),
            ("benchmark safe", self.benchmark_safe),
        ]
    }

    pub fn met(&self) -> usize {
        self.named().iter().filter(|(_, ok)| *ok).count()
    }

    pub fn missing(&self) -> Vec<&'static str> {
        self.named()
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Everything the A → B → C cascade reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupInputs {
    pub a: SetupACriteria,
    pub fvg_in_zone: bool,
    pub fvg_rejection: bool,
    pub rsi_1h: Option<f64>,
    pub change_24h: f64,
    pub benchmark_safe: bool,
    pub has_narrative: bool,
    /// Score after the additive rules, before any setup bonus.
    pub score: i32,
}

impl SetupInputs {
    pub fn from_context(ctx: &ScoringContext, score: i32) -> Self {
        Self {
            a: SetupACriteria::evaluate(ctx),
            fvg_in_zone: ctx.fvg.is_some_and(|f| f.in_zone),
            fvg_rejection: ctx.fvg.is_some_and(|f| f.rejection_candle),
            rsi_1h: ctx.rsi_1h,
            change_24h: ctx.change_24h,
            benchmark_safe: ctx.benchmark_safe,
            has_narrative: ctx.has_narrative,
            score,
        }
    }

    fn rsi_below(&self, level: f64) -> bool {
        self.rsi_1h.is_some_and(|r| r < level)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupDecision {
    pub setup: SetupType,
    pub status: SetupStatus,
    pub bonus: i32,
    pub reason: Option<String>,
}

impl SetupDecision {
    fn none() -> Self {
        Self {
            setup: SetupType::None,
            status: SetupStatus::None,
            bonus: 0,
            reason: None,
        }
    }
}

/// Run the classification cascade.
pub fn classify(inputs: &SetupInputs) -> SetupDecision {
    let a = &inputs.a;
    let met = a.met();

    if met == 6 {
        return SetupDecision {
            setup: SetupType::RsiStructure,
            status: SetupStatus::Confirmed,
            bonus: SETUP_A_CONFIRMED_BONUS,
            reason: Some("Setup A confirmed: all 6 criteria met".to_string()),
        };
    }

    if met >= SETUP_A_FORMING_MIN && a.rsi_in_zone && a.benchmark_safe {
        return SetupDecision {
            setup: SetupType::RsiStructure,
            status: SetupStatus::Forming,
            bonus: SETUP_A_FORMING_BONUS,
            reason: Some(format!(
                "Setup A forming ({met}/6), missing: {}",
                a.missing().join(", ")
            )),
        };
    }

    if inputs.fvg_in_zone && inputs.rsi_below(50.0) && inputs.benchmark_safe {
        let status = if inputs.fvg_rejection {
            SetupStatus::Confirmed
        } else {
            SetupStatus::Forming
        };
        return SetupDecision {
            setup: SetupType::FvgReclaim,
            status,
            bonus: 0,
            reason: Some(format!("Setup B {status}: FVG reclaim")),
        };
    }

    if inputs.rsi_below(60.0)
        && inputs.change_24h < 2.0
        && inputs.benchmark_safe
        && inputs.score >= SETUP_C_MIN_SCORE
    {
        let setup = if inputs.has_narrative {
            SetupType::NarrativeMomentum
        } else {
            SetupType::Momentum
        };
        return SetupDecision {
            setup,
            status: SetupStatus::Forming,
            bonus: 0,
            reason: Some(format!("Setup {setup} forming")),
        };
    }

    SetupDecision::none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_a() -> SetupACriteria {
        SetupACriteria {
            rsi_in_zone: true,
            near_support: true,
            confirmed_candle: true,
            session_volume_ok: true,
            signal_volume_above_average: true,
            benchmark_safe: true,
        }
    }

    fn inputs(a: SetupACriteria) -> SetupInputs {
        SetupInputs {
            a,
            fvg_in_zone: false,
            fvg_rejection: false,
            rsi_1h: Some(35.0),
            change_24h: 0.0,
            benchmark_safe: a.benchmark_safe,
            has_narrative: false,
            score: 0,
        }
    }

    #[test]
    fn all_six_confirm_setup_a() {
        let d = classify(&inputs(all_a()));
        assert_eq!(d.setup, SetupType::RsiStructure);
        assert_eq!(d.status, SetupStatus::Confirmed);
        assert_eq!(d.bonus, 15);
    }

    #[test]
    fn flipping_any_criterion_downgrades() {
        type Flip = fn(&mut SetupACriteria);
        let flips: [(&str, Flip); 6] = [
            ("rsi", |a| a.rsi_in_zone = false),
            ("support", |a| a.near_support = false),
            ("candle", |a| a.confirmed_candle = false),
            ("session volume", |a| a.session_volume_ok = false),
            ("signal volume", |a| a.signal_volume_above_average = false),
            ("benchmark", |a| a.benchmark_safe = false),
        ];
        for (name, flip) in flips {
            let mut a = all_a();
            flip(&mut a);
            let d = classify(&inputs(a));
            assert_ne!(d.status, SetupStatus::Confirmed, "{name}");
            if a.rsi_in_zone && a.benchmark_safe {
                assert_eq!(d.status, SetupStatus::Forming, "{name}");
                assert_eq!(d.bonus, 5, "{name}");
            } else {
                assert_eq!(d.status, SetupStatus::None, "{name}");
                assert_eq!(d.setup, SetupType::None, "{name}");
            }
        }
    }

    #[test]
    fn forming_lists_missing_criteria() {
        let mut a = all_a();
        a.near_support = false;
        a.confirmed_candle = false;
        let d = classify(&inputs(a));
        assert_eq!(d.status, SetupStatus::Forming);
        assert_eq!(
            d.reason.as_deref(),
            Some("Setup A forming (4/6), missing: near support, confirmed candle")
        );
    }

    #[test]
    fn three_criteria_fall_through() {
        let mut a = all_a();
        a.near_support = false;
        a.confirmed_candle = false;
        a.session_volume_ok = false;
        assert_eq!(classify(&inputs(a)).setup, SetupType::None);
    }

    #[test]
    fn setup_b_status_follows_rejection_candle() {
        let mut i = inputs(SetupACriteria {
            benchmark_safe: true,
            ..SetupACriteria::default()
        });
        i.rsi_1h = Some(45.0);
        i.fvg_in_zone = true;
        let d = classify(&i);
        assert_eq!(d.setup, SetupType::FvgReclaim);
        assert_eq!(d.status, SetupStatus::Forming);
        assert_eq!(d.bonus, 0);
        i.fvg_rejection = true;
        assert_eq!(classify(&i).status, SetupStatus::Confirmed);
    }

    #[test]
    fn setup_c_needs_score_and_picks_narrative_variant() {
        let mut i = inputs(SetupACriteria {
            benchmark_safe: true,
            ..SetupACriteria::default()
        });
        i.rsi_1h = Some(55.0);
        i.score = 39;
        assert_eq!(classify(&i).setup, SetupType::None);
        i.score = 40;
        assert_eq!(classify(&i).setup, SetupType::Momentum);
        i.has_narrative = true;
        let d = classify(&i);
        assert_eq!(d.setup, SetupType::NarrativeMomentum);
        assert_eq!(d.status, SetupStatus::Forming);
        i.change_24h = 2.0;
        assert_eq!(classify(&i).setup, SetupType::None);
    }
}
